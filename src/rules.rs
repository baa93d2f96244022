//! Klondike placement rules.
//!
//! Pure predicates over cards and piles. Nothing here mutates a board; move
//! application in `crate::moves` and the solver in `crate::search` both go
//! through these so that a move the solver records is exactly a move the
//! replay accepts.

use crate::card::{Card, Rank, Suit};

/// Numeric rank value for tableau/foundation play (Ace=1 .. King=13).
#[inline]
pub fn rank_value(rank: Rank) -> u8 {
    rank.value()
}

/// True for hearts and diamonds.
#[inline]
pub fn is_red(suit: Suit) -> bool {
    suit.is_red()
}

/// Can a card (or the bottom card of a moving run) be placed on a column
/// whose top card is `target`?
///
/// - `None` is an empty column: only a King may go there.
/// - Otherwise the colours must differ and `moving` must be exactly one
///   rank below `target`.
#[inline]
pub fn can_place_on_tableau(moving: Card, target: Option<Card>) -> bool {
    match target {
        None => moving.rank() == Rank::King,
        Some(top) => {
            moving.is_red() != top.is_red()
                && rank_value(moving.rank()) + 1 == rank_value(top.rank())
        }
    }
}

/// Can `card` go on the given foundation pile?
///
/// An empty pile takes an Ace. A started pile takes the next rank of the
/// same suit as its top card.
#[inline]
pub fn can_place_on_foundation(card: Card, pile: &[Card]) -> bool {
    match pile.last() {
        None => card.rank() == Rank::Ace,
        Some(top) => {
            card.suit() == top.suit()
                && rank_value(card.rank()) == rank_value(top.rank()) + 1
        }
    }
}

/// True if the slice (bottom to top) is a run that may be moved as a unit.
///
/// Requires a non-empty, fully face-up sequence where each card alternates
/// colour with the one below it and is exactly one rank lower.
pub fn is_valid_movable_stack(cards: &[Card]) -> bool {
    let Some(first) = cards.first() else {
        return false;
    };
    if !first.face_up {
        return false;
    }
    cards.windows(2).all(|pair| {
        let (below, above) = (pair[0], pair[1]);
        above.face_up
            && below.is_red() != above.is_red()
            && rank_value(below.rank()) == rank_value(above.rank()) + 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Rank::*;
    use crate::card::Suit::*;

    fn up(suit: Suit, rank: Rank) -> Card {
        Card::new(suit, rank).face_up()
    }

    #[test]
    fn king_goes_only_to_empty_columns() {
        let ks = up(Spades, King);
        assert!(can_place_on_tableau(ks, None));
        for &suit in Suit::ALL.iter() {
            for &rank in Rank::ALL.iter() {
                assert!(!can_place_on_tableau(ks, Some(up(suit, rank))));
            }
        }
    }

    #[test]
    fn non_king_never_goes_to_empty_column() {
        assert!(!can_place_on_tableau(up(Hearts, Queen), None));
        assert!(!can_place_on_tableau(up(Clubs, Ace), None));
    }

    #[test]
    fn tableau_needs_opposite_colour_one_lower() {
        let eight_hearts = up(Hearts, Eight);
        assert!(can_place_on_tableau(up(Spades, Seven), Some(eight_hearts)));
        assert!(can_place_on_tableau(up(Clubs, Seven), Some(eight_hearts)));
        assert!(!can_place_on_tableau(up(Diamonds, Seven), Some(eight_hearts)));
        assert!(!can_place_on_tableau(up(Spades, Six), Some(eight_hearts)));
        assert!(!can_place_on_tableau(up(Spades, Nine), Some(eight_hearts)));
    }

    #[test]
    fn empty_foundation_takes_only_an_ace() {
        assert!(!can_place_on_foundation(up(Spades, Two), &[]));
        assert!(can_place_on_foundation(up(Spades, Ace), &[]));
    }

    #[test]
    fn foundation_builds_up_in_suit() {
        let pile = [up(Hearts, Ace), up(Hearts, Two)];
        assert!(can_place_on_foundation(up(Hearts, Three), &pile));
        assert!(!can_place_on_foundation(up(Diamonds, Three), &pile));
        assert!(!can_place_on_foundation(up(Hearts, Four), &pile));
        assert!(!can_place_on_foundation(up(Hearts, Two), &pile));
    }

    #[test]
    fn valid_and_invalid_runs() {
        // 8S, 7H, 6C is a run; adding 5C breaks the colour alternation.
        let cards = [up(Spades, Eight), up(Hearts, Seven), up(Clubs, Six), up(Clubs, Five)];
        assert!(is_valid_movable_stack(&cards[0..3]));
        assert!(!is_valid_movable_stack(&cards[0..4]));
        assert!(is_valid_movable_stack(&cards[3..4]));
        assert!(!is_valid_movable_stack(&[]));
    }

    #[test]
    fn face_down_cards_break_a_run() {
        let run = [Card::new(Spades, Eight), up(Hearts, Seven)];
        assert!(!is_valid_movable_stack(&run));
        let run = [up(Spades, Eight), Card::new(Hearts, Seven)];
        assert!(!is_valid_movable_stack(&run));
    }

    #[test]
    fn rank_value_is_ace_low() {
        assert_eq!(rank_value(Ace), 1);
        assert_eq!(rank_value(Ten), 10);
        assert_eq!(rank_value(King), 13);
        assert!(is_red(Hearts) && is_red(Diamonds));
        assert!(!is_red(Clubs) && !is_red(Spades));
    }
}
