//! Canonical hand-built boards with known solver behaviour.
//!
//! These are not deals (they do not have the 7-column triangular shape);
//! they are positions constructed directly so that tests and the CLI can
//! exercise the solver on boards whose outcome is known without running
//! it:
//!   * `solved_board`: every card already on its foundation.
//!   * `stock_ladder_board`: all 52 cards in the stock, ordered so that each
//!     draw exposes the next foundation card.
//!   * `spade_tower_board`: the Ace of spades is buried under the rest of its
//!     suit, so no line exists.

use crate::board::{Board, DrawMode};
use crate::card::{Card, Rank, Suit};

/// Every card in foundation order: hearts A..K, clubs A..K, and so on.
fn foundation_order() -> impl Iterator<Item = Card> {
    Suit::ALL
        .into_iter()
        .flat_map(|suit| Rank::ALL.into_iter().map(move |rank| Card::new(suit, rank)))
}

/// A board that is already won.
pub fn solved_board(draw_mode: DrawMode) -> Board {
    let mut board = Board::empty(draw_mode);
    for card in foundation_order() {
        board.foundations[card.suit().slot()].push(card.face_up());
    }
    board
}

/// All 52 cards in the stock; the top of the stock is the Ace of hearts
/// and every subsequent draw turns up the next foundation card.
///
/// Works for both draw modes: a draw of three lands the needed card on top
/// of the waste with the following two underneath it in order.
pub fn stock_ladder_board(draw_mode: DrawMode) -> Board {
    let mut board = Board::empty(draw_mode);
    let mut order: Vec<Card> = foundation_order().collect();
    order.reverse();
    board.stock = order;
    board
}

/// Hearts, clubs, and diamonds complete; the spades stacked in one column
/// with the Ace at the bottom and only the King face-up. Stock and waste
/// are empty.
pub fn spade_tower_board() -> Board {
    let mut board = Board::empty(DrawMode::One);
    for card in foundation_order().filter(|c| c.suit() != Suit::Spades) {
        board.foundations[card.suit().slot()].push(card.face_up());
    }
    board.tableau[0] = Rank::ALL
        .into_iter()
        .map(|rank| {
            let card = Card::new(Suit::Spades, rank);
            if rank == Rank::King { card.face_up() } else { card }
        })
        .collect();
    board
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_boards_are_valid_positions() {
        for board in [
            solved_board(DrawMode::One),
            stock_ladder_board(DrawMode::Three),
            spade_tower_board(),
        ] {
            assert_eq!(board.card_count(), 52);
            board.validate().unwrap();
        }
    }

    #[test]
    fn solved_board_is_won() {
        assert!(solved_board(DrawMode::Three).is_won());
        assert!(!spade_tower_board().is_won());
        assert!(!stock_ladder_board(DrawMode::One).is_won());
    }

    #[test]
    fn ladder_top_is_the_first_ace() {
        let board = stock_ladder_board(DrawMode::One);
        assert_eq!(board.stock.last(), Some(&Card::new(Suit::Hearts, Rank::Ace)));
    }
}
