//! Move representation, legal move generation, and move application.
//!
//! A `Move` is a pure description. `Move::apply` checks it against the
//! board and either performs it completely or rejects it and leaves the
//! board untouched. The solver records exactly the moves it applies, so a
//! recorded line always replays on an equal board.

use serde::{Deserialize, Serialize};

use crate::board::{Board, NUM_COLS};
use crate::card::Suit;
use crate::error::{Error, Result};
use crate::rules;

/// The different move types in Klondike.
///
/// Column indices are 0-based internally but usually printed as 1-based
/// when shown to a human.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Move {
    /// Turn the face-down top card of a column face-up.
    Flip { col: u8 },

    /// Move the top card of the waste to its foundation.
    WasteToFoundation { suit: Suit },

    /// Move the top face-up card of a column to its foundation.
    ///
    /// This does not flip the card exposed underneath; that is a separate
    /// `Flip`.
    TableauToFoundation { from: u8, suit: Suit },

    /// Move the face-up run starting at `index` (0 = bottom of the column)
    /// from one column onto another.
    TableauToTableau { from: u8, index: u8, to: u8 },

    /// Move the top card of the waste onto a non-empty column.
    WasteToTableau { to: u8 },

    /// Move a King from the top of the waste into an empty column.
    WasteToEmptyTableau { to: u8 },

    /// Stock is empty: turn the waste back over into the stock, face-down.
    Recycle,

    /// Turn `n` cards from the stock onto the waste, face-up.
    Draw { n: u8 },
}

impl Move {
    #[inline]
    pub fn is_foundation(&self) -> bool {
        matches!(
            self,
            Move::WasteToFoundation { .. } | Move::TableauToFoundation { .. }
        )
    }

    /// Apply this move to the board, mutating it in place.
    ///
    /// Legality is checked first; an illegal move returns
    /// `Error::IllegalMove` and does not touch the board.
    pub fn apply(&self, board: &mut Board) -> Result<()> {
        if !self.is_legal(board) {
            return Err(Error::IllegalMove(*self));
        }
        match *self {
            Move::Flip { col } => {
                if let Some(top) = board.tableau[col as usize].last_mut() {
                    top.face_up = true;
                }
            }

            Move::WasteToFoundation { suit } => {
                if let Some(card) = board.waste.pop() {
                    board.foundations[suit.slot()].push(card);
                }
            }

            Move::TableauToFoundation { from, suit } => {
                if let Some(card) = board.tableau[from as usize].pop() {
                    board.foundations[suit.slot()].push(card);
                }
            }

            Move::TableauToTableau { from, index, to } => {
                let run = board.tableau[from as usize].split_off(index as usize);
                board.tableau[to as usize].extend(run);
            }

            Move::WasteToTableau { to } | Move::WasteToEmptyTableau { to } => {
                if let Some(card) = board.waste.pop() {
                    board.tableau[to as usize].push(card);
                }
            }

            Move::Recycle => {
                // Reversing the waste restores the order the cards had in
                // the stock before they were drawn.
                board.stock = board.waste.drain(..).rev().map(|c| c.face_down()).collect();
            }

            Move::Draw { n } => {
                let split = board.stock.len() - n as usize;
                let drawn = board.stock.split_off(split);
                board.waste.extend(drawn.into_iter().map(|c| c.face_up()));
            }
        }
        Ok(())
    }

    /// Whether this move may be applied to `board` right now.
    pub fn is_legal(&self, board: &Board) -> bool {
        match *self {
            Move::Flip { col } => column(board, col)
                .and_then(|c| c.last())
                .is_some_and(|top| !top.face_up),

            Move::WasteToFoundation { suit } => board.waste_top().is_some_and(|card| {
                card.suit() == suit && rules::can_place_on_foundation(card, board.foundation(suit))
            }),

            Move::TableauToFoundation { from, suit } => column(board, from)
                .and_then(|c| c.last())
                .is_some_and(|&card| {
                    card.face_up
                        && card.suit() == suit
                        && rules::can_place_on_foundation(card, board.foundation(suit))
                }),

            Move::TableauToTableau { from, index, to } => {
                let (Some(src), Some(_)) = (column(board, from), column(board, to)) else {
                    return false;
                };
                if from == to || index as usize >= src.len() {
                    return false;
                }
                let run = &src[index as usize..];
                rules::is_valid_movable_stack(run) && board.column_accepts(to as usize, run[0])
            }

            Move::WasteToTableau { to } => match (board.waste_top(), column(board, to)) {
                (Some(card), Some(dst)) => {
                    !dst.is_empty() && board.column_accepts(to as usize, card)
                }
                _ => false,
            },

            Move::WasteToEmptyTableau { to } => match (board.waste_top(), column(board, to)) {
                (Some(card), Some(dst)) => {
                    dst.is_empty() && rules::can_place_on_tableau(card, None)
                }
                _ => false,
            },

            Move::Recycle => board.stock.is_empty() && !board.waste.is_empty(),

            Move::Draw { n } => {
                !board.stock.is_empty()
                    && n as usize == board.draw_mode.count().min(board.stock.len())
            }
        }
    }

    /// Render a move as a human-readable string, using the board *before*
    /// the move to name the cards involved.
    pub fn describe(&self, board: &Board) -> String {
        let name = |card: Option<crate::card::Card>| {
            card.map_or_else(|| "--".to_string(), |c| c.short_str())
        };
        // 1-based, widened so 255 + 1 fits.
        let num = |col: u8| u16::from(col) + 1;
        match *self {
            Move::Flip { col } => format!(
                "Flip column {} top card {}",
                num(col),
                name(board.column_top(col as usize))
            ),
            Move::WasteToFoundation { suit } => {
                format!("Waste: {} -> Foundation({suit})", name(board.waste_top()))
            }
            Move::TableauToFoundation { from, suit } => format!(
                "Column {}: {} -> Foundation({suit})",
                num(from),
                name(board.column_top(from as usize))
            ),
            Move::TableauToTableau { from, index, to } => {
                let src = column(board, from).map_or(&[][..], Vec::as_slice);
                let start = src.get(index as usize).copied();
                if index as usize + 1 >= src.len() {
                    format!("Column {}: {} -> Column {}", num(from), name(start), num(to))
                } else {
                    format!(
                        "Column {}: {}..{} -> Column {}",
                        num(from),
                        name(start),
                        name(src.last().copied()),
                        num(to)
                    )
                }
            }
            Move::WasteToTableau { to } | Move::WasteToEmptyTableau { to } => {
                format!("Waste: {} -> Column {}", name(board.waste_top()), num(to))
            }
            Move::Recycle => "Recycle waste into stock".to_string(),
            Move::Draw { n } => format!("Draw {n} from stock"),
        }
    }
}

/// Apply a move to a board. Alias for `Move::apply`.
pub fn apply_move(board: &mut Board, mv: Move) -> Result<()> {
    mv.apply(board)
}

#[inline]
fn column(board: &Board, col: u8) -> Option<&Vec<crate::card::Card>> {
    board.tableau.get(col as usize)
}

/// Generate all legal moves from the given board.
///
/// Moves come out in the same order the greedy solver scans them:
/// foundation moves (waste first, then columns left to right), column
/// runs (source left to right, lowest start index first, destination left
/// to right), waste to columns, then flips, then draw or recycle.
pub fn legal_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::new();

    // Waste -> Foundation
    if let Some(card) = board.waste_top() {
        let mv = Move::WasteToFoundation { suit: card.suit() };
        if mv.is_legal(board) {
            moves.push(mv);
        }
    }

    // Column -> Foundation
    for col in 0..NUM_COLS {
        if let Some(card) = board.column_top(col) {
            let mv = Move::TableauToFoundation {
                from: col as u8,
                suit: card.suit(),
            };
            if mv.is_legal(board) {
                moves.push(mv);
            }
        }
    }

    // Column -> Column (runs)
    for from in 0..NUM_COLS {
        for index in board.first_face_up(from)..board.tableau[from].len() {
            for to in 0..NUM_COLS {
                let mv = Move::TableauToTableau {
                    from: from as u8,
                    index: index as u8,
                    to: to as u8,
                };
                if mv.is_legal(board) {
                    moves.push(mv);
                }
            }
        }
    }

    // Waste -> Column
    if board.waste_top().is_some() {
        for to in 0..NUM_COLS as u8 {
            for mv in [Move::WasteToTableau { to }, Move::WasteToEmptyTableau { to }] {
                if mv.is_legal(board) {
                    moves.push(mv);
                }
            }
        }
    }

    // Flips
    for col in 0..NUM_COLS as u8 {
        let mv = Move::Flip { col };
        if mv.is_legal(board) {
            moves.push(mv);
        }
    }

    // Stock
    if let Some(mv) = stock_move(board) {
        moves.push(mv);
    }

    moves
}

/// The draw or recycle available on this board, if any.
pub fn stock_move(board: &Board) -> Option<Move> {
    if !board.stock.is_empty() {
        let n = board.draw_mode.count().min(board.stock.len());
        Some(Move::Draw { n: n as u8 })
    } else if !board.waste.is_empty() {
        Some(Move::Recycle)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::DrawMode;
    use crate::card::{standard_deck, Card, Rank, Suit};

    fn up(suit: Suit, rank: Rank) -> Card {
        Card::new(suit, rank).face_up()
    }

    fn ordered_deal(draw_mode: DrawMode) -> Board {
        Board::deal_from_deck(standard_deck(), draw_mode)
    }

    #[test]
    fn draw_takes_min_of_mode_and_stock() {
        let mut board = ordered_deal(DrawMode::Three);
        let top3: Vec<Card> = board.stock[board.stock.len() - 3..].to_vec();

        assert!(Move::Draw { n: 1 }.apply(&mut board).is_err());
        Move::Draw { n: 3 }.apply(&mut board).unwrap();
        assert_eq!(board.stock.len(), 21);
        assert_eq!(board.waste.len(), 3);
        assert!(board.waste.iter().all(|c| c.face_up));
        let ids: Vec<u8> = board.waste.iter().map(|c| c.index()).collect();
        let expected: Vec<u8> = top3.iter().map(|c| c.index()).collect();
        assert_eq!(ids, expected);

        board.stock.truncate(2);
        assert_eq!(stock_move(&board), Some(Move::Draw { n: 2 }));
    }

    #[test]
    fn recycle_restores_stock_order() {
        let mut board = ordered_deal(DrawMode::One);
        let original = board.stock.clone();
        while let Some(mv @ Move::Draw { .. }) = stock_move(&board) {
            mv.apply(&mut board).unwrap();
        }
        assert!(board.stock.is_empty());
        assert_eq!(stock_move(&board), Some(Move::Recycle));
        Move::Recycle.apply(&mut board).unwrap();
        assert!(board.waste.is_empty());
        assert_eq!(board.stock, original);
        assert!(Move::Recycle.apply(&mut board).is_err());
    }

    #[test]
    fn illegal_moves_leave_the_board_unchanged() {
        let board = ordered_deal(DrawMode::One);
        let attempts = [
            Move::Flip { col: 3 },
            Move::WasteToFoundation { suit: Suit::Hearts },
            Move::WasteToTableau { to: 0 },
            Move::TableauToTableau { from: 0, index: 0, to: 0 },
            Move::TableauToTableau { from: 9, index: 0, to: 1 },
            Move::Recycle,
            Move::Flip { col: 42 },
        ];
        for mv in attempts {
            let mut copy = board.clone();
            assert!(matches!(mv.apply(&mut copy), Err(Error::IllegalMove(m)) if m == mv));
            assert_eq!(copy, board);
        }
    }

    #[test]
    fn tableau_to_foundation_does_not_flip() {
        let mut board = Board::empty(DrawMode::One);
        board.tableau[0] = vec![Card::new(Suit::Clubs, Rank::Nine), up(Suit::Hearts, Rank::Ace)];
        let mv = Move::TableauToFoundation { from: 0, suit: Suit::Hearts };
        mv.apply(&mut board).unwrap();
        assert_eq!(board.foundation(Suit::Hearts).len(), 1);
        assert!(!board.tableau[0][0].face_up);

        Move::Flip { col: 0 }.apply(&mut board).unwrap();
        assert!(board.tableau[0][0].face_up);
        assert!(Move::Flip { col: 0 }.apply(&mut board).is_err());
    }

    #[test]
    fn foundation_move_checks_suit_tag() {
        let mut board = Board::empty(DrawMode::One);
        board.waste.push(up(Suit::Spades, Rank::Ace));
        assert!(!Move::WasteToFoundation { suit: Suit::Hearts }.is_legal(&board));
        Move::WasteToFoundation { suit: Suit::Spades }.apply(&mut board).unwrap();
        assert_eq!(board.foundation(Suit::Spades).len(), 1);
    }

    #[test]
    fn runs_move_as_a_unit() {
        let mut board = Board::empty(DrawMode::One);
        board.tableau[0] = vec![
            Card::new(Suit::Hearts, Rank::Two),
            up(Suit::Spades, Rank::Eight),
            up(Suit::Hearts, Rank::Seven),
            up(Suit::Clubs, Rank::Six),
        ];
        board.tableau[1] = vec![up(Suit::Diamonds, Rank::Nine)];

        let mv = Move::TableauToTableau { from: 0, index: 1, to: 1 };
        assert!(legal_moves(&board).contains(&mv));
        mv.apply(&mut board).unwrap();
        assert_eq!(board.tableau[0].len(), 1);
        assert_eq!(board.tableau[1].len(), 4);
        assert!(!board.tableau[0][0].face_up);
        assert!(legal_moves(&board).contains(&Move::Flip { col: 0 }));
    }

    #[test]
    fn waste_king_needs_the_empty_column_variant() {
        let mut board = Board::empty(DrawMode::One);
        board.waste.push(up(Suit::Clubs, Rank::King));
        assert!(!Move::WasteToTableau { to: 2 }.is_legal(&board));
        assert!(Move::WasteToEmptyTableau { to: 2 }.is_legal(&board));

        board.waste.push(up(Suit::Clubs, Rank::Queen));
        assert!(!Move::WasteToEmptyTableau { to: 2 }.is_legal(&board));
    }

    #[test]
    fn face_down_column_top_accepts_nothing() {
        let mut board = Board::empty(DrawMode::One);
        board.tableau[0] = vec![Card::new(Suit::Hearts, Rank::Eight)];
        board.waste.push(up(Suit::Spades, Rank::Seven));
        assert!(!Move::WasteToTableau { to: 0 }.is_legal(&board));
    }

    #[test]
    fn describe_names_the_cards() {
        let board = ordered_deal(DrawMode::One);
        let text = Move::TableauToFoundation { from: 0, suit: Suit::Hearts }.describe(&board);
        assert_eq!(text, "Column 1: AH -> Foundation(♥)");
        assert_eq!(Move::Draw { n: 1 }.describe(&board), "Draw 1 from stock");
    }

    #[test]
    fn describe_tolerates_columns_off_the_board() {
        let board = ordered_deal(DrawMode::One);
        let text = Move::TableauToTableau { from: 9, index: 0, to: 1 }.describe(&board);
        assert_eq!(text, "Column 10: -- -> Column 2");
        let text = Move::TableauToFoundation { from: 7, suit: Suit::Clubs }.describe(&board);
        assert_eq!(text, "Column 8: -- -> Foundation(♣)");
        assert_eq!(Move::Flip { col: 255 }.describe(&board), "Flip column 256 top card --");
    }
}
