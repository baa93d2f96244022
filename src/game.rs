//! Game-level state: a live round built on a dealt board.
//!
//! This module defines:
//!   - `fingerprint`, a 64-bit hash of the parts of a board that matter
//!     for loop detection in the solver, and
//!   - `Game`, the player-facing round: initial deal, current board, the
//!     log of applied moves, and a bounded undo stack.

use std::collections::VecDeque;

use crate::autoplay::Autoplay;
use crate::board::{Board, NUM_COLS};
use crate::error::{Error, Result};
use crate::moves::{stock_move, Move};
use crate::search::Solver;

/// 64-bit FNV-1a parameters.
const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

/// Default number of undo snapshots kept by a `Game`.
pub const DEFAULT_UNDO_LIMIT: usize = 200;

/// Mix a single byte into an FNV-1a hash.
#[inline]
fn fnv1a_mix_byte(mut h: u64, byte: u8) -> u64 {
    h ^= byte as u64;
    h = h.wrapping_mul(FNV_PRIME);
    h
}

/// Mix a small tag (domain separator) into an FNV-1a hash.
#[inline]
fn fnv1a_mix_tag(h: u64, tag: u8) -> u64 {
    fnv1a_mix_byte(h, tag)
}

/// Compute a 64-bit fingerprint of a board for cycle detection.
///
/// This includes:
///   - every tableau card (identity and face-up flag), column by column,
///     with each column's length,
///   - the waste, in order,
///   - the stock *size* (its order is implied by the deal and the waste),
///   - the foundation heights,
///   - the draw mode.
///
/// Collisions are possible in theory but extremely unlikely in practice;
/// a collision only makes the solver treat a new state as already seen.
pub fn fingerprint(board: &Board) -> u64 {
    let mut h = FNV_OFFSET_BASIS;

    // --- Columns ---
    h = fnv1a_mix_tag(h, 0xC0);
    for col in &board.tableau {
        h = fnv1a_mix_byte(h, col.len() as u8);
        for card in col {
            // Index fits in 6 bits; the high bit carries the face-up flag.
            h = fnv1a_mix_byte(h, card.index() | ((card.face_up as u8) << 7));
        }
    }

    // --- Waste ---
    h = fnv1a_mix_tag(h, b'W');
    h = fnv1a_mix_byte(h, board.waste.len() as u8);
    for card in &board.waste {
        h = fnv1a_mix_byte(h, card.index());
    }

    // --- Stock ---
    h = fnv1a_mix_tag(h, b'S');
    h = fnv1a_mix_byte(h, board.stock.len() as u8);

    // --- Foundations ---
    h = fnv1a_mix_tag(h, 0xF0);
    for height in board.foundation_heights() {
        h = fnv1a_mix_byte(h, height);
    }

    h = fnv1a_mix_tag(h, b'D');
    fnv1a_mix_byte(h, board.draw_mode.count() as u8)
}

/// Where a double-clicked card comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pile {
    Waste,
    Column(u8),
}

/// A live round.
///
/// Every player action goes through `Move::apply`, so the board always
/// stays reachable from `initial` by replaying `history`.
#[derive(Clone, Debug)]
pub struct Game {
    initial: Board,
    board: Board,
    history: Vec<Move>,
    undo: VecDeque<(Board, usize)>,
    undo_limit: usize,
    hash: u64,
}

impl Game {
    /// Start a round on the given deal with the default undo limit.
    pub fn new(initial: Board) -> Self {
        Self::with_undo_limit(initial, DEFAULT_UNDO_LIMIT)
    }

    pub fn with_undo_limit(initial: Board, undo_limit: usize) -> Self {
        let hash = fingerprint(&initial);
        Game {
            board: initial.clone(),
            initial,
            history: Vec::new(),
            undo: VecDeque::new(),
            undo_limit,
            hash,
        }
    }

    pub fn initial(&self) -> &Board {
        &self.initial
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Moves applied so far, including automatic flips.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn fingerprint(&self) -> u64 {
        self.hash
    }

    pub fn is_won(&self) -> bool {
        self.board.is_won()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Apply a player move.
    ///
    /// On success, any column whose top card became face-down-and-exposed
    /// is flipped immediately and the flip is logged. On failure the game
    /// is unchanged.
    pub fn play(&mut self, mv: Move) -> Result<()> {
        let snapshot = self.board.clone();
        mv.apply(&mut self.board)?;
        self.push_undo(snapshot);
        self.history.push(mv);
        self.auto_flip();
        self.hash = fingerprint(&self.board);
        Ok(())
    }

    /// Draw from the stock, or recycle the waste when the stock is empty.
    pub fn draw(&mut self) -> Result<Move> {
        let mv = stock_move(&self.board).ok_or(Error::NothingToDraw)?;
        self.play(mv)?;
        Ok(mv)
    }

    /// Send the top card of the waste or a column to its foundation.
    pub fn send_to_foundation(&mut self, from: Pile) -> Result<Move> {
        let mv = match from {
            Pile::Waste => {
                let card = self.board.waste_top().ok_or(Error::EmptyPile)?;
                Move::WasteToFoundation { suit: card.suit() }
            }
            Pile::Column(col) => {
                let card = self.board.column_top(col as usize).ok_or(Error::EmptyPile)?;
                Move::TableauToFoundation {
                    from: col,
                    suit: card.suit(),
                }
            }
        };
        self.play(mv)?;
        Ok(mv)
    }

    /// Step back to the board before the last player action.
    pub fn undo(&mut self) -> bool {
        match self.undo.pop_back() {
            Some((board, len)) => {
                self.board = board;
                self.history.truncate(len);
                self.hash = fingerprint(&self.board);
                true
            }
            None => false,
        }
    }

    /// Solve the current board and hand back a batched replay of the win.
    ///
    /// The solver works on its own copy; this game is not touched.
    pub fn auto_win(&self, solver: &Solver, batch: usize) -> Option<Autoplay> {
        let outcome = solver.solve(&self.board);
        outcome
            .solved
            .then(|| Autoplay::new(self.board.clone(), outcome.moves, batch))
    }

    /// Adopt a board produced by replaying solver moves on this game's
    /// current board.
    pub fn finish_autoplay(&mut self, autoplay: Autoplay) {
        let snapshot = self.board.clone();
        self.push_undo(snapshot);
        let (board, applied) = autoplay.into_parts();
        self.history.extend(applied);
        self.board = board;
        self.hash = fingerprint(&self.board);
    }

    fn push_undo(&mut self, board: Board) {
        if self.undo_limit == 0 {
            return;
        }
        if self.undo.len() == self.undo_limit {
            self.undo.pop_front();
        }
        self.undo.push_back((board, self.history.len()));
    }

    fn auto_flip(&mut self) {
        for col in 0..NUM_COLS as u8 {
            let flip = Move::Flip { col };
            if flip.apply(&mut self.board).is_ok() {
                self.history.push(flip);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::DrawMode;
    use crate::card::{standard_deck, Card, Rank, Suit};
    use crate::deal::deal_seeded;

    #[test]
    fn fingerprint_is_deterministic_and_sensitive() {
        let a = deal_seeded(DrawMode::One, 11);
        let b = a.clone();
        assert_eq!(fingerprint(&a), fingerprint(&b));

        let mut c = a.clone();
        Move::Draw { n: 1 }.apply(&mut c).unwrap();
        assert_ne!(fingerprint(&a), fingerprint(&c));

        let mut d = a.clone();
        d.draw_mode = DrawMode::Three;
        assert_ne!(fingerprint(&a), fingerprint(&d));
    }

    #[test]
    fn fingerprint_sees_face_up_flags() {
        let mut a = Board::empty(DrawMode::One);
        a.tableau[0].push(Card::new(Suit::Hearts, Rank::Two));
        let mut b = a.clone();
        b.tableau[0][0].face_up = true;
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn play_auto_flips_and_undo_restores() {
        // Ordered deck: column 0 is AH alone, column 1 is 2H (down) + 3H (up).
        let board = Board::deal_from_deck(standard_deck(), DrawMode::One);
        let mut game = Game::new(board.clone());

        game.send_to_foundation(Pile::Column(0)).unwrap();
        assert_eq!(game.board().foundation(Suit::Hearts).len(), 1);
        assert!(game.board().tableau[0].is_empty());
        assert_eq!(game.history().len(), 1);

        // 3H -> nowhere; draw instead.
        let drawn = game.draw().unwrap();
        assert_eq!(drawn, Move::Draw { n: 1 });
        assert_eq!(game.history().len(), 2);

        assert!(game.undo());
        assert!(game.undo());
        assert!(!game.undo());
        assert_eq!(game.board(), &board);
        assert!(game.history().is_empty());
        assert_eq!(game.fingerprint(), fingerprint(&board));
    }

    #[test]
    fn failed_play_changes_nothing() {
        let board = deal_seeded(DrawMode::One, 3);
        let mut game = Game::new(board.clone());
        assert!(game.play(Move::Recycle).is_err());
        assert_eq!(game.board(), &board);
        assert!(!game.can_undo());
    }

    #[test]
    fn exposed_cards_flip_after_a_player_move() {
        let mut board = Board::empty(DrawMode::One);
        board.tableau[0] = vec![
            Card::new(Suit::Clubs, Rank::Two),
            Card::new(Suit::Hearts, Rank::Ace).face_up(),
        ];
        let mut game = Game::new(board);
        game.send_to_foundation(Pile::Column(0)).unwrap();
        assert!(game.board().tableau[0][0].face_up);
        assert_eq!(game.history().last(), Some(&Move::Flip { col: 0 }));
    }

    #[test]
    fn undo_stack_is_bounded() {
        let board = deal_seeded(DrawMode::One, 5);
        let mut game = Game::with_undo_limit(board, 3);
        for _ in 0..10 {
            game.draw().unwrap();
        }
        let mut undone = 0;
        while game.undo() {
            undone += 1;
        }
        assert_eq!(undone, 3);
        assert_eq!(game.history().len(), 7);
    }

    #[test]
    fn drawing_from_an_exhausted_board_is_an_error() {
        let mut game = Game::new(Board::empty(DrawMode::Three));
        assert!(matches!(game.draw(), Err(Error::NothingToDraw)));
    }
}
