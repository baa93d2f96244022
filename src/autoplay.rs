//! Replaying recorded move lines onto a board.
//!
//! `replay` applies a whole line at once. `Autoplay` does the same thing a
//! few moves at a time so a front end can animate an auto-win: call `tick`
//! on a timer until it reports `finished`.

use log::{debug, warn};

use crate::board::Board;
use crate::error::{Error, Result};
use crate::moves::Move;

/// Moves applied per tick unless the caller asks otherwise.
pub const DEFAULT_BATCH: usize = 3;

/// Apply every move of `moves` to `board`, in order.
///
/// Stops at the first move that is not legal and reports its position;
/// the board then holds the position reached by the moves before it.
pub fn replay(board: &mut Board, moves: &[Move]) -> Result<()> {
    for (step, mv) in moves.iter().enumerate() {
        if mv.apply(board).is_err() {
            warn!("replay diverged at step {step}: {mv:?}");
            return Err(Error::ReplayDiverged { step, mv: *mv });
        }
    }
    Ok(())
}

/// What one `tick` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    pub applied: usize,
    pub remaining: usize,
    pub finished: bool,
}

/// A solver line being played out in small batches.
#[derive(Clone, Debug)]
pub struct Autoplay {
    board: Board,
    moves: Vec<Move>,
    next: usize,
    batch: usize,
}

impl Autoplay {
    /// `batch` is clamped to at least one move per tick.
    pub fn new(board: Board, moves: Vec<Move>, batch: usize) -> Self {
        Autoplay {
            board,
            moves,
            next: 0,
            batch: batch.max(1),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn remaining(&self) -> usize {
        self.moves.len() - self.next
    }

    pub fn is_finished(&self) -> bool {
        self.next == self.moves.len()
    }

    /// Apply up to one batch of moves.
    ///
    /// A move that no longer fits the board aborts the replay with
    /// `ReplayDiverged`; moves already applied stay applied.
    pub fn tick(&mut self) -> Result<Tick> {
        let end = (self.next + self.batch).min(self.moves.len());
        let start = self.next;
        while self.next < end {
            let mv = self.moves[self.next];
            if mv.apply(&mut self.board).is_err() {
                warn!("autoplay diverged at step {}: {mv:?}", self.next);
                return Err(Error::ReplayDiverged {
                    step: self.next,
                    mv,
                });
            }
            self.next += 1;
        }
        Ok(Tick {
            applied: self.next - start,
            remaining: self.remaining(),
            finished: self.is_finished(),
        })
    }

    /// Tick until the line is exhausted. Returns the number of ticks taken.
    pub fn run_to_end(&mut self) -> Result<usize> {
        let mut ticks = 0;
        while !self.is_finished() {
            self.tick()?;
            ticks += 1;
        }
        debug!("autoplay finished in {ticks} ticks");
        Ok(ticks)
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    /// The board and the moves that were actually applied to it.
    pub fn into_parts(self) -> (Board, Vec<Move>) {
        let mut moves = self.moves;
        moves.truncate(self.next);
        (self.board, moves)
    }
}
