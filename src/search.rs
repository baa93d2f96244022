//! Greedy solver for a single Klondike board.
//!
//! This is a bounded, deterministic, greedy walk rather than an exhaustive
//! search. From each position it takes the first available move by a fixed
//! priority:
//!
//!   1. a foundation move (waste top first, then column tops left to right),
//!   2. a column run onto another column (source columns left to right,
//!      start positions from the bottom-most face-up card upward,
//!      destinations left to right), then the waste top onto a column,
//!   3. a draw from the stock, or a recycle of the waste.
//!
//! Visited positions are remembered by `fingerprint`; revisiting one forces
//! a draw/recycle to break the cycle. The iteration cap is the only
//! cancellation mechanism, so a call always returns.
//!
//! Being greedy, it can fail on boards that are winnable. A failed solve
//! means "try another deal", not "unwinnable".

use std::collections::HashSet;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::board::{Board, NUM_COLS};
use crate::game::fingerprint;
use crate::moves::{stock_move, Move};

/// Why a solve stopped.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// All 52 cards reached the foundations.
    Solved,
    /// The configured iteration cap was hit.
    IterationCap,
    /// No foundation, tableau, or stock move was available, or a cycle
    /// could not be escaped by drawing.
    Stuck,
}

/// Limits for a solve. The cap bounds worst-case runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_iterations: 1200,
        }
    }
}

/// Outcome of solving a single board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolveOutcome {
    /// Whether a winning line was found.
    pub solved: bool,
    /// The winning line when `solved`; empty otherwise.
    pub moves: Vec<Move>,
    /// Loop iterations used, including the final one.
    pub iterations: usize,
    /// Distinct positions recorded as visited.
    pub states_seen: usize,
    pub termination: TerminationReason,
}

/// The greedy solver.
#[derive(Clone, Copy, Debug, Default)]
pub struct Solver {
    pub config: SolverConfig,
}

/// Solve with the default configuration.
pub fn solve(board: &Board) -> SolveOutcome {
    Solver::default().solve(board)
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Solver { config }
    }

    /// Try to find a winning line from `board`.
    ///
    /// The board is cloned; the caller's copy is never modified. Identical
    /// boards always produce identical outcomes.
    pub fn solve(&self, board: &Board) -> SolveOutcome {
        let mut run = Run {
            board: board.clone(),
            path: Vec::new(),
        };
        let mut seen: HashSet<u64> = HashSet::new();
        let mut iterations = 0usize;

        let termination = loop {
            if iterations >= self.config.max_iterations {
                break TerminationReason::IterationCap;
            }
            iterations += 1;

            if run.board.is_won() {
                break TerminationReason::Solved;
            }

            if !seen.insert(fingerprint(&run.board)) {
                trace!("cycle at iteration {iterations}; forcing a draw");
                if run.draw() {
                    continue;
                }
                break TerminationReason::Stuck;
            }

            if run.to_foundation() || run.to_tableau() || run.draw() {
                continue;
            }
            break TerminationReason::Stuck;
        };

        let solved = termination == TerminationReason::Solved;
        debug!(
            "solve: {:?} after {} iterations, {} states, {} moves",
            termination,
            iterations,
            seen.len(),
            run.path.len()
        );

        SolveOutcome {
            solved,
            moves: if solved { run.path } else { Vec::new() },
            iterations,
            states_seen: seen.len(),
            termination,
        }
    }
}

/// Working copy of the board plus the moves applied to it so far.
struct Run {
    board: Board,
    path: Vec<Move>,
}

impl Run {
    /// Apply and record a move if it is legal here.
    fn play(&mut self, mv: Move) -> bool {
        if mv.apply(&mut self.board).is_ok() {
            self.path.push(mv);
            true
        } else {
            false
        }
    }

    /// Flip the top of a column if it is face-down.
    fn flip_if_hidden(&mut self, col: usize) {
        self.play(Move::Flip { col: col as u8 });
    }

    fn to_foundation(&mut self) -> bool {
        if let Some(card) = self.board.waste_top() {
            if self.play(Move::WasteToFoundation { suit: card.suit() }) {
                return true;
            }
        }
        for col in 0..NUM_COLS {
            let Some(card) = self.board.column_top(col) else {
                continue;
            };
            let mv = Move::TableauToFoundation {
                from: col as u8,
                suit: card.suit(),
            };
            if self.play(mv) {
                self.flip_if_hidden(col);
                return true;
            }
        }
        false
    }

    fn to_tableau(&mut self) -> bool {
        for from in 0..NUM_COLS {
            for index in self.board.first_face_up(from)..self.board.tableau[from].len() {
                for to in 0..NUM_COLS {
                    let mv = Move::TableauToTableau {
                        from: from as u8,
                        index: index as u8,
                        to: to as u8,
                    };
                    if self.play(mv) {
                        self.flip_if_hidden(from);
                        return true;
                    }
                }
            }
        }

        if self.board.waste_top().is_some() {
            for to in 0..NUM_COLS as u8 {
                if self.play(Move::WasteToTableau { to })
                    || self.play(Move::WasteToEmptyTableau { to })
                {
                    return true;
                }
            }
        }
        false
    }

    fn draw(&mut self) -> bool {
        match stock_move(&self.board) {
            Some(mv) => self.play(mv),
            None => false,
        }
    }
}
