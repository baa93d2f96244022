//! Deal selection by difficulty tier.
//!
//! A batch of random deals is dealt and solved; unsolved ones are dropped,
//! the rest are scored with `ease_score`, sorted from hardest (lowest) to
//! easiest (highest), and the tier picks a position in that order.

use core::fmt;
use core::str::FromStr;

use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, DrawMode};
use crate::deal::deal;
use crate::moves::Move;
use crate::score::{ease_score, ScoreWeights};
use crate::search::Solver;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Extreme,
    ];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Extreme => "extreme",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "extreme" => Ok(Difficulty::Extreme),
            other => Err(format!(
                "unknown difficulty '{other}'; expected easy, medium, hard, or extreme"
            )),
        }
    }
}

/// How many deals to try for each tier before giving up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub easy_tries: usize,
    pub medium_tries: usize,
    pub hard_tries: usize,
    pub extreme_tries: usize,
    /// Deals tried, unscored, when no candidate in the main batch solved.
    pub fallback_tries: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        SelectionConfig {
            easy_tries: 60,
            medium_tries: 45,
            hard_tries: 45,
            extreme_tries: 60,
            fallback_tries: 50,
        }
    }
}

impl SelectionConfig {
    pub fn tries(&self, difficulty: Difficulty) -> usize {
        match difficulty {
            Difficulty::Easy => self.easy_tries,
            Difficulty::Medium => self.medium_tries,
            Difficulty::Hard => self.hard_tries,
            Difficulty::Extreme => self.extreme_tries,
        }
    }
}

/// A deal chosen for play, with the line the solver found for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deal {
    pub board: Board,
    pub solution: Vec<Move>,
    /// `None` when the deal came from the unscored fallback loop.
    pub score: Option<i64>,
}

/// A solved, scored deal considered during selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub board: Board,
    pub solution: Vec<Move>,
    pub score: i64,
}

impl From<Candidate> for Deal {
    fn from(c: Candidate) -> Self {
        Deal {
            board: c.board,
            solution: c.solution,
            score: Some(c.score),
        }
    }
}

/// Position in a hardest-first list of `len` candidates for a tier.
///
/// `len` must be at least 1.
pub fn pick_index(len: usize, difficulty: Difficulty) -> usize {
    let last = len.saturating_sub(1);
    let index = match difficulty {
        Difficulty::Easy => last,
        Difficulty::Medium => (0.8 * last as f64).floor() as usize,
        Difficulty::Hard => (0.3 * last as f64).floor() as usize,
        Difficulty::Extreme => 0,
    };
    index.min(last)
}

/// Sort candidates hardest-first and take the one for the tier.
///
/// The sort is stable, so equal scores keep their generation order.
pub fn pick_by_difficulty(
    mut candidates: Vec<Candidate>,
    difficulty: Difficulty,
) -> Option<Candidate> {
    if candidates.is_empty() {
        return None;
    }
    candidates.sort_by_key(|c| c.score);
    let index = pick_index(candidates.len(), difficulty);
    Some(candidates.swap_remove(index))
}

/// Deals, solves, scores, and selects.
#[derive(Clone, Copy, Debug, Default)]
pub struct DealGenerator {
    pub solver: Solver,
    pub weights: ScoreWeights,
    pub selection: SelectionConfig,
}

impl DealGenerator {
    /// Solve and score one board; `None` if the solver finds no line.
    pub fn candidate(&self, board: Board) -> Option<Candidate> {
        let outcome = self.solver.solve(&board);
        if !outcome.solved {
            return None;
        }
        let score = ease_score(&board, &outcome.moves, &self.weights);
        Some(Candidate {
            board,
            solution: outcome.moves,
            score,
        })
    }

    /// Solve and score `tries` fresh deals, keeping the solvable ones.
    pub fn candidates<R: Rng + ?Sized>(
        &self,
        draw_mode: DrawMode,
        tries: usize,
        rng: &mut R,
    ) -> Vec<Candidate> {
        let out: Vec<Candidate> = (0..tries)
            .filter_map(|_| self.candidate(deal(draw_mode, rng)))
            .collect();
        debug!("{} of {} deals solved", out.len(), tries);
        out
    }

    /// Pick the tier's deal from boards the caller already has, such as
    /// deals rebuilt from codes. Unsolvable boards are skipped.
    pub fn select_from<I>(&self, boards: I, difficulty: Difficulty) -> Option<Deal>
    where
        I: IntoIterator<Item = Board>,
    {
        let pool: Vec<Candidate> = boards
            .into_iter()
            .filter_map(|board| self.candidate(board))
            .collect();
        pick_by_difficulty(pool, difficulty).map(Deal::from)
    }

    /// Pick a solvable deal for the requested tier.
    ///
    /// Returns `None` if neither the tier's batch nor the fallback loop
    /// produced a solvable deal; the caller decides what to do then.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        draw_mode: DrawMode,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Option<Deal> {
        let tries = self.selection.tries(difficulty);
        let candidates = self.candidates(draw_mode, tries, rng);
        let found = candidates.len();

        if let Some(pick) = pick_by_difficulty(candidates, difficulty) {
            info!(
                "{difficulty} {draw_mode} deal: score {} from {found}/{tries} solvable, {} moves",
                pick.score,
                pick.solution.len()
            );
            return Some(pick.into());
        }

        warn!("no solvable {draw_mode} deal in {tries} tries; falling back");
        for _ in 0..self.selection.fallback_tries {
            let board = deal(draw_mode, rng);
            let outcome = self.solver.solve(&board);
            if outcome.solved {
                return Some(Deal {
                    board,
                    solution: outcome.moves,
                    score: None,
                });
            }
        }
        warn!(
            "fallback exhausted after {} tries",
            self.selection.fallback_tries
        );
        None
    }
}

/// Generate a deal with the default solver, weights, and budgets.
pub fn generate_deal<R: Rng + ?Sized>(
    draw_mode: DrawMode,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<Deal> {
    DealGenerator::default().generate(draw_mode, difficulty, rng)
}
