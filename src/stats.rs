use core::fmt;

use serde::Serialize;

use crate::search::SolveOutcome;

/// Running totals over a batch of solves.
#[derive(Default, Debug, Clone, Serialize)]
pub struct Stats {
    pub played: u64,
    pub solved: u64,
    pub unsolved: u64,
    /// Sum of solution lengths over solved boards.
    pub solution_moves: u64,
    pub iterations: u64,
}

impl Stats {
    pub fn record(&mut self, outcome: &SolveOutcome) {
        self.played += 1;
        self.iterations += outcome.iterations as u64;
        if outcome.solved {
            self.solved += 1;
            self.solution_moves += outcome.moves.len() as u64;
        } else {
            self.unsolved += 1;
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.played == 0 {
            0.0
        } else {
            self.solved as f64 / self.played as f64
        }
    }

    pub fn average_solution_len(&self) -> f64 {
        if self.solved == 0 {
            0.0
        } else {
            self.solution_moves as f64 / self.solved as f64
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "played {}, solved {}, unsolved {}, win rate {:.1}%, avg line {:.1} moves",
            self.played,
            self.solved,
            self.unsolved,
            100.0 * self.win_rate(),
            self.average_solution_len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Move;
    use crate::search::TerminationReason;

    fn outcome(solved: bool, moves: usize) -> SolveOutcome {
        SolveOutcome {
            solved,
            moves: vec![Move::Recycle; moves],
            iterations: 10,
            states_seen: 10,
            termination: if solved {
                TerminationReason::Solved
            } else {
                TerminationReason::Stuck
            },
        }
    }

    #[test]
    fn empty_stats_do_not_divide_by_zero() {
        let stats = Stats::default();
        assert_eq!(stats.win_rate(), 0.0);
        assert_eq!(stats.average_solution_len(), 0.0);
    }

    #[test]
    fn counts_and_rates() {
        let mut stats = Stats::default();
        stats.record(&outcome(true, 100));
        stats.record(&outcome(true, 120));
        stats.record(&outcome(false, 0));
        stats.record(&outcome(false, 0));
        assert_eq!(stats.played, 4);
        assert_eq!(stats.solved, 2);
        assert_eq!(stats.unsolved, 2);
        assert_eq!(stats.iterations, 40);
        assert_eq!(stats.win_rate(), 0.5);
        assert_eq!(stats.average_solution_len(), 110.0);
        assert!(stats.to_string().contains("win rate 50.0%"));
    }
}
