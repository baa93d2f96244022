//! Heuristic ease score for a solved deal.
//!
//! Higher is easier. The weights are empirical and can be tuned from
//! configuration through `ScoreWeights`.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::card::Rank;
use crate::moves::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub baseline: i64,
    /// Subtracted per move in the solution.
    pub move_weight: i64,
    /// How many leading moves count as "early".
    pub early_window: usize,
    /// Added per foundation move inside the early window.
    pub early_foundation_bonus: i64,
    /// Added per flip anywhere in the solution.
    pub flip_bonus: i64,
    /// Added per Ace sitting on top of a column in the initial deal.
    pub visible_ace_bonus: i64,
    /// Subtracted per recycle of the waste.
    pub recycle_penalty: i64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            baseline: 300,
            move_weight: 1,
            early_window: 30,
            early_foundation_bonus: 6,
            flip_bonus: 2,
            visible_ace_bonus: 8,
            recycle_penalty: 12,
        }
    }
}

/// Score a deal by its initial layout and the solver's winning line.
pub fn ease_score(initial: &Board, solution: &[Move], weights: &ScoreWeights) -> i64 {
    let total = solution.len() as i64;
    let early_foundation = solution
        .iter()
        .take(weights.early_window)
        .filter(|m| m.is_foundation())
        .count() as i64;
    let flips = solution
        .iter()
        .filter(|m| matches!(m, Move::Flip { .. }))
        .count() as i64;
    let recycles = solution
        .iter()
        .filter(|m| matches!(m, Move::Recycle))
        .count() as i64;
    let visible_aces = initial
        .tableau
        .iter()
        .filter_map(|col| col.last())
        .filter(|card| card.rank() == Rank::Ace)
        .count() as i64;

    weights.baseline - weights.move_weight * total
        + weights.early_foundation_bonus * early_foundation
        + weights.flip_bonus * flips
        + weights.visible_ace_bonus * visible_aces
        - weights.recycle_penalty * recycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::DrawMode;
    use crate::card::{standard_deck, Suit};

    #[test]
    fn empty_line_on_a_blank_board_scores_the_baseline() {
        let board = Board::empty(DrawMode::One);
        assert_eq!(ease_score(&board, &[], &ScoreWeights::default()), 300);
    }

    #[test]
    fn each_term_moves_the_score() {
        let board = Board::empty(DrawMode::One);
        let w = ScoreWeights::default();

        let line = [Move::Draw { n: 1 }, Move::WasteToFoundation { suit: Suit::Hearts }];
        // 300 - 2 + 6
        assert_eq!(ease_score(&board, &line, &w), 304);

        let line = [Move::Draw { n: 1 }, Move::Recycle];
        // 300 - 2 - 12
        assert_eq!(ease_score(&board, &line, &w), 286);

        let line = [Move::Flip { col: 0 }];
        // 300 - 1 + 2
        assert_eq!(ease_score(&board, &line, &w), 301);
    }

    #[test]
    fn late_foundation_moves_earn_no_bonus() {
        let board = Board::empty(DrawMode::One);
        let w = ScoreWeights::default();
        let mut line = vec![Move::Draw { n: 1 }; 30];
        line.push(Move::WasteToFoundation { suit: Suit::Clubs });
        assert_eq!(ease_score(&board, &line, &w), 300 - 31);
    }

    #[test]
    fn visible_aces_make_a_deal_easier() {
        // The ordered deck puts AH on top of column 1 and no other Ace on top.
        let board = Board::deal_from_deck(standard_deck(), DrawMode::One);
        assert_eq!(ease_score(&board, &[], &ScoreWeights::default()), 308);
    }

    #[test]
    fn weights_are_configurable() {
        let board = Board::empty(DrawMode::One);
        let w = ScoreWeights {
            baseline: 0,
            move_weight: 10,
            ..ScoreWeights::default()
        };
        assert_eq!(ease_score(&board, &[Move::Draw { n: 3 }], &w), -10);
    }
}
