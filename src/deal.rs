//! Randomised deals.
//!
//! The shape of a deal is fixed (see `Board::deal_from_deck`); only the
//! deck order is random. Randomness enters the crate here and in deal
//! selection, never inside the solver.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::board::{Board, DrawMode};
use crate::card::{standard_deck, Card, CARDS_PER_DECK};

/// A uniformly shuffled standard deck (Fisher–Yates).
pub fn shuffled_deck<R: Rng + ?Sized>(rng: &mut R) -> [Card; CARDS_PER_DECK as usize] {
    let mut deck = standard_deck();
    deck.shuffle(rng);
    deck
}

/// Deal a fresh random board.
pub fn deal<R: Rng + ?Sized>(draw_mode: DrawMode, rng: &mut R) -> Board {
    Board::deal_from_deck(shuffled_deck(rng), draw_mode)
}

/// Deal a reproducible board from a 64-bit seed.
pub fn deal_seeded(draw_mode: DrawMode, seed: u64) -> Board {
    let mut rng = StdRng::seed_from_u64(seed);
    deal(draw_mode, &mut rng)
}
