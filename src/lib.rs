//! Klondike deal generation, greedy solving, and difficulty selection.
//!
//! The pieces, bottom-up:
//!   * `card`, `rules`: card identity and the placement rules.
//!   * `board`, `deal`, `deal_code`: positions, dealing, and sharing deals.
//!   * `moves`: the move type, legality, and application.
//!   * `search`: the bounded greedy solver.
//!   * `score`, `difficulty`: ease scoring and tiered deal selection.
//!   * `game`, `autoplay`, `session`: live rounds, replays, and settlement.

pub mod autoplay;
pub mod board;
pub mod canonical_boards;
pub mod card;
pub mod cli;
pub mod config;
pub mod deal;
pub mod deal_code;
pub mod difficulty;
pub mod display;
pub mod error;
pub mod game;
pub mod moves;
pub mod rules;
pub mod score;
pub mod search;
pub mod session;
pub mod stats;

pub use autoplay::{replay, Autoplay, Tick};
pub use board::{Board, DrawMode};
pub use card::{Card, Rank, Suit};
pub use cli::run;
pub use config::Config;
pub use deal::{deal, deal_seeded};
pub use difficulty::{generate_deal, Deal, DealGenerator, Difficulty};
pub use error::{Error, Result};
pub use game::Game;
pub use moves::{apply_move, legal_moves, Move};
pub use score::{ease_score, ScoreWeights};
pub use search::{solve, SolveOutcome, Solver, SolverConfig};
pub use session::{Ledger, Progression, Session, TableConfig};
