//! Crate-wide error type.
//!
//! Solver exhaustion and failed deal selection are not errors: they come
//! back as `SolveOutcome { solved: false, .. }` and `None` respectively.

use thiserror::Error;

use crate::moves::Move;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A move was rejected; the board it was tried on is unchanged.
    #[error("illegal move: {0:?}")]
    IllegalMove(Move),

    /// A recorded move list stopped matching the board it is replayed on.
    #[error("replay diverged at step {step}: {mv:?} is not legal here")]
    ReplayDiverged { step: usize, mv: Move },

    /// The pile a card was requested from has no cards.
    #[error("pile is empty")]
    EmptyPile,

    /// Neither the stock nor the waste has a card to turn over.
    #[error("stock and waste are both empty")]
    NothingToDraw,

    #[error("malformed board: {0}")]
    MalformedBoard(String),

    #[error("invalid deck: {0}")]
    InvalidDeck(String),

    #[error("invalid deal code: {0}")]
    InvalidDealCode(String),

    #[error("cannot afford entry fee of {entry} (balance {balance})")]
    InsufficientFunds { entry: u64, balance: u64 },

    #[error("no round in progress")]
    NoActiveRound,

    #[error("a round is already in progress")]
    RoundInProgress,

    #[error("config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("config: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
