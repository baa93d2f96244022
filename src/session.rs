//! A table session: entry fees, deal selection, and settlement.
//!
//! The wallet and the player profile are not owned here. They are passed
//! in behind `Ledger` and `Progression`, so the same round logic runs
//! against a real store, a test double, or the in-memory versions below.
//!
//! Round lifecycle:
//!   1. `start_round` charges the entry fee, then picks a deal
//!      (`start_round_on` takes the caller's board instead).
//!   2. The player drives `game_mut()`, or hands off to `auto_win`.
//!   3. `settle` pays out once the board is won; `give_up` records a loss.

use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::autoplay::{Autoplay, DEFAULT_BATCH};
use crate::board::{Board, DrawMode};
use crate::config::Config;
use crate::deal::deal;
use crate::difficulty::{Difficulty, DealGenerator};
use crate::error::{Error, Result};
use crate::game::{Game, DEFAULT_UNDO_LIMIT};

/// Name rounds are booked under.
pub const GAME_ID: &str = "solitaire";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundResult {
    Win,
    Loss,
}

/// Coin balance plus round bookkeeping.
pub trait Ledger {
    fn balance(&self) -> u64;
    /// Take the entry fee and open a round. Fails without charging when the
    /// balance is short.
    fn start_round(&mut self, game: &str, entry: u64) -> Result<RoundId>;
    fn finish_round(&mut self, round: RoundId, result: RoundResult, payout: u64) -> Result<()>;
}

/// Experience and bonus-coin rewards.
pub trait Progression {
    fn add_xp(&mut self, xp: u64, reason: &str);
    fn add_coins(&mut self, coins: u64);
}

/// Prices, rewards, and play limits for the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub entry_fee: u64,
    pub win_payout: u64,
    pub loss_payout: u64,
    pub win_xp: u64,
    pub win_coins: u64,
    pub loss_xp: u64,
    pub loss_coins: u64,
    pub undo_limit: usize,
    /// Moves applied per auto-win tick.
    pub autoplay_batch: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            entry_fee: 6,
            win_payout: 18,
            loss_payout: 0,
            win_xp: 40,
            win_coins: 12,
            loss_xp: 6,
            loss_coins: 0,
            undo_limit: DEFAULT_UNDO_LIMIT,
            autoplay_batch: DEFAULT_BATCH,
        }
    }
}

#[derive(Debug)]
struct Round {
    id: RoundId,
    difficulty: Difficulty,
    /// Whether the deal came out of selection (and so is known solvable).
    checked: bool,
    game: Game,
}

pub struct Session<L, P> {
    ledger: L,
    progression: P,
    generator: DealGenerator,
    table: TableConfig,
    round: Option<Round>,
}

impl<L: Ledger, P: Progression> Session<L, P> {
    pub fn new(ledger: L, progression: P, generator: DealGenerator, table: TableConfig) -> Self {
        Session {
            ledger,
            progression,
            generator,
            table,
            round: None,
        }
    }

    pub fn from_config(ledger: L, progression: P, config: &Config) -> Self {
        Self::new(ledger, progression, config.generator(), config.table)
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn progression(&self) -> &P {
        &self.progression
    }

    pub fn table(&self) -> &TableConfig {
        &self.table
    }

    pub fn has_round(&self) -> bool {
        self.round.is_some()
    }

    /// Charge the entry fee and deal a new round.
    ///
    /// The fee is taken before any dealing, so a short balance never costs
    /// solver time. When selection finds nothing, the round still starts on
    /// a random deal that has not been checked for solvability.
    pub fn start_round<R: Rng + ?Sized>(
        &mut self,
        draw_mode: DrawMode,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<&mut Game> {
        let id = self.charge_entry()?;
        let (board, checked) = match self.generator.generate(draw_mode, difficulty, rng) {
            Some(found) => (found.board, true),
            None => {
                warn!("round {}: no solvable deal, dealing at random", id.0);
                (deal(draw_mode, rng), false)
            }
        };
        Ok(self.open_round(id, difficulty, board, checked))
    }

    /// Charge the entry fee and start a round on a board the caller picked,
    /// for instance one rebuilt from a deal code.
    ///
    /// The board is solved once so `deal_was_checked` reports whether a
    /// winning line exists.
    pub fn start_round_on(&mut self, board: Board, difficulty: Difficulty) -> Result<&mut Game> {
        let id = self.charge_entry()?;
        let checked = self.generator.solver.solve(&board).solved;
        if !checked {
            warn!("round {}: supplied deal has no known line", id.0);
        }
        Ok(self.open_round(id, difficulty, board, checked))
    }

    fn charge_entry(&mut self) -> Result<RoundId> {
        if self.round.is_some() {
            return Err(Error::RoundInProgress);
        }
        let entry = self.table.entry_fee;
        let balance = self.ledger.balance();
        if balance < entry {
            return Err(Error::InsufficientFunds { entry, balance });
        }
        self.ledger.start_round(GAME_ID, entry)
    }

    fn open_round(
        &mut self,
        id: RoundId,
        difficulty: Difficulty,
        board: Board,
        checked: bool,
    ) -> &mut Game {
        info!("round {} started: {difficulty} {}", id.0, board.draw_mode);
        let round = self.round.insert(Round {
            id,
            difficulty,
            checked,
            game: Game::with_undo_limit(board, self.table.undo_limit),
        });
        &mut round.game
    }

    pub fn game(&self) -> Option<&Game> {
        self.round.as_ref().map(|r| &r.game)
    }

    pub fn game_mut(&mut self) -> Option<&mut Game> {
        self.round.as_mut().map(|r| &mut r.game)
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.round.as_ref().map(|r| r.difficulty)
    }

    /// Whether the current deal was verified solvable when it was picked.
    pub fn deal_was_checked(&self) -> Option<bool> {
        self.round.as_ref().map(|r| r.checked)
    }

    /// Pay out if the board is won.
    ///
    /// Returns `Ok(None)` while play continues. A won round is closed, so
    /// the payout can only happen once.
    pub fn settle(&mut self) -> Result<Option<RoundResult>> {
        let round = self.round.as_ref().ok_or(Error::NoActiveRound)?;
        if !round.game.is_won() {
            return Ok(None);
        }
        self.close(RoundResult::Win).map(Some)
    }

    /// Abandon the round as a loss.
    pub fn give_up(&mut self) -> Result<RoundResult> {
        if self.round.is_none() {
            return Err(Error::NoActiveRound);
        }
        self.close(RoundResult::Loss)
    }

    /// Solve the current board and return a batched replay of the win.
    ///
    /// `None` when the solver finds no line from here; the round is left as
    /// it was either way.
    pub fn auto_win(&self) -> Result<Option<Autoplay>> {
        let round = self.round.as_ref().ok_or(Error::NoActiveRound)?;
        Ok(round
            .game
            .auto_win(&self.generator.solver, self.table.autoplay_batch))
    }

    /// Adopt a finished (or partly finished) auto-win and settle.
    pub fn complete_auto_win(&mut self, autoplay: Autoplay) -> Result<Option<RoundResult>> {
        let round = self.round.as_mut().ok_or(Error::NoActiveRound)?;
        round.game.finish_autoplay(autoplay);
        self.settle()
    }

    /// Auto-win in one go: solve, replay every batch, settle.
    pub fn run_auto_win(&mut self) -> Result<Option<RoundResult>> {
        let Some(mut autoplay) = self.auto_win()? else {
            return Ok(None);
        };
        autoplay.run_to_end()?;
        self.complete_auto_win(autoplay)
    }

    fn close(&mut self, result: RoundResult) -> Result<RoundResult> {
        let round = self.round.take().ok_or(Error::NoActiveRound)?;
        let t = self.table;
        let (payout, xp, coins, reason) = match result {
            RoundResult::Win => (t.win_payout, t.win_xp, t.win_coins, "solitaire win"),
            RoundResult::Loss => (t.loss_payout, t.loss_xp, t.loss_coins, "solitaire loss"),
        };
        self.ledger.finish_round(round.id, result, payout)?;
        self.progression.add_xp(xp, reason);
        if coins > 0 {
            self.progression.add_coins(coins);
        }
        info!(
            "round {} settled: {result:?}, payout {payout}, {} moves",
            round.id.0,
            round.game.history().len()
        );
        Ok(result)
    }
}

/// A settled round as recorded by `MemoryLedger`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub id: RoundId,
    pub entry: u64,
    pub result: RoundResult,
    pub payout: u64,
}

/// A ledger held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    balance: u64,
    next_id: u64,
    open: Vec<(RoundId, u64)>,
    pub settled: Vec<RoundRecord>,
}

impl MemoryLedger {
    pub fn with_balance(balance: u64) -> Self {
        MemoryLedger {
            balance,
            ..Default::default()
        }
    }
}

impl Ledger for MemoryLedger {
    fn balance(&self) -> u64 {
        self.balance
    }

    fn start_round(&mut self, _game: &str, entry: u64) -> Result<RoundId> {
        if self.balance < entry {
            return Err(Error::InsufficientFunds {
                entry,
                balance: self.balance,
            });
        }
        self.balance -= entry;
        self.next_id += 1;
        let id = RoundId(self.next_id);
        self.open.push((id, entry));
        Ok(id)
    }

    fn finish_round(&mut self, round: RoundId, result: RoundResult, payout: u64) -> Result<()> {
        let pos = self
            .open
            .iter()
            .position(|(id, _)| *id == round)
            .ok_or(Error::NoActiveRound)?;
        let (id, entry) = self.open.swap_remove(pos);
        self.balance += payout;
        self.settled.push(RoundRecord {
            id,
            entry,
            result,
            payout,
        });
        Ok(())
    }
}

/// Rewards held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryProgression {
    pub xp: u64,
    pub coins: u64,
    pub log: Vec<(u64, String)>,
}

impl Progression for MemoryProgression {
    fn add_xp(&mut self, xp: u64, reason: &str) {
        self.xp += xp;
        self.log.push((xp, reason.to_string()));
    }

    fn add_coins(&mut self, coins: u64) {
        self.coins += coins;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical_boards::spade_tower_board;
    use crate::deal::deal_seeded;
    use crate::difficulty::SelectionConfig;
    use crate::moves::Move;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session(balance: u64) -> Session<MemoryLedger, MemoryProgression> {
        Session::new(
            MemoryLedger::with_balance(balance),
            MemoryProgression::default(),
            DealGenerator::default(),
            TableConfig::default(),
        )
    }

    /// A generator that never finds anything, forcing the random fallback.
    fn barren() -> DealGenerator {
        DealGenerator {
            selection: SelectionConfig {
                easy_tries: 0,
                medium_tries: 0,
                hard_tries: 0,
                extreme_tries: 0,
                fallback_tries: 0,
            },
            ..DealGenerator::default()
        }
    }

    #[test]
    fn short_balance_is_refused_before_dealing() {
        let mut s = session(5);
        let mut rng = StdRng::seed_from_u64(1);
        let err = s.start_round(DrawMode::One, Difficulty::Easy, &mut rng).unwrap_err();
        assert!(matches!(err, Error::InsufficientFunds { entry: 6, balance: 5 }));
        assert_eq!(s.ledger().balance(), 5);
        assert!(!s.has_round());
    }

    #[test]
    fn one_round_at_a_time() {
        let mut s = Session::new(
            MemoryLedger::with_balance(100),
            MemoryProgression::default(),
            barren(),
            TableConfig::default(),
        );
        let mut rng = StdRng::seed_from_u64(2);
        s.start_round(DrawMode::One, Difficulty::Hard, &mut rng).unwrap();
        assert!(matches!(
            s.start_round(DrawMode::One, Difficulty::Hard, &mut rng),
            Err(Error::RoundInProgress)
        ));
        assert_eq!(s.ledger().balance(), 94);
    }

    #[test]
    fn empty_selection_falls_back_to_an_unchecked_deal() {
        let mut s = Session::new(
            MemoryLedger::with_balance(10),
            MemoryProgression::default(),
            barren(),
            TableConfig::default(),
        );
        let mut rng = StdRng::seed_from_u64(3);
        let game = s.start_round(DrawMode::Three, Difficulty::Extreme, &mut rng).unwrap();
        assert_eq!(game.board().stock.len(), 24);
        assert_eq!(s.deal_was_checked(), Some(false));
    }

    #[test]
    fn giving_up_books_a_loss() {
        let mut s = Session::new(
            MemoryLedger::with_balance(10),
            MemoryProgression::default(),
            barren(),
            TableConfig::default(),
        );
        let mut rng = StdRng::seed_from_u64(4);
        s.start_round(DrawMode::One, Difficulty::Medium, &mut rng).unwrap();
        s.game_mut().unwrap().play(Move::Draw { n: 1 }).unwrap();

        assert_eq!(s.settle().unwrap(), None);
        assert_eq!(s.give_up().unwrap(), RoundResult::Loss);
        assert_eq!(s.ledger().balance(), 4);
        assert_eq!(s.progression().xp, 6);
        assert_eq!(s.progression().coins, 0);
        assert!(matches!(s.give_up(), Err(Error::NoActiveRound)));
    }

    #[test]
    fn auto_win_pays_out_exactly_once() {
        let mut s = session(6);
        s.start_round_on(deal_seeded(DrawMode::One, 2467), Difficulty::Easy)
            .unwrap();
        assert_eq!(s.deal_was_checked(), Some(true));
        assert_eq!(s.difficulty(), Some(Difficulty::Easy));
        assert_eq!(s.ledger().balance(), 0);

        let mut autoplay = s.auto_win().unwrap().expect("a checked deal has a line");
        let first = autoplay.tick().unwrap();
        assert_eq!(first.applied, 3);
        assert!(!first.finished);
        autoplay.run_to_end().unwrap();

        assert_eq!(s.complete_auto_win(autoplay).unwrap(), Some(RoundResult::Win));
        assert_eq!(s.ledger().balance(), 18);
        assert_eq!(s.progression().xp, 40);
        assert_eq!(s.progression().coins, 12);
        assert_eq!(s.ledger().settled.len(), 1);
        assert_eq!(s.ledger().settled[0].payout, 18);

        assert!(matches!(s.settle(), Err(Error::NoActiveRound)));
        assert_eq!(s.ledger().balance(), 18);
        assert_eq!(s.progression().xp, 40);
    }

    #[test]
    fn a_supplied_loser_is_flagged_unchecked() {
        let mut s = session(6);
        s.start_round_on(spade_tower_board(), Difficulty::Hard).unwrap();
        assert_eq!(s.deal_was_checked(), Some(false));
        assert!(s.auto_win().unwrap().is_none());
        assert!(matches!(
            s.start_round_on(spade_tower_board(), Difficulty::Hard),
            Err(Error::RoundInProgress)
        ));
        assert_eq!(s.give_up().unwrap(), RoundResult::Loss);
        assert_eq!(s.ledger().balance(), 0);
    }
}
