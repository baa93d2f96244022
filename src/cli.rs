//! Command-line front end for the `klondike_deals` binary.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::autoplay::replay;
use crate::board::{Board, DrawMode};
use crate::config::Config;
use crate::deal::deal_seeded;
use crate::deal_code::{load_decks_from_file, parse_deal_code, parse_deck_list};
use crate::difficulty::Difficulty;
use crate::display::render_line;
use crate::moves::Move;
use crate::search::SolveOutcome;
use crate::session::{Ledger, MemoryLedger, MemoryProgression, Session};
use crate::stats::Stats;

#[derive(Parser)]
#[command(author, version, about = "Klondike deal generator and solver", long_about = None)]
pub struct Cli {
    /// TOML file overriding solver, scoring, selection, and table settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Pick a solvable deal for a difficulty tier")]
    Deal {
        #[command(flatten)]
        table: TableArgs,
        /// Print the deal as JSON instead of text.
        #[arg(long)]
        json: bool,
        /// Also print the solver's line.
        #[arg(long)]
        moves: bool,
    },
    #[command(about = "Solve one deal given by seed, code, or deck list")]
    Solve {
        #[arg(long, value_parser = parse_draw, default_value = "1")]
        draw: DrawMode,
        #[arg(long, conflicts_with_all = ["code", "deck", "deck_file"])]
        seed: Option<u64>,
        #[arg(long)]
        code: Option<String>,
        /// Bracketed list of 52 card indices in dealing order.
        #[arg(long)]
        deck: Option<String>,
        /// Text file holding one or more deck lists.
        #[arg(long)]
        deck_file: Option<PathBuf>,
        #[arg(long)]
        moves: bool,
    },
    #[command(about = "Solve a run of seeded deals and report the win rate")]
    Survey {
        #[arg(long, value_parser = parse_draw, default_value = "1")]
        draw: DrawMode,
        #[arg(long, default_value_t = 100)]
        count: u64,
        #[arg(long, default_value_t = 0)]
        first_seed: u64,
        #[arg(long)]
        json: bool,
    },
    #[command(about = "Play one round at the table and let the solver finish it")]
    Play {
        #[command(flatten)]
        table: TableArgs,
        #[arg(long, default_value_t = 100)]
        balance: u64,
        /// Play this deal code instead of picking a deal.
        #[arg(long)]
        code: Option<String>,
    },
    #[command(about = "Print the effective configuration as TOML")]
    Config,
}

#[derive(Args)]
struct TableArgs {
    #[arg(long, value_parser = parse_draw, default_value = "1")]
    draw: DrawMode,
    #[arg(long, default_value = "medium")]
    difficulty: Difficulty,
    /// Seed for reproducible selection; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

impl TableArgs {
    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn parse_draw(s: &str) -> Result<DrawMode, String> {
    let n: u8 = s.trim().parse().map_err(|_| format!("'{s}' is not a number"))?;
    DrawMode::try_from(n).map_err(|e| e.to_string())
}

#[derive(Serialize)]
struct DealReport<'a> {
    difficulty: Difficulty,
    draw_mode: DrawMode,
    score: Option<i64>,
    code: Option<String>,
    solution_len: usize,
    board: &'a Board,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution: Option<&'a [Move]>,
}

/// Entry point for the binary.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Command::Deal { table, json, moves } => deal(&config, &table, json, moves),
        Command::Solve {
            draw,
            seed,
            code,
            deck,
            deck_file,
            moves,
        } => {
            if let Some(path) = deck_file {
                return solve_file(&config, &path, draw);
            }
            let board = match (seed, code, deck) {
                (Some(seed), _, _) => deal_seeded(draw, seed),
                (None, Some(code), _) => Board::from_deal_code(&parse_deal_code(&code)?, draw)?,
                (None, None, Some(deck)) => Board::deal_from_deck(parse_deck_list(&deck)?, draw),
                (None, None, None) => bail!("give one of --seed, --code, --deck, or --deck-file"),
            };
            solve(&config, &board, moves)
        }
        Command::Survey {
            draw,
            count,
            first_seed,
            json,
        } => survey(&config, draw, first_seed, count, json),
        Command::Play {
            table,
            balance,
            code,
        } => play(&config, &table, balance, code.as_deref()),
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn deal(config: &Config, table: &TableArgs, json: bool, show_moves: bool) -> anyhow::Result<()> {
    let mut rng = table.rng();
    let Some(found) = config
        .generator()
        .generate(table.draw, table.difficulty, &mut rng)
    else {
        bail!("no solvable deal found; try again or raise the selection budget");
    };

    let code = found.board.deal_code().map(|c| c.to_string());
    if json {
        let report = DealReport {
            difficulty: table.difficulty,
            draw_mode: table.draw,
            score: found.score,
            code,
            solution_len: found.solution.len(),
            board: &found.board,
            solution: show_moves.then_some(found.solution.as_slice()),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", found.board);
    println!("Difficulty: {} ({})", table.difficulty, table.draw);
    match found.score {
        Some(score) => println!("Ease score: {score}"),
        None => println!("Ease score: (unscored fallback deal)"),
    }
    println!("Solution length: {} moves", found.solution.len());
    if let Some(code) = code {
        println!("Deal code: {code}");
    }
    if show_moves {
        print!("{}", render_line(&found.board, &found.solution));
    }
    Ok(())
}

fn print_outcome(outcome: &SolveOutcome) {
    println!("Solved? {}", outcome.solved);
    println!("Termination reason: {:?}", outcome.termination);
    println!("Iterations: {}", outcome.iterations);
    println!("States seen: {}", outcome.states_seen);
}

fn solve(config: &Config, board: &Board, show_moves: bool) -> anyhow::Result<()> {
    println!("{board}");
    let outcome = config.solver().solve(board);
    print_outcome(&outcome);
    if !outcome.solved {
        return Ok(());
    }

    println!("Winning move count: {}", outcome.moves.len());
    let mut check = board.clone();
    replay(&mut check, &outcome.moves).context("solver line failed to replay")?;
    if !check.is_won() {
        bail!("solver line replayed but did not win");
    }
    println!("Replay verified.");
    if show_moves {
        print!("{}", render_line(board, &outcome.moves));
    }
    Ok(())
}

fn solve_file(config: &Config, path: &Path, draw: DrawMode) -> anyhow::Result<()> {
    let decks = load_decks_from_file(path)
        .with_context(|| format!("reading decks from {}", path.display()))?;
    if decks.is_empty() {
        bail!("no deck lists found in {}", path.display());
    }
    let solver = config.solver();
    let mut stats = Stats::default();
    for spec in &decks {
        let board = Board::deal_from_deck(spec.deck, draw);
        let outcome = solver.solve(&board);
        println!(
            "{}: {:?} in {} iterations, {} moves",
            spec.label,
            outcome.termination,
            outcome.iterations,
            outcome.moves.len()
        );
        stats.record(&outcome);
    }
    println!("{stats}");
    Ok(())
}

fn survey(
    config: &Config,
    draw: DrawMode,
    first: u64,
    count: u64,
    json: bool,
) -> anyhow::Result<()> {
    let solver = config.solver();
    let mut stats = Stats::default();
    for seed in first..first.saturating_add(count) {
        stats.record(&solver.solve(&deal_seeded(draw, seed)));
    }
    info!("survey of {count} {draw} deals done");
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{stats}");
    }
    Ok(())
}

fn play(
    config: &Config,
    table: &TableArgs,
    balance: u64,
    code: Option<&str>,
) -> anyhow::Result<()> {
    let mut session = Session::from_config(
        MemoryLedger::with_balance(balance),
        MemoryProgression::default(),
        config,
    );
    let game = match code {
        Some(code) => {
            let board = Board::from_deal_code(&parse_deal_code(code)?, table.draw)?;
            session.start_round_on(board, table.difficulty)?
        }
        None => session.start_round(table.draw, table.difficulty, &mut table.rng())?,
    };
    println!("{}", game.board());
    println!("Balance after entry: {}", session.ledger().balance());

    let result = match session.run_auto_win()? {
        Some(result) => result,
        None => {
            println!("No winning line from here; giving up.");
            session.give_up()?
        }
    };
    println!("Result: {result:?}");
    println!("Balance: {}", session.ledger().balance());
    println!(
        "XP: {}  Bonus coins: {}",
        session.progression().xp,
        session.progression().coins
    );
    Ok(())
}
