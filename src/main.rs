//! Headless simulation runner (default binary).
//!
//! Plays whole games with a random controller against the engine, feeding it
//! fixed-size time steps. Useful for smoke-testing rule changes and for
//! producing snapshot dumps.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, Level};
use tracing_subscriber::prelude::*;

use blockfall::core::{EngineConfig, Session, SessionSnapshot, UniformSource};
use blockfall::types::GameAction;

/// Actions the random controller picks from, with relative weights
const CONTROLLER_ACTIONS: [(GameAction, u32); 6] = [
    (GameAction::MoveLeft, 4),
    (GameAction::MoveRight, 4),
    (GameAction::RotateCw, 3),
    (GameAction::RotateCcw, 1),
    (GameAction::SoftDrop, 2),
    (GameAction::HardDrop, 1),
];

#[derive(Debug, Parser)]
#[command(name = "blockfall-sim", about = "Run headless falling-block games")]
struct Cli {
    #[arg(short = 'v', long, action = clap::ArgAction::Count, help = "Increase verbosity level (-v = INFO, -vv = DEBUG, -vvv = TRACE)")]
    verbose: u8,

    #[arg(long, default_value = "1", help = "Number of games to play")]
    games: u32,

    #[arg(long, help = "Seed for the first game; later games use seed + n")]
    seed: Option<u64>,

    #[arg(long, help = "Path to a JSON engine configuration file")]
    config: Option<PathBuf>,

    #[arg(long, default_value = "100000", help = "Stop a game after this many ticks")]
    max_ticks: u64,

    #[arg(long, default_value = "16", help = "Milliseconds of game time per tick")]
    tick_ms: u32,

    #[arg(
        long,
        default_value = "0.25",
        help = "Chance per tick that the controller issues an action"
    )]
    action_rate: f64,

    #[arg(long, help = "Print the final snapshot of each game as JSON")]
    dump: bool,
}

/// Result of one simulated game
#[derive(Debug)]
struct GameSummary {
    seed: u64,
    ticks: u64,
    actions: u64,
    snapshot: SessionSnapshot,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();

    let mut config = load_config(&cli)?;
    let base_seed = config.seed.unwrap_or_else(rand::random);
    info!(games = cli.games, base_seed, "starting simulation");

    let mut best = 0;
    for game in 0..cli.games {
        config.seed = Some(base_seed.wrapping_add(u64::from(game)));
        let summary = play(&config, &cli)?;
        best = best.max(summary.snapshot.score());

        println!(
            "game {game}: seed={} score={} level={} lines={} ticks={} actions={}{}",
            summary.seed,
            summary.snapshot.score(),
            summary.snapshot.level(),
            summary.snapshot.lines,
            summary.ticks,
            summary.actions,
            if summary.snapshot.game_over { "" } else { " (tick limit)" },
        );
        if cli.dump {
            let json = serde_json::to_string_pretty(&summary.snapshot)
                .context("failed to serialize snapshot")?;
            println!("{json}");
        }
    }

    info!(best, "simulation finished");
    Ok(())
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => EngineConfig::from_env(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    config.validate()?;
    Ok(config)
}

fn play(config: &EngineConfig, cli: &Cli) -> Result<GameSummary> {
    let mut session: Session<UniformSource> = Session::from_config(config)?;
    let seed = session.seed();
    let mut controller = ChaCha8Rng::seed_from_u64(seed.rotate_left(32));
    let total_weight: u32 = CONTROLLER_ACTIONS.iter().map(|(_, w)| w).sum();
    let action_rate = cli.action_rate.clamp(0.0, 1.0);

    session.start();

    let mut ticks = 0;
    let mut actions = 0;
    while !session.is_game_over() && ticks < cli.max_ticks {
        if controller.random_bool(action_rate) {
            let action = pick_action(&mut controller, total_weight);
            if session.apply_action(action) {
                actions += 1;
            }
        }
        session.advance(cli.tick_ms);
        ticks += 1;
    }

    debug!(seed, ticks, actions, "game finished");
    Ok(GameSummary {
        seed,
        ticks,
        actions,
        snapshot: session.snapshot(),
    })
}

fn pick_action(rng: &mut ChaCha8Rng, total_weight: u32) -> GameAction {
    let mut roll = rng.random_range(0..total_weight);
    for (action, weight) in CONTROLLER_ACTIONS {
        if roll < weight {
            return action;
        }
        roll -= weight;
    }
    GameAction::HardDrop
}
