use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use memory::{best_score, display_score, Controller, GameConfig, InMemoryStore, RecordingSurface};
use memory_sim::{play_game, Player, RandomPlayer, RecallPlayer, Recorder};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PlayerKind {
    Random,
    Recall,
}

#[derive(Parser)]
struct Args {
    /// Path to a JSON game config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How many games to play
    #[arg(short, long, default_value_t = 100)]
    num_games: usize,

    /// Number of pairs on the board (overrides the config)
    #[arg(short, long)]
    pairs: Option<usize>,

    /// RNG seed (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Which automated player to use
    #[arg(long, value_enum, default_value_t = PlayerKind::Recall)]
    player: PlayerKind,

    /// Record what was drawn in each game as JSON files into this directory
    #[arg(short, long)]
    record_games_to_directory: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if args.pairs.is_some() {
        config.pairs = args.pairs;
    }
    // Get a random seed
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    config.seed = Some(seed);

    let mut recorder = if let Some(dir_path) = args.record_games_to_directory {
        Some(Recorder::new(dir_path)?)
    } else {
        None
    };

    let mut player: Box<dyn Player> = match args.player {
        PlayerKind::Random => Box::new(RandomPlayer::new(player_rng(seed))),
        PlayerKind::Recall => Box::new(RecallPlayer::new()),
    };

    let mut controller = Controller::new(&config, RecordingSurface::new(), InMemoryStore::new())?;

    let mut guesses = Vec::with_capacity(args.num_games);
    let mut wasted_moves = 0;
    for game_idx in 0..args.num_games {
        let result = play_game(&mut controller, player.as_mut(), &mut recorder)?;
        debug!(game_idx, guesses = result.guesses, "Game finished");
        wasted_moves += result.wasted_moves;
        guesses.push(result.guesses);
    }

    if guesses.is_empty() {
        info!("No games played");
        return Ok(());
    }
    let min = guesses.iter().min().copied().unwrap_or_default();
    let max = guesses.iter().max().copied().unwrap_or_default();
    let mean = guesses.iter().map(|&g| g as f64).sum::<f64>() / guesses.len() as f64;
    let best = best_score(controller.store(), &config.high_score_key);
    eprintln!(
        "End result for {} games by '{}' with {} pairs:\n- guesses: min {}, mean {:.1}, max {}\n- wasted moves: {}\n- high score: {}",
        guesses.len(),
        player.name(),
        controller.state().pair_count(),
        min,
        mean,
        max,
        wasted_moves,
        display_score(best)
    );

    Ok(())
}

/// The player's RNG, kept apart from the stream the decks are drawn from.
fn player_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_add(1))
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
