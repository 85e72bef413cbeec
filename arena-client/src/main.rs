//! arena - command-line voting client
//!
//! Casts pairwise votes and prints the leaderboard. Works offline: votes are
//! kept in a local ledger and the leaderboard falls back to local tallies
//! when the server cannot be reached.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use arena_client::{Arena, ArenaClient, LeaderboardSource, LocalStorage, RemoteStatus};
use arena_common::config::{load_config, RootFolderInitializer, RootFolderResolver};
use arena_common::{ModelId, Subject, Winner};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const MODULE_NAME: &str = "arena-client";

#[derive(Parser, Debug)]
#[command(name = "arena")]
#[command(about = "Vote on model matchups and view the leaderboard")]
#[command(version)]
struct Args {
    /// Vote service base URL (overrides [client].endpoint)
    #[arg(short, long, env = "ARENA_ENDPOINT")]
    endpoint: Option<String>,

    /// Never contact the server
    #[arg(long)]
    offline: bool,

    /// Folder holding the client identity and vote ledger
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cast a vote between two models
    Vote {
        /// Subject (homework) the vote is scoped to
        #[arg(long)]
        hw: Option<String>,
        model_a: String,
        model_b: String,
        /// A, B or T (tie)
        #[arg(value_parser = parse_winner)]
        winner: Winner,
    },
    /// Show the ranked leaderboard
    Leaderboard,
    /// Print this client's voter identity
    Whoami,
}

fn parse_winner(value: &str) -> std::result::Result<Winner, String> {
    Winner::parse(&value.to_ascii_uppercase())
        .ok_or_else(|| format!("expected A, B or T, got {:?}", value))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arena_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = load_config(MODULE_NAME, args.config.as_deref())
        .context("Failed to load configuration")?;

    let root_folder = RootFolderResolver::new(MODULE_NAME)
        .with_cli_arg(args.root_folder.clone())
        .with_config(&config)
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to create root folder")?;
    let storage = LocalStorage::open(initializer.root())?;

    let endpoint = if args.offline {
        None
    } else {
        args.endpoint.or(config.client.endpoint)
    };
    let remote = endpoint
        .map(|url| ArenaClient::new(&url, Duration::from_secs(config.client.timeout_secs)))
        .transpose()?;

    let known_models = config
        .client
        .models
        .iter()
        .map(|m| ModelId::new(m.as_str()))
        .collect::<arena_common::Result<Vec<_>>>()
        .context("Invalid model in [client].models")?;

    match args.command {
        Command::Whoami => {
            let arena = Arena::open(storage, remote, known_models)?;
            println!("{}", arena.voter());
        }
        Command::Vote {
            hw,
            model_a,
            model_b,
            winner,
        } => {
            let subject = hw.map(Subject::new).unwrap_or_default();
            let model_a = ModelId::new(model_a).context("Invalid first model")?;
            let model_b = ModelId::new(model_b).context("Invalid second model")?;

            let mut arena = Arena::mount(storage, remote, known_models).await?;
            match arena.vote(subject, model_a, model_b, winner).await? {
                RemoteStatus::LocalOnly => println!("Vote recorded locally"),
                RemoteStatus::Accepted => println!("Vote recorded"),
                RemoteStatus::Duplicate => println!("Vote was already recorded by the server"),
                RemoteStatus::Failed(message) => return Err(anyhow!(message)),
            }
        }
        Command::Leaderboard => {
            let arena = Arena::mount(storage, remote, known_models).await?;
            print_leaderboard(&arena);
        }
    }

    Ok(())
}

fn print_leaderboard(arena: &Arena) {
    let board = arena.leaderboard();
    if board.source == LeaderboardSource::Local {
        println!("(local votes only)");
    }
    if board.rows.is_empty() {
        println!("No votes yet");
        return;
    }

    println!(
        "{:>3}  {:<24} {:>6} {:>6} {:>6} {:>6} {:>7}",
        "#", "model", "wins", "losses", "ties", "total", "score"
    );
    for (i, row) in board.rows.iter().enumerate() {
        println!(
            "{:>3}  {:<24} {:>6} {:>6} {:>6} {:>6} {:>6.1}%",
            i + 1,
            row.model.as_str(),
            row.wins,
            row.losses,
            row.ties,
            row.total,
            row.score * 100.0
        );
    }
}
