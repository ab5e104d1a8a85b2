use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;

use somnus::{RecorderConfig, RecorderController, Store, SyntheticMotion};

#[derive(Parser)]
#[command(
    name = "somnus",
    about = "Sleep tracking core with a streak reward ledger"
)]
struct Cli {
    /// Override the store location (defaults to the platform data dir)
    #[arg(long)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record a synthetic sleep session for a fixed number of seconds
    Track {
        #[arg(long, default_value_t = 20)]
        seconds: u64,
        /// Jitter amplitude for the synthetic gyroscope (0 = perfectly still)
        #[arg(long, default_value_t = 0.4)]
        amplitude: f64,
    },
    /// Show the ledger, claim eligibility, and recent sessions
    Status,
    /// Claim today's tokens if eligible
    Claim,
    /// Flip testing mode
    TestingMode,
    /// Store a wallet address on the ledger
    SetWallet { address: String },
    /// Delete all sessions and reset the ledger
    Reset,
}

fn default_store_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "somnus").context("could not determine a data directory")?;
    Ok(dirs.data_dir().join("somnus.sqlite3"))
}

fn build_controller(store: Store, amplitude: f64) -> RecorderController {
    let source = Arc::new(SyntheticMotion::new(amplitude));
    RecorderController::new(store, source, RecorderConfig::default())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let store_path = match cli.store_path {
        Some(path) => path,
        None => default_store_path()?,
    };
    let store = Store::new(store_path)?;

    match cli.command {
        Command::Track { seconds, amplitude } => {
            let controller = build_controller(store, amplitude);
            controller.load().await?;
            controller.start_tracking().await?;
            tokio::time::sleep(Duration::from_secs(seconds)).await;
            let outcome = controller.stop_tracking().await?;

            println!(
                "recorded {} ms with {} samples (total movement {:.3})",
                outcome.session.duration,
                outcome.session.movement_data.len(),
                outcome.session.total_movement()
            );
            if outcome.low_motion_anomaly {
                println!("session flagged: almost no movement detected");
            }
        }
        Command::Status => {
            let controller = build_controller(store, 0.0);
            controller.load().await?;
            let snapshot = controller.snapshot().await;

            println!("tokens:       {}", snapshot.ledger.tokens);
            println!("streak:       {}", snapshot.ledger.streak);
            println!("can claim:    {}", snapshot.can_claim);
            println!("testing mode: {}", snapshot.ledger.testing_mode);
            if let Some(address) = &snapshot.ledger.wallet_address {
                println!("wallet:       {address}");
            }

            let sessions = controller.sessions().await;
            println!("sessions:     {}", sessions.len());
            for session in sessions.iter().take(10) {
                println!(
                    "  {} ms, {} samples, movement {:.3}",
                    session.duration,
                    session.movement_data.len(),
                    session.total_movement()
                );
            }
        }
        Command::Claim => {
            let controller = build_controller(store, 0.0);
            controller.load().await?;
            match controller.claim_tokens().await? {
                Some(amount) => println!(
                    "claimed {amount} tokens, balance {}",
                    controller.ledger().await.tokens
                ),
                None => println!("not eligible to claim today"),
            }
        }
        Command::TestingMode => {
            let controller = build_controller(store, 0.0);
            controller.load().await?;
            let enabled = controller.toggle_testing_mode().await?;
            println!(
                "testing mode {}",
                if enabled { "enabled" } else { "disabled" }
            );
        }
        Command::SetWallet { address } => {
            let controller = build_controller(store, 0.0);
            controller.load().await?;
            controller.save_wallet_address(address).await?;
            println!("wallet address saved");
        }
        Command::Reset => {
            let controller = build_controller(store, 0.0);
            controller.load().await?;
            controller.reset().await?;
            println!("all sessions deleted, ledger reset");
        }
    }

    Ok(())
}
