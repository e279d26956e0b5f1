use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use flappy_evo::config::AppConfig;
use flappy_evo::game::StopSignal;
use flappy_evo::modes::{TrainConfig, TrainMode, WatchMode};
use flappy_evo::neuro::{InferenceBackend, default_device};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flappy_evo")]
#[command(version, about = "Flappy bird agents evolved with neuro-evolution")]
struct Cli {
    /// Run mode
    #[arg(long, default_value = "train")]
    mode: Mode,

    /// Path to the TOML configuration file
    #[arg(long, default_value = "flappy.toml")]
    config: PathBuf,

    /// Override evolution.max_generations
    #[arg(long)]
    generations: Option<usize>,

    /// Seed for pipe heights and genetic operators
    #[arg(long)]
    seed: Option<u64>,

    /// Stop evolving once an episode passes this many pipes
    #[arg(long)]
    target_score: Option<u32>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Evolve headless, running ticks back to back
    Train,
    /// Evolve in a terminal UI with paced ticks
    Watch,
}

fn init_tracing(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The TUI draws on stderr, so keep it quiet unless asked otherwise
    init_tracing(match cli.mode {
        Mode::Train => "info",
        Mode::Watch => "warn",
    });

    let app = AppConfig::load(&cli.config)?;

    let mut config = TrainConfig::from_app(app);
    if let Some(generations) = cli.generations {
        anyhow::ensure!(generations > 0, "--generations must be at least 1");
        config.evolution.max_generations = generations;
    }
    config.seed = cli.seed;
    config.target_score = cli.target_score;

    let stop = StopSignal::new();

    match cli.mode {
        Mode::Train => {
            let ctrl_c = stop.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Ctrl+C received, stopping after this tick");
                    ctrl_c.request();
                }
            });

            tokio::task::spawn_blocking(move || {
                let mut train_mode =
                    TrainMode::<InferenceBackend>::new(config, default_device(), stop)?;
                train_mode.run()
            })
            .await
            .context("Training task failed")??;
        }
        Mode::Watch => {
            let mut watch_mode = WatchMode::<InferenceBackend>::new(config, default_device(), stop)?;
            let summary = watch_mode.run().await?;

            println!(
                "Watched {} generation(s), ended: {:?}",
                summary.generations, summary.end
            );
            if let Some(winner) = summary.winner {
                println!(
                    "Best genome: {} (fitness {:.2})",
                    winner.id(),
                    winner.fitness.unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}
