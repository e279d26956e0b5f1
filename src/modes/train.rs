//! Headless training mode
//!
//! Runs every generation's episode back to back with no pacing, reports
//! progress through `tracing`, and prints a summary when evolution stops.
//!
//! # Example
//!
//! ```rust,ignore
//! use flappy_evo::config::AppConfig;
//! use flappy_evo::game::StopSignal;
//! use flappy_evo::modes::{TrainConfig, TrainMode};
//! use flappy_evo::neuro::{default_device, InferenceBackend};
//!
//! let config = TrainConfig::from_app(AppConfig::default());
//! let mut train_mode =
//!     TrainMode::<InferenceBackend>::new(config, default_device(), StopSignal::new())?;
//! let summary = train_mode.run()?;
//! ```

use anyhow::Result;
use burn::tensor::backend::Backend;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tracing::info;

use crate::config::AppConfig;
use crate::driver::{EpisodeEnd, EpisodeSummary, EvolutionDriver};
use crate::evolution::{
    EvolutionConfig, GenerationReport, Genome, Population, RunEnd, RunSummary,
};
use crate::game::{GameConfig, StopSignal};
use crate::metrics::GenerationStats;

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub game: GameConfig,
    pub evolution: EvolutionConfig,

    /// Seed for pipe heights and genetic operators; entropy when unset
    pub seed: Option<u64>,

    /// End evolution once an episode passes this many pipes
    pub target_score: Option<u32>,

    /// Print the rolling summary every N generations
    pub log_frequency: usize,
}

impl TrainConfig {
    pub fn from_app(app: AppConfig) -> Self {
        Self {
            game: app.game,
            evolution: app.evolution,
            seed: None,
            target_score: None,
            log_frequency: 10,
        }
    }
}

/// Build the RNG a run draws from
pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Fold a finished episode into the rolling statistics
///
/// A stopped episode is never reported to the population, so it is skipped
/// here too. The decision follows the episode's own end rather than the
/// stop flag, which may be raised after the episode already finished.
fn record_episode(
    stats: &mut GenerationStats,
    episode: &EpisodeSummary,
    genomes: &[Genome],
) -> Result<bool> {
    if episode.end == EpisodeEnd::Stopped {
        return Ok(false);
    }
    let report = GenerationReport::from_genomes(episode.generation, genomes)?;
    stats.record_generation(&report, episode.score, episode.ticks);
    Ok(true)
}

/// Headless neuro-evolution run
pub struct TrainMode<B: Backend> {
    driver: EvolutionDriver<B>,
    population: Population,
    stats: GenerationStats,
    config: TrainConfig,
    stop: StopSignal,
}

impl<B: Backend> TrainMode<B> {
    /// Create the initial population and the driver that evaluates it
    ///
    /// `stop` is polled once per tick; requesting it aborts the run after
    /// the current episode without recording that generation.
    pub fn new(config: TrainConfig, device: B::Device, stop: StopSignal) -> Result<Self> {
        let mut rng = seeded_rng(config.seed);
        let population_rng = StdRng::seed_from_u64(rng.gen());

        let population = Population::new(config.evolution.clone(), population_rng)?;
        let driver = EvolutionDriver::new(
            config.game.clone(),
            config.evolution.network.clone(),
            device,
            rng,
        )
        .with_target_score(config.target_score);

        Ok(Self {
            driver,
            population,
            stats: GenerationStats::new(20),
            config,
            stop,
        })
    }

    /// Evolve until a stopping condition is met
    pub fn run(&mut self) -> Result<RunSummary> {
        self.print_header();
        let started = Instant::now();
        let log_frequency = self.config.log_frequency.max(1);

        let driver = &mut self.driver;
        let stats = &mut self.stats;
        let stop = &self.stop;

        let summary = self.population.run(
            |generation, genomes| {
                let episode = driver.evaluate(generation, genomes, stop)?;
                if record_episode(stats, &episode, genomes)? {
                    info!(
                        generation,
                        score = episode.score,
                        ticks = episode.ticks,
                        elapsed_secs = started.elapsed().as_secs_f64(),
                        "episode finished"
                    );
                    if (generation + 1) % log_frequency == 0 {
                        println!("[Generation {}] {}", generation + 1, stats.format_summary());
                    }
                }
                Ok(episode.end.outcome())
            },
            self.config.evolution.max_generations,
        )?;

        self.print_summary(&summary);
        Ok(summary)
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    fn print_header(&self) {
        let evolution = &self.config.evolution;
        println!("{}", "=".repeat(70));
        println!("Neuro-evolution Training - Flappy");
        println!("{}", "=".repeat(70));
        println!("Population: {}", evolution.population_size);
        println!("Max generations: {}", evolution.max_generations);
        println!("Fitness threshold: {}", evolution.fitness_threshold);
        if let Some(target) = self.config.target_score {
            println!("Target score: {}", target);
        }
        println!(
            "Network: {} -> {:?} -> {} ({:?})",
            evolution.network.inputs,
            evolution.network.hidden_layers,
            evolution.network.outputs,
            evolution.network.activation
        );
        println!("Elitism: {}", evolution.elitism);
        println!("Survival threshold: {}", evolution.survival_threshold);
        println!(
            "Mutation: rate {} power {} replace {}",
            evolution.weight_mutate_rate,
            evolution.weight_mutate_power,
            evolution.weight_replace_rate
        );
        match self.config.seed {
            Some(seed) => println!("Seed: {}", seed),
            None => println!("Seed: random"),
        }
        println!("{}", "=".repeat(70));
        println!();
    }

    fn print_summary(&self, summary: &RunSummary) {
        let reason = match summary.end {
            RunEnd::FitnessThreshold => "fitness threshold reached",
            RunEnd::Finished => "target score reached",
            RunEnd::Aborted => "stopped by user",
            RunEnd::GenerationLimit => "generation limit reached",
        };

        println!("\nTraining complete: {}", reason);
        println!("Generations run: {}", summary.generations);
        if let Some(winner) = &summary.winner {
            println!(
                "Best genome: {} (fitness {:.2})",
                winner.id(),
                winner.fitness.unwrap_or_default()
            );
        }
        println!("\nFinal Statistics:");
        println!("{}", self.stats.format_summary());
    }
}
