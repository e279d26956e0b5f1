//! Evolution driver: runs one episode per generation and reports fitness
//!
//! The driver is the bridge between the evolutionary search and the arena. It
//! turns every genome of a generation into a network-backed policy, flies them
//! all through the same course, and writes each member's accumulated fitness
//! back onto its genome.
//!
//! # Example
//!
//! ```rust
//! use flappy_evo::driver::EvolutionDriver;
//! use flappy_evo::evolution::{EvolutionConfig, Population};
//! use flappy_evo::game::{GameConfig, StopSignal};
//! use flappy_evo::neuro::{InferenceBackend, default_device};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let evolution = EvolutionConfig { population_size: 5, ..Default::default() };
//! let mut driver = EvolutionDriver::<InferenceBackend>::new(
//!     GameConfig::default(),
//!     evolution.network.clone(),
//!     default_device(),
//!     StdRng::seed_from_u64(1),
//! )
//! .with_target_score(Some(3));
//! let mut population = Population::new(evolution, StdRng::seed_from_u64(2)).unwrap();
//!
//! let summary = driver
//!     .evaluate(0, population.genomes_mut(), &StopSignal::new())
//!     .unwrap();
//! assert!(population.genomes().iter().all(|g| g.fitness.is_some()));
//! assert!(summary.ticks > 0);
//! ```

use anyhow::{Context, Result};
use burn::tensor::backend::Backend;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{debug, info};

use crate::evolution::{GenerationOutcome, Genome, NetworkConfig};
use crate::game::{Arena, GameConfig, Sprites, StopSignal};
use crate::neuro::{FeedForwardNetwork, NetworkPolicy};

/// How an episode came to an end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeEnd {
    /// Every bird was eliminated
    Extinct,
    /// A stop was requested from outside
    Stopped,
    /// The score reached the configured target
    TargetScore,
}

impl EpisodeEnd {
    /// What the evolutionary search should do after this episode
    pub fn outcome(self) -> GenerationOutcome {
        match self {
            EpisodeEnd::Extinct => GenerationOutcome::Continue,
            EpisodeEnd::TargetScore => GenerationOutcome::Finish,
            EpisodeEnd::Stopped => GenerationOutcome::Abort,
        }
    }
}

/// Result of one generation's episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    pub generation: usize,
    pub score: u32,
    pub ticks: u64,
    pub end: EpisodeEnd,
    pub best_fitness: f64,
}

pub type NetworkArena<B> = Arena<NetworkPolicy<B>>;

/// Builds and runs the episode for each generation
pub struct EvolutionDriver<B: Backend> {
    game: GameConfig,
    network: NetworkConfig,
    sprites: Arc<Sprites>,
    device: B::Device,
    rng: StdRng,
    target_score: Option<u32>,
}

impl<B: Backend> EvolutionDriver<B> {
    pub fn new(game: GameConfig, network: NetworkConfig, device: B::Device, rng: StdRng) -> Self {
        Self {
            game,
            network,
            sprites: Arc::new(Sprites::new()),
            device,
            rng,
            target_score: None,
        }
    }

    /// Stop an episode (and the run) once this many pipes are passed
    pub fn with_target_score(mut self, target_score: Option<u32>) -> Self {
        self.target_score = target_score;
        self
    }

    pub fn game_config(&self) -> &GameConfig {
        &self.game
    }

    /// Reset every genome's fitness and spawn one bird per genome
    pub fn start_episode(
        &mut self,
        generation: usize,
        genomes: &mut [Genome],
    ) -> Result<NetworkArena<B>> {
        let policies = genomes
            .iter()
            .map(|genome| {
                FeedForwardNetwork::from_genome(genome, &self.network, &self.device)
                    .map(NetworkPolicy::new)
                    .with_context(|| format!("Failed to build network for genome {}", genome.id()))
            })
            .collect::<Result<Vec<_>>>()?;

        // Only touch fitness once every network exists
        for genome in genomes.iter_mut() {
            genome.fitness = Some(0.0);
        }

        debug!(generation, population = genomes.len(), "episode started");

        let course = StdRng::seed_from_u64(self.rng.gen());
        Ok(Arena::new(
            &self.game,
            Arc::clone(&self.sprites),
            generation,
            policies,
            course,
        ))
    }

    /// Whether the episode has reached the target score
    pub fn target_reached(&self, arena: &NetworkArena<B>) -> bool {
        self.target_score
            .is_some_and(|target| arena.score() >= target)
    }

    /// Copy the arena's fitness onto the genomes it was built from
    pub fn finish_episode(
        &self,
        arena: NetworkArena<B>,
        genomes: &mut [Genome],
        end: EpisodeEnd,
    ) -> EpisodeSummary {
        let generation = arena.generation();
        let score = arena.score();
        let ticks = arena.ticks();
        let fitness = arena.into_fitness();

        for (genome, value) in genomes.iter_mut().zip(&fitness) {
            genome.fitness = Some(*value);
        }

        EpisodeSummary {
            generation,
            score,
            ticks,
            end,
            best_fitness: fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// Run one generation's episode back to back, without pacing
    pub fn evaluate(
        &mut self,
        generation: usize,
        genomes: &mut [Genome],
        stop: &StopSignal,
    ) -> Result<EpisodeSummary> {
        let mut arena = self.start_episode(generation, genomes)?;
        let mut end = EpisodeEnd::Extinct;

        while !arena.is_finished() {
            let report = arena.tick(stop);
            if report.stopped {
                info!(generation, tick = report.tick, "stop requested, ending episode");
                end = EpisodeEnd::Stopped;
            } else if self.target_reached(&arena) {
                info!(generation, score = arena.score(), "target score reached");
                arena.halt();
                end = EpisodeEnd::TargetScore;
            }
        }

        Ok(self.finish_episode(arena, genomes, end))
    }
}
