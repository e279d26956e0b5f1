//! Generation bookkeeping and reproduction for a fixed-topology population
//!
//! Each generation the caller fills in `fitness` for every genome, then the
//! population ranks them, keeps the elites, and breeds the rest of the next
//! generation from the top `survival_threshold` share.

use anyhow::{Result, anyhow, ensure};
use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use super::config::EvolutionConfig;
use super::genome::{Genome, GenomeId};

/// What the evaluator wants the run to do after a generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Keep evolving
    Continue,
    /// Stop normally (e.g. the target score was reached)
    Finish,
    /// Stop because the user asked to
    Abort,
}

/// Fitness statistics of one evaluated generation
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub stdev_fitness: f64,
    pub best_id: GenomeId,
}

impl GenerationReport {
    /// Fitness statistics of an evaluated set of genomes
    pub fn from_genomes(generation: usize, genomes: &[Genome]) -> Result<Self> {
        let mut fitness = Vec::with_capacity(genomes.len());
        for genome in genomes {
            let value = genome.fitness.ok_or_else(|| {
                anyhow!(
                    "genome {} has no fitness in generation {}",
                    genome.id(),
                    generation
                )
            })?;
            fitness.push(value);
        }
        ensure!(!fitness.is_empty(), "population is empty");

        let (best_index, best_fitness) = fitness
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |acc, (i, f)| {
                if f > acc.1 { (i, f) } else { acc }
            });

        let n = fitness.len() as f64;
        let mean_fitness = fitness.iter().sum::<f64>() / n;
        let variance = fitness
            .iter()
            .map(|f| (f - mean_fitness).powi(2))
            .sum::<f64>()
            / n;

        Ok(Self {
            generation,
            best_fitness,
            mean_fitness,
            stdev_fitness: variance.sqrt(),
            best_id: genomes[best_index].id(),
        })
    }
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    FitnessThreshold,
    Finished,
    Aborted,
    GenerationLimit,
}

/// What closing out one evaluated generation decided
#[derive(Debug, Clone)]
pub struct GenerationVerdict {
    /// Statistics of the generation, `None` when it was aborted unrecorded
    pub report: Option<GenerationReport>,
    /// Why evolution stops here, `None` when the next generation was bred
    pub end: Option<RunEnd>,
}

/// Result of [`Population::run`]
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub end: RunEnd,
    pub generations: usize,
    /// Best genome seen in any generation, with its fitness
    pub winner: Option<Genome>,
}

/// A generation of genomes plus the state needed to breed the next one
pub struct Population {
    config: EvolutionConfig,
    genomes: Vec<Genome>,
    generation: usize,
    next_id: GenomeId,
    best: Option<Genome>,
    rng: StdRng,
}

impl Population {
    /// Create generation 0 with randomly initialised genomes
    pub fn new(config: EvolutionConfig, mut rng: StdRng) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow!("invalid evolution config: {}", e))?;

        let genomes: Vec<Genome> = (0..config.population_size as GenomeId)
            .map(|id| Genome::random(id, &config, &mut rng))
            .collect();
        let next_id = genomes.len() as GenomeId;

        Ok(Self {
            config,
            genomes,
            generation: 0,
            next_id,
            best: None,
            rng,
        })
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    pub fn genomes_mut(&mut self) -> &mut [Genome] {
        &mut self.genomes
    }

    /// Best genome recorded so far
    pub fn best(&self) -> Option<&Genome> {
        self.best.as_ref()
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Summarise the evaluated generation and update the all-time best
    ///
    /// Fails if any genome was left without a fitness.
    pub fn record_generation(&mut self) -> Result<GenerationReport> {
        let report = GenerationReport::from_genomes(self.generation, &self.genomes)?;

        let improved = self
            .best
            .as_ref()
            .and_then(|g| g.fitness)
            .map_or(true, |f| report.best_fitness > f);
        if improved {
            self.best = self
                .genomes
                .iter()
                .find(|g| g.id() == report.best_id)
                .cloned();
        }

        Ok(report)
    }

    /// Replace the current generation with its offspring
    pub fn advance(&mut self) {
        let mut ranked: Vec<&Genome> = self.genomes.iter().collect();
        ranked.sort_by(|a, b| {
            let fa = a.fitness.unwrap_or(f64::NEG_INFINITY);
            let fb = b.fitness.unwrap_or(f64::NEG_INFINITY);
            fb.total_cmp(&fa)
        });

        let size = self.config.population_size;
        // At least two parents when the population allows it
        let parents = ((ranked.len() as f64 * self.config.survival_threshold).ceil() as usize)
            .max(2)
            .min(ranked.len())
            .max(1);

        let mut next_id = self.next_id;
        let mut take_id = || {
            let id = next_id;
            next_id += 1;
            id
        };

        let mut next = Vec::with_capacity(size);
        for elite in ranked.iter().take(self.config.elitism.min(size)) {
            next.push(elite.offspring(take_id()));
        }

        while next.len() < size {
            let id = take_id();
            let first = ranked[self.rng.gen_range(0..parents)];
            let mut child = if parents > 1 && self.rng.gen_bool(self.config.crossover_rate) {
                let second = ranked[self.rng.gen_range(0..parents)];
                Genome::crossover(id, first, second, &mut self.rng)
            } else {
                first.offspring(id)
            };
            child.mutate(&self.config, &mut self.rng);
            next.push(child);
        }

        debug!(
            generation = self.generation + 1,
            parents,
            elites = self.config.elitism.min(size),
            "bred next generation"
        );

        self.genomes = next;
        self.next_id = next_id;
        self.generation += 1;
    }

    /// Clear every fitness before the current generation is evaluated
    pub fn begin_generation(&mut self) {
        for genome in &mut self.genomes {
            genome.fitness = None;
        }
    }

    /// Record the evaluated generation and decide whether evolution goes on
    ///
    /// `evaluated` counts generations run so far, this one included. Stop
    /// conditions are checked in order: abort, finish, fitness threshold,
    /// generation limit. When none applies the next generation is bred.
    pub fn conclude_generation(
        &mut self,
        outcome: GenerationOutcome,
        evaluated: usize,
        max_generations: usize,
    ) -> Result<GenerationVerdict> {
        if outcome == GenerationOutcome::Abort {
            info!(generation = self.generation, "run aborted");
            return Ok(GenerationVerdict {
                report: None,
                end: Some(RunEnd::Aborted),
            });
        }

        let report = self.record_generation()?;
        info!(
            generation = report.generation,
            best = report.best_fitness,
            mean = report.mean_fitness,
            stdev = report.stdev_fitness,
            best_id = report.best_id,
            "generation evaluated"
        );

        let end = if outcome == GenerationOutcome::Finish {
            Some(RunEnd::Finished)
        } else if report.best_fitness >= self.config.fitness_threshold {
            Some(RunEnd::FitnessThreshold)
        } else if evaluated >= max_generations {
            Some(RunEnd::GenerationLimit)
        } else {
            self.advance();
            None
        };

        Ok(GenerationVerdict {
            report: Some(report),
            end,
        })
    }

    /// Evolve until a stopping condition is met
    ///
    /// `evaluate` receives the generation number and the genomes, and must set
    /// every genome's fitness before returning.
    pub fn run<F>(&mut self, mut evaluate: F, max_generations: usize) -> Result<RunSummary>
    where
        F: FnMut(usize, &mut [Genome]) -> Result<GenerationOutcome>,
    {
        let mut evaluated = 0;

        let end = loop {
            if evaluated >= max_generations {
                break RunEnd::GenerationLimit;
            }

            self.begin_generation();
            let outcome = evaluate(self.generation, &mut self.genomes)?;
            evaluated += 1;

            if let Some(end) = self.conclude_generation(outcome, evaluated, max_generations)?.end {
                break end;
            }
        };

        Ok(RunSummary {
            end,
            generations: evaluated,
            winner: self.best.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn small_config() -> EvolutionConfig {
        EvolutionConfig {
            population_size: 10,
            elitism: 2,
            ..Default::default()
        }
    }

    fn population(config: EvolutionConfig) -> Population {
        Population::new(config, StdRng::seed_from_u64(11)).unwrap()
    }

    #[test]
    fn test_initial_population() {
        let pop = population(small_config());
        assert_eq!(pop.generation(), 0);
        assert_eq!(pop.genomes().len(), 10);
        assert!(pop.best().is_none());

        let mut ids: Vec<_> = pop.genomes().iter().map(|g| g.id()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EvolutionConfig {
            population_size: 0,
            ..Default::default()
        };
        assert!(Population::new(config, StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn test_record_requires_fitness() {
        let mut pop = population(small_config());
        assert!(pop.record_generation().is_err());
    }

    #[test]
    fn test_record_statistics() {
        let mut pop = population(small_config());
        for (i, genome) in pop.genomes_mut().iter_mut().enumerate() {
            genome.fitness = Some(i as f64);
        }
        let report = pop.record_generation().unwrap();

        assert_eq!(report.best_fitness, 9.0);
        assert_eq!(report.mean_fitness, 4.5);
        assert!((report.stdev_fitness - 8.25_f64.sqrt()).abs() < 1e-9);
        assert_eq!(report.best_id, pop.genomes()[9].id());
        assert_eq!(pop.best().unwrap().fitness, Some(9.0));
    }

    #[test]
    fn test_advance_keeps_elites() {
        let mut pop = population(small_config());
        for (i, genome) in pop.genomes_mut().iter_mut().enumerate() {
            genome.fitness = Some(i as f64);
        }
        let top = pop.genomes()[9].weights().to_vec();
        let second = pop.genomes()[8].weights().to_vec();

        pop.advance();

        assert_eq!(pop.generation(), 1);
        assert_eq!(pop.genomes().len(), 10);
        assert_eq!(pop.genomes()[0].weights(), top.as_slice());
        assert_eq!(pop.genomes()[1].weights(), second.as_slice());
        assert!(pop.genomes().iter().all(|g| g.fitness.is_none()));
        assert!(pop.genomes().iter().all(|g| g.id() >= 10));
    }

    #[test]
    fn test_run_stops_at_fitness_threshold() {
        let mut pop = population(EvolutionConfig {
            fitness_threshold: 3.0,
            ..small_config()
        });

        let summary = pop
            .run(
                |generation, genomes| {
                    for genome in genomes.iter_mut() {
                        genome.fitness = Some(generation as f64);
                    }
                    Ok(GenerationOutcome::Continue)
                },
                50,
            )
            .unwrap();

        assert_eq!(summary.end, RunEnd::FitnessThreshold);
        assert_eq!(summary.generations, 4);
        assert_eq!(summary.winner.unwrap().fitness, Some(3.0));
    }

    #[test]
    fn test_run_generation_limit() {
        let mut pop = population(small_config());
        let summary = pop
            .run(
                |_, genomes| {
                    for genome in genomes.iter_mut() {
                        genome.fitness = Some(0.0);
                    }
                    Ok(GenerationOutcome::Continue)
                },
                3,
            )
            .unwrap();

        assert_eq!(summary.end, RunEnd::GenerationLimit);
        assert_eq!(summary.generations, 3);
        assert_eq!(pop.generation(), 2);
    }

    #[test]
    fn test_run_finish_and_abort() {
        let mut pop = population(small_config());
        let summary = pop
            .run(
                |_, genomes| {
                    for genome in genomes.iter_mut() {
                        genome.fitness = Some(1.0);
                    }
                    Ok(GenerationOutcome::Finish)
                },
                10,
            )
            .unwrap();
        assert_eq!(summary.end, RunEnd::Finished);
        assert_eq!(summary.generations, 1);

        let mut pop = population(small_config());
        let summary = pop.run(|_, _| Ok(GenerationOutcome::Abort), 10).unwrap();
        assert_eq!(summary.end, RunEnd::Aborted);
        assert!(summary.winner.is_none());
    }

    fn score_all(pop: &mut Population, fitness: f64) {
        for genome in pop.genomes_mut() {
            genome.fitness = Some(fitness);
        }
    }

    #[test]
    fn test_begin_generation_clears_fitness() {
        let mut pop = population(small_config());
        score_all(&mut pop, 4.0);
        pop.begin_generation();
        assert!(pop.genomes().iter().all(|g| g.fitness.is_none()));
    }

    #[test]
    fn test_conclude_generation_breeds_when_nothing_stops() {
        let mut pop = population(small_config());
        score_all(&mut pop, 1.0);

        let verdict = pop
            .conclude_generation(GenerationOutcome::Continue, 1, 5)
            .unwrap();

        assert!(verdict.end.is_none());
        assert_eq!(verdict.report.unwrap().generation, 0);
        assert_eq!(pop.generation(), 1);
    }

    #[test]
    fn test_conclude_generation_stop_order() {
        // Abort wins and records nothing
        let mut pop = population(small_config());
        let verdict = pop.conclude_generation(GenerationOutcome::Abort, 1, 5).unwrap();
        assert_eq!(verdict.end, Some(RunEnd::Aborted));
        assert!(verdict.report.is_none());
        assert!(pop.best().is_none());

        // Finish beats the fitness threshold
        let mut pop = population(EvolutionConfig {
            fitness_threshold: 2.0,
            ..small_config()
        });
        score_all(&mut pop, 5.0);
        let verdict = pop.conclude_generation(GenerationOutcome::Finish, 5, 5).unwrap();
        assert_eq!(verdict.end, Some(RunEnd::Finished));

        // Threshold beats the generation limit
        let mut pop = population(EvolutionConfig {
            fitness_threshold: 2.0,
            ..small_config()
        });
        score_all(&mut pop, 5.0);
        let verdict = pop.conclude_generation(GenerationOutcome::Continue, 5, 5).unwrap();
        assert_eq!(verdict.end, Some(RunEnd::FitnessThreshold));

        // The last generation is not bred past
        let mut pop = population(small_config());
        score_all(&mut pop, 0.0);
        let verdict = pop.conclude_generation(GenerationOutcome::Continue, 5, 5).unwrap();
        assert_eq!(verdict.end, Some(RunEnd::GenerationLimit));
        assert_eq!(pop.generation(), 0);
    }

    #[test]
    fn test_run_propagates_missing_fitness() {
        let mut pop = population(small_config());
        let result = pop.run(|_, _| Ok(GenerationOutcome::Continue), 5);
        assert!(result.is_err());
    }
}
