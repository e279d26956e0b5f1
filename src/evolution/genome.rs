use rand::Rng;
use rand_distr::StandardNormal;

use super::config::EvolutionConfig;

pub type GenomeId = u64;

/// Flat parameter vector for a fixed-topology network, plus its fitness
#[derive(Debug, Clone, PartialEq)]
pub struct Genome {
    id: GenomeId,
    weights: Vec<f32>,
    /// Set by the evaluator each generation
    pub fitness: Option<f64>,
}

impl Genome {
    pub fn new(id: GenomeId, weights: Vec<f32>) -> Self {
        Self {
            id,
            weights,
            fitness: None,
        }
    }

    /// Draw every parameter from N(0, weight_init_stdev)
    pub fn random<R: Rng + ?Sized>(id: GenomeId, config: &EvolutionConfig, rng: &mut R) -> Self {
        let count = config.network.parameter_count();
        let weights = (0..count).map(|_| fresh_weight(config, rng)).collect();
        Self::new(id, weights)
    }

    /// Child taking each parameter from either parent with equal chance
    pub fn crossover<R: Rng + ?Sized>(id: GenomeId, a: &Genome, b: &Genome, rng: &mut R) -> Self {
        debug_assert_eq!(a.weights.len(), b.weights.len());
        let weights = a
            .weights
            .iter()
            .zip(&b.weights)
            .map(|(&wa, &wb)| if rng.gen_bool(0.5) { wa } else { wb })
            .collect();
        Self::new(id, weights)
    }

    /// Copy of this genome's parameters under a new id
    pub fn offspring(&self, id: GenomeId) -> Self {
        Self::new(id, self.weights.clone())
    }

    /// Perturb or replace parameters according to the configured rates
    pub fn mutate<R: Rng + ?Sized>(&mut self, config: &EvolutionConfig, rng: &mut R) {
        for weight in &mut self.weights {
            let roll: f64 = rng.gen();
            if roll < config.weight_mutate_rate {
                let z: f32 = rng.sample(StandardNormal);
                *weight += z * config.weight_mutate_power;
            } else if roll < config.weight_mutate_rate + config.weight_replace_rate {
                *weight = fresh_weight(config, rng);
            }
            *weight = weight.clamp(config.weight_min, config.weight_max);
        }
    }

    pub fn id(&self) -> GenomeId {
        self.id
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}

fn fresh_weight<R: Rng + ?Sized>(config: &EvolutionConfig, rng: &mut R) -> f32 {
    let z: f32 = rng.sample(StandardNormal);
    (z * config.weight_init_stdev).clamp(config.weight_min, config.weight_max)
}
