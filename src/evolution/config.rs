//! Neuro-evolution hyperparameter configuration

use serde::{Deserialize, Serialize};

use crate::neuro::OBSERVATION_SIZE;

/// Activation function applied after every layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Tanh,
    Sigmoid,
    Relu,
}

/// Shape of the policy networks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Number of inputs (fixed by the observation)
    pub inputs: usize,
    /// Number of outputs; the first one drives the flap decision
    pub outputs: usize,
    /// Sizes of the hidden layers, empty for a direct input-to-output net
    pub hidden_layers: Vec<usize>,
    pub activation: Activation,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            inputs: OBSERVATION_SIZE,
            outputs: 1,
            hidden_layers: Vec::new(),
            activation: Activation::Tanh,
        }
    }
}

impl NetworkConfig {
    /// (inputs, outputs) of every layer, first to last
    pub fn layer_shapes(&self) -> Vec<(usize, usize)> {
        let mut sizes = Vec::with_capacity(self.hidden_layers.len() + 2);
        sizes.push(self.inputs);
        sizes.extend(&self.hidden_layers);
        sizes.push(self.outputs);
        sizes.windows(2).map(|pair| (pair[0], pair[1])).collect()
    }

    /// Total weights and biases a genome must carry
    pub fn parameter_count(&self) -> usize {
        self.layer_shapes()
            .iter()
            .map(|(inputs, outputs)| inputs * outputs + outputs)
            .sum()
    }
}

/// Configuration for the evolutionary search
///
/// Defaults follow the usual feed-forward setup for this game: 50 genomes,
/// 50 generations, and a run that ends once any genome reaches a fitness
/// of 100.
///
/// # Example
///
/// ```rust
/// use flappy_evo::evolution::EvolutionConfig;
///
/// let config = EvolutionConfig {
///     population_size: 20,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Genomes per generation
    ///
    /// Default: 50
    pub population_size: usize,

    /// Generations to run before giving up
    ///
    /// Default: 50
    pub max_generations: usize,

    /// Stop once the best genome of a generation reaches this fitness
    ///
    /// Default: 100.0
    pub fitness_threshold: f64,

    /// Best genomes copied unchanged into the next generation
    ///
    /// Default: 2
    pub elitism: usize,

    /// Fraction of the ranked population allowed to reproduce
    ///
    /// Default: 0.2
    pub survival_threshold: f64,

    /// Chance a child mixes two parents instead of cloning one
    ///
    /// Default: 0.75
    pub crossover_rate: f64,

    /// Per-weight chance of a gaussian nudge
    ///
    /// Default: 0.8
    pub weight_mutate_rate: f64,

    /// Standard deviation of the nudge
    ///
    /// Default: 0.5
    pub weight_mutate_power: f32,

    /// Per-weight chance of being redrawn from scratch
    ///
    /// Default: 0.1
    pub weight_replace_rate: f64,

    /// Standard deviation of freshly drawn weights
    ///
    /// Default: 1.0
    pub weight_init_stdev: f32,

    /// Weights are clamped to [weight_min, weight_max]
    ///
    /// Default: -30.0
    pub weight_min: f32,

    /// Default: 30.0
    pub weight_max: f32,

    pub network: NetworkConfig,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 50,
            fitness_threshold: 100.0,
            elitism: 2,
            survival_threshold: 0.2,
            crossover_rate: 0.75,
            weight_mutate_rate: 0.8,
            weight_mutate_power: 0.5,
            weight_replace_rate: 0.1,
            weight_init_stdev: 1.0,
            weight_min: -30.0,
            weight_max: 30.0,
            network: NetworkConfig::default(),
        }
    }
}

impl EvolutionConfig {
    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size == 0 {
            return Err("population_size must be at least 1".to_string());
        }

        if self.max_generations == 0 {
            return Err("max_generations must be at least 1".to_string());
        }

        if self.elitism > self.population_size {
            return Err(format!(
                "elitism ({}) cannot exceed population_size ({})",
                self.elitism, self.population_size
            ));
        }

        if !self.fitness_threshold.is_finite() {
            return Err(format!(
                "fitness_threshold must be a finite number, got {}",
                self.fitness_threshold
            ));
        }

        if !(self.survival_threshold > 0.0 && self.survival_threshold <= 1.0) {
            return Err(format!(
                "survival_threshold must be in (0, 1], got {}",
                self.survival_threshold
            ));
        }

        for (name, rate) in [
            ("crossover_rate", self.crossover_rate),
            ("weight_mutate_rate", self.weight_mutate_rate),
            ("weight_replace_rate", self.weight_replace_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(format!("{} must be in [0, 1], got {}", name, rate));
            }
        }

        for (name, value) in [
            ("weight_mutate_power", self.weight_mutate_power),
            ("weight_init_stdev", self.weight_init_stdev),
            ("weight_min", self.weight_min),
            ("weight_max", self.weight_max),
        ] {
            if !value.is_finite() {
                return Err(format!("{} must be a finite number, got {}", name, value));
            }
        }

        if self.weight_mutate_power < 0.0 || self.weight_init_stdev < 0.0 {
            return Err("weight standard deviations must be non-negative".to_string());
        }

        // NaN already rejected above, so this is a total order
        if self.weight_min >= self.weight_max {
            return Err(format!(
                "weight_min ({}) must be below weight_max ({})",
                self.weight_min, self.weight_max
            ));
        }

        if self.network.inputs != OBSERVATION_SIZE {
            return Err(format!(
                "network.inputs must be {} to match the observation, got {}",
                OBSERVATION_SIZE, self.network.inputs
            ));
        }

        if self.network.outputs != 1 {
            return Err(format!(
                "network.outputs must be 1, got {}",
                self.network.outputs
            ));
        }

        if self.network.hidden_layers.contains(&0) {
            return Err("hidden layers must have at least one neuron".to_string());
        }

        Ok(())
    }
}
