//! Fixed-topology neuro-evolution
//!
//! Genomes are flat parameter vectors for a [`NetworkConfig`] topology. A
//! [`Population`] evaluates them through a caller-supplied closure and breeds
//! the next generation from the fittest.

pub mod config;
pub mod genome;
pub mod population;

pub use config::{Activation, EvolutionConfig, NetworkConfig};
pub use genome::{Genome, GenomeId};
pub use population::{
    GenerationOutcome, GenerationReport, GenerationVerdict, Population, RunEnd, RunSummary,
};
