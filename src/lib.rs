//! Flappy Evo - a side scroller where neural policies learn to fly
//!
//! This library provides:
//! - Core simulation: physics, pipes, floor and the per-tick arena (game module)
//! - Policies: observations and burn networks built from genomes (neuro module)
//! - A fixed-topology neuro-evolution search (evolution module)
//! - The driver that evaluates one generation per episode (driver module)
//! - Terminal rendering, input and the train/watch modes

pub mod config;
pub mod driver;
pub mod evolution;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod neuro;
pub mod render;
