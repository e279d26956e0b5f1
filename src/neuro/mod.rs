//! Policies: how an evolved network turns what a bird sees into a flap
//!
//! Provides:
//! - the fixed 3-value observation
//! - the `Policy` capability trait and its network-backed adapter
//! - a burn feed-forward network built from a genome

pub mod backend;
pub mod network;
pub mod observation;
pub mod policy;

pub use backend::{InferenceBackend, default_device};
pub use network::FeedForwardNetwork;
pub use observation::{OBSERVATION_SIZE, Observation, create_observation};
pub use policy::{JUMP_THRESHOLD, NetworkPolicy, Policy};
