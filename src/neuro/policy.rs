use burn::tensor::backend::Backend;

use super::network::FeedForwardNetwork;
use super::observation::Observation;

/// Network output above which a bird flaps
pub const JUMP_THRESHOLD: f32 = 0.5;

/// Anything that can decide, from one observation, whether to flap
pub trait Policy {
    fn decide(&mut self, observation: &Observation) -> bool;
}

impl<F> Policy for F
where
    F: FnMut(&Observation) -> bool,
{
    fn decide(&mut self, observation: &Observation) -> bool {
        self(observation)
    }
}

/// Policy backed by an evolved feed-forward network
///
/// Feeds the observation through the network and flaps when the first
/// output exceeds [`JUMP_THRESHOLD`]. Holds no state between calls.
#[derive(Debug, Clone)]
pub struct NetworkPolicy<B: Backend> {
    network: FeedForwardNetwork<B>,
}

impl<B: Backend> NetworkPolicy<B> {
    pub fn new(network: FeedForwardNetwork<B>) -> Self {
        Self { network }
    }

    pub fn network(&self) -> &FeedForwardNetwork<B> {
        &self.network
    }
}

impl<B: Backend> Policy for NetworkPolicy<B> {
    fn decide(&mut self, observation: &Observation) -> bool {
        self.network.activate(&observation.to_array()) > JUMP_THRESHOLD
    }
}
