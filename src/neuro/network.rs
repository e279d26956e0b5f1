//! Feed-forward network materialised from a genome
//!
//! A genome is a flat list of parameters. For each layer, in order, it holds
//! the `inputs x outputs` weight matrix (row-major, one row per input) followed
//! by one bias per output. The network copies those values into burn tensors
//! once per episode and then runs a forward pass every tick.
//!
//! # Example
//!
//! ```rust
//! use flappy_evo::evolution::{Genome, NetworkConfig};
//! use flappy_evo::neuro::{FeedForwardNetwork, InferenceBackend, default_device};
//!
//! let topology = NetworkConfig::default();
//! let genome = Genome::new(0, vec![0.0; topology.parameter_count()]);
//! let network =
//!     FeedForwardNetwork::<InferenceBackend>::from_genome(&genome, &topology, &default_device())
//!         .unwrap();
//!
//! assert_eq!(network.activate(&[350.0, 50.0, 150.0]), 0.0);
//! ```

use anyhow::{Result, ensure};
use burn::tensor::{
    ElementConversion, Tensor, TensorData,
    activation::{relu, sigmoid, tanh},
    backend::Backend,
};

use crate::evolution::{Activation, Genome, NetworkConfig};

/// One fully connected layer
#[derive(Debug, Clone)]
struct DenseLayer<B: Backend> {
    /// [inputs, outputs]
    weights: Tensor<B, 2>,
    /// [1, outputs]
    bias: Tensor<B, 2>,
}

/// Fixed-topology feed-forward network
#[derive(Debug, Clone)]
pub struct FeedForwardNetwork<B: Backend> {
    layers: Vec<DenseLayer<B>>,
    activation: Activation,
    inputs: usize,
    device: B::Device,
}

impl<B: Backend> FeedForwardNetwork<B> {
    /// Build the network described by `topology` from the genome's parameters
    pub fn from_genome(
        genome: &Genome,
        topology: &NetworkConfig,
        device: &B::Device,
    ) -> Result<Self> {
        let params = genome.weights();
        ensure!(
            params.len() == topology.parameter_count(),
            "genome {} has {} parameters, topology needs {}",
            genome.id(),
            params.len(),
            topology.parameter_count()
        );

        let mut layers = Vec::new();
        let mut offset = 0;
        for (inputs, outputs) in topology.layer_shapes() {
            let weight_end = offset + inputs * outputs;
            let bias_end = weight_end + outputs;

            let weights = TensorData::new(params[offset..weight_end].to_vec(), [inputs, outputs]);
            let bias = TensorData::new(params[weight_end..bias_end].to_vec(), [1, outputs]);

            layers.push(DenseLayer {
                weights: Tensor::<B, 2>::from_data(weights, device),
                bias: Tensor::<B, 2>::from_data(bias, device),
            });
            offset = bias_end;
        }

        Ok(Self {
            layers,
            activation: topology.activation,
            inputs: topology.inputs,
            device: device.clone(),
        })
    }

    /// Forward pass over a batch: [batch, inputs] -> [batch, outputs]
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        self.layers.iter().fold(input, |x, layer| {
            let z = x.matmul(layer.weights.clone()) + layer.bias.clone();
            self.activation.apply(z)
        })
    }

    /// Run a single observation through the network and return the first output
    pub fn activate(&self, inputs: &[f32]) -> f32 {
        debug_assert_eq!(inputs.len(), self.inputs);

        let data = TensorData::new(inputs.to_vec(), [1, inputs.len()]);
        let input = Tensor::<B, 2>::from_data(data, &self.device);

        self.forward(input)
            .slice([0..1, 0..1])
            .into_scalar()
            .elem::<f32>()
    }

    /// Number of layers, hidden and output
    pub fn depth(&self) -> usize {
        self.layers.len()
    }
}

impl Activation {
    fn apply<B: Backend>(self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        match self {
            Activation::Tanh => tanh(x),
            Activation::Sigmoid => sigmoid(x),
            Activation::Relu => relu(x),
        }
    }
}
