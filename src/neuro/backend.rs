//! Backend type alias and device helper
//!
//! Policies only ever run forward passes over a handful of values, so the
//! plain CPU NdArray backend without autodiff is all the simulation needs.

use burn::backend::ndarray::{NdArray, NdArrayDevice};

/// Backend used to evaluate evolved networks
pub type InferenceBackend = NdArray<f32>;

/// Get the default (CPU) device
pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}
