use crate::config::ModelConfig;
use preprocess::Tensor;

#[cfg(feature = "ort-backend")]
pub mod ort;

/// One score per class, in the class order the model was trained with.
pub type ScoreVector = Vec<f32>;

/// A loaded network that maps one input tensor to one score vector.
///
/// Implementations own their runtime state (session, weights, device buffers);
/// the caller owns the backend and decides its lifetime.
pub trait InferenceBackend {
    fn load_model(config: &ModelConfig) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Run one forward pass on a `(3, height, width)` tensor.
    fn infer(&mut self, input: &Tensor) -> anyhow::Result<ScoreVector>;
}
