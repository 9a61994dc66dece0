use super::{InferenceBackend, ScoreVector};
use crate::config::ModelConfig;
use crate::errors::ClassifyError;
use common::span;
use ndarray::Axis;
use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};
use preprocess::Tensor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionProvider {
    Cpu,
    Cuda,
}

impl ExecutionProvider {
    /// The provider this binary was built for.
    pub fn compiled() -> Self {
        if cfg!(feature = "cuda") {
            ExecutionProvider::Cuda
        } else {
            ExecutionProvider::Cpu
        }
    }
}

pub struct OrtBackend {
    session: Session,
    input_name: String,
    output_name: String,
}

impl OrtBackend {
    /// Load model with specified execution provider
    pub fn load_model_with_provider(
        config: &ModelConfig,
        provider: ExecutionProvider,
    ) -> anyhow::Result<Self> {
        std::fs::metadata(&config.model_path)
            .map_err(|e| ClassifyError::not_found(&config.model_path, e))?;

        // Initialize ORT environment (idempotent)
        let _ = ort::init().commit();

        let mut builder = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?;

        match provider {
            ExecutionProvider::Cuda => {
                tracing::info!("Initializing ONNX Runtime with CUDA execution provider");
                builder = builder.with_execution_providers([
                    ort::execution_providers::CUDAExecutionProvider::default()
                        .with_device_id(0)
                        .build()
                        .error_on_failure(),
                ])?;
            }
            ExecutionProvider::Cpu => {
                tracing::info!("Initializing ONNX Runtime with CPU execution provider");
            }
        }

        let session = builder.commit_from_file(&config.model_path)?;

        tracing::info!(
            model_path = %config.model_path.display(),
            input = %config.input_name,
            output = %config.output_name,
            "Model loaded"
        );

        Ok(Self {
            session,
            input_name: config.input_name.clone(),
            output_name: config.output_name.clone(),
        })
    }
}

impl InferenceBackend for OrtBackend {
    fn load_model(config: &ModelConfig) -> anyhow::Result<Self> {
        Self::load_model_with_provider(config, ExecutionProvider::compiled())
    }

    fn infer(&mut self, input: &Tensor) -> anyhow::Result<ScoreVector> {
        let _s = span!("ort_infer");

        // The network expects NCHW with a batch of one
        let batched = input.view().insert_axis(Axis(0));

        let outputs = self.session.run(ort::inputs![
            self.input_name.as_str() => TensorRef::from_array_view(batched)?
        ])?;

        let scores = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| anyhow::anyhow!("model has no output named '{}'", self.output_name))?
            .try_extract_array::<f32>()?;

        tracing::debug!(shape = ?scores.shape(), "Extracted output tensor");

        Ok(scores.iter().copied().collect())
    }
}
