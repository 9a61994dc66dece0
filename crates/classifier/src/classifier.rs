use crate::{
    backend::InferenceBackend,
    errors::ClassifyError,
    labels::LabelTable,
    postprocessing::{RankedPrediction, rank_topk},
};
use preprocess::{CpuPreProcessor, Preprocess, RawImage};
use std::time::Instant;

/// Runs preprocess, inference and ranking for one image at a time.
///
/// Owns the backend handle, so several classifiers (different models or
/// backends) can live side by side. Nothing but the handle survives a call:
/// each classification allocates its own tensor and score vector.
pub struct Classifier<B: InferenceBackend, P: Preprocess = CpuPreProcessor> {
    backend: B,
    preprocessor: P,
    labels: LabelTable,
}

impl<B: InferenceBackend, P: Preprocess> Classifier<B, P> {
    pub fn new(backend: B, preprocessor: P, labels: LabelTable) -> Self {
        Self {
            backend,
            preprocessor,
            labels,
        }
    }

    /// Classify one image and return the `k` most probable labels, best first.
    #[tracing::instrument(
        skip(self, image),
        fields(width = image.width, height = image.height)
    )]
    pub fn classify(
        &mut self,
        image: &RawImage,
        k: usize,
    ) -> Result<Vec<RankedPrediction>, ClassifyError> {
        let start = Instant::now();
        let tensor = self.preprocessor.preprocess(image)?;
        let preprocess_time = start.elapsed();

        let start = Instant::now();
        let scores = self
            .backend
            .infer(&tensor)
            .map_err(|e| ClassifyError::Inference(e.into()))?;
        let inference_time = start.elapsed();
        drop(tensor);

        let start = Instant::now();
        let ranked = rank_topk(&scores, &self.labels, k)?;
        let ranking_time = start.elapsed();

        tracing::debug!(
            preprocess_ms = preprocess_time.as_secs_f64() * 1000.0,
            inference_ms = inference_time.as_secs_f64() * 1000.0,
            ranking_ms = ranking_time.as_secs_f64() * 1000.0,
            classes = scores.len(),
            "Classification complete"
        );

        Ok(ranked)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
