pub mod backend;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod labels;
pub mod logging;
pub mod postprocessing;
pub mod presenter;

// Re-export commonly used types for convenience
pub use backend::{InferenceBackend, ScoreVector};
pub use classifier::Classifier;
pub use config::{ClassifierConfig, ModelConfig};
pub use errors::ClassifyError;
pub use labels::LabelTable;
pub use postprocessing::{RankedPrediction, rank_topk};
pub use presenter::Presenter;
pub use preprocess::{CpuPreProcessor, RawImage, Tensor};
