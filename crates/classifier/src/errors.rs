use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("resource not found: {}: {source}", .path.display())]
    ResourceNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("label table has {labels} entries but the model produced {scores} scores")]
    LabelMismatch { scores: usize, labels: usize },

    #[error("usage error: {0}")]
    Usage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("inference failed: {0}")]
    Inference(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl From<preprocess::PreprocessError> for ClassifyError {
    fn from(err: preprocess::PreprocessError) -> Self {
        ClassifyError::InvalidImage(err.to_string())
    }
}

impl ClassifyError {
    pub fn not_found(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ClassifyError::ResourceNotFound {
            path: path.into(),
            source,
        }
    }
}
