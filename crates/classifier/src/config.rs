use crate::errors::ClassifyError;
use preprocess::{ChannelOrder, DEFAULT_INPUT_SIZE, DEFAULT_MEAN};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub use common::Environment;

pub const DEFAULT_TOP_K: usize = 3;

/// What the inference backend needs to load and bind a model.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model_path: PathBuf,
    pub input_name: String,
    pub output_name: String,
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub environment: Environment,
    pub model: ModelConfig,
    pub labels_path: PathBuf,
    pub input_size: (u32, u32),
    pub mean: [f32; 3],
    pub channel_order: ChannelOrder,
    pub top_k: usize,
    pub font_path: Option<PathBuf>,
}

impl ClassifierConfig {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Result<Self, ClassifyError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClassifyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .map(|v| Environment::parse(&v))
            .unwrap_or(Environment::Development);

        let model = ModelConfig {
            model_path: lookup("MODEL_PATH")
                .unwrap_or_else(|| "models/squeezenet_v1.1.onnx".to_string())
                .into(),
            input_name: lookup("INPUT_NAME").unwrap_or_else(|| "data".to_string()),
            output_name: lookup("OUTPUT_NAME").unwrap_or_else(|| "prob".to_string()),
        };

        let labels_path = lookup("LABELS_PATH")
            .unwrap_or_else(|| "synset_words.txt".to_string())
            .into();

        let input_width = parse_or(&lookup, "INPUT_WIDTH", DEFAULT_INPUT_SIZE.0);
        let input_height = parse_or(&lookup, "INPUT_HEIGHT", DEFAULT_INPUT_SIZE.1);

        let mean = match lookup("MEAN_VALUES") {
            Some(value) => parse_mean(&value)?,
            None => DEFAULT_MEAN,
        };

        let channel_order = match lookup("CHANNEL_ORDER") {
            Some(value) => ChannelOrder::parse(&value).ok_or_else(|| {
                ClassifyError::Config(format!("CHANNEL_ORDER must be 'rgb' or 'bgr', got '{value}'"))
            })?,
            None => ChannelOrder::default(),
        };

        let top_k = parse_or(&lookup, "TOP_K", DEFAULT_TOP_K);

        let font_path = lookup("FONT_PATH").map(PathBuf::from);

        Ok(Self {
            environment,
            model,
            labels_path,
            input_size: (input_width, input_height),
            mean,
            channel_order,
            top_k,
            font_path,
        })
    }

    /// Create default configuration for testing
    #[cfg(test)]
    pub fn test_default() -> Self {
        Self {
            environment: Environment::Development,
            model: ModelConfig {
                model_path: "/models/squeezenet_v1.1.onnx".into(),
                input_name: "data".to_string(),
                output_name: "prob".to_string(),
            },
            labels_path: "synset_words.txt".into(),
            input_size: DEFAULT_INPUT_SIZE,
            mean: DEFAULT_MEAN,
            channel_order: ChannelOrder::Bgr,
            top_k: DEFAULT_TOP_K,
            font_path: None,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_mean(value: &str) -> Result<[f32; 3], ClassifyError> {
    let parsed: Vec<f32> = value
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .map_err(|e| ClassifyError::Config(format!("MEAN_VALUES '{value}': {e}")))?;

    parsed.try_into().map_err(|v: Vec<f32>| {
        ClassifyError::Config(format!(
            "MEAN_VALUES needs 3 comma-separated values, got {}",
            v.len()
        ))
    })
}
