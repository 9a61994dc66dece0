use anyhow::Context;
use clap::Parser;
use classifier::{
    ClassifierConfig, Classifier, ClassifyError, CpuPreProcessor, LabelTable, Presenter,
    RawImage, backend::InferenceBackend, logging::setup_logging,
};
use std::path::PathBuf;

#[cfg(feature = "ort-backend")]
use classifier::backend::ort::OrtBackend as Backend;

#[cfg(not(feature = "ort-backend"))]
compile_error!("The 'ort-backend' feature must be enabled to build the classify binary");

/// Classify an image with a pretrained network and print the most probable labels.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Image to classify
    image: PathBuf,

    /// Write the image with the top label drawn on it to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of predictions to print (defaults to TOP_K)
    #[arg(short = 'k', long)]
    top_k: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => return Err(ClassifyError::Usage(e.render().to_string()).into()),
    };

    let config = ClassifierConfig::from_env()?;

    setup_logging(&config);

    tracing::info!(config = ?config, "Loaded configuration");

    let image = image::open(&cli.image)
        .with_context(|| format!("Failed to read image {}", cli.image.display()))?
        .to_rgb8();

    let labels = LabelTable::load(&config.labels_path)?;

    tracing::info!("Loading inference model");
    let backend = Backend::load_model(&config.model)?;

    let preprocessor = CpuPreProcessor::new(config.input_size, config.mean, config.channel_order);
    let mut classifier = Classifier::new(backend, preprocessor, labels);

    let k = cli.top_k.unwrap_or(config.top_k);
    let ranked = classifier.classify(&RawImage::rgb(&image, image.width(), image.height()), k)?;

    for prediction in &ranked {
        println!(
            "{} = {:.6}, name: {}",
            prediction.index, prediction.score, prediction.label
        );
    }

    if let (Some(output), Some(top)) = (cli.output.as_deref(), ranked.first()) {
        Presenter::from_font_path(config.font_path.as_deref()).present(image, top, output)?;
    }

    Ok(())
}
