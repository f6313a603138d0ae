use crate::session;
use eyre::{bail, Context, ContextCompat, Result};
use ndarray::Array2;
use ort::session::Session;
use std::path::PathBuf;

/// Sample rate the fbank front end is tuned for.
pub const MODEL_SAMPLE_RATE: u32 = 16000;

/// Turns mono audio into a fixed-length speaker vector.
///
/// One instance serves a whole run. `embed` takes `&mut self` because a
/// model session is not assumed to be reentrant.
pub trait Embedder {
    fn embed(&mut self, samples: &[f32], sample_rate: u32) -> Result<Vec<f32>>;
}

impl<F> Embedder for F
where
    F: FnMut(&[f32], u32) -> Result<Vec<f32>>,
{
    fn embed(&mut self, samples: &[f32], sample_rate: u32) -> Result<Vec<f32>> {
        self(samples, sample_rate)
    }
}

#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub model: PathBuf,
    pub num_threads: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from("models/campplus.onnx"),
            num_threads: 4,
        }
    }
}

/// CAM++ speaker embedding model running on ONNX Runtime.
#[derive(Debug)]
pub struct EmbeddingExtractor {
    session: Session,
}

impl EmbeddingExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        if !config.model.exists() {
            bail!("model file not found: {}", config.model.display());
        }
        let session = session::create_session(&config.model, config.num_threads)?;
        tracing::debug!(model = %config.model.display(), "embedding model loaded");
        Ok(Self { session })
    }

    pub fn compute(&mut self, samples: &[f32], sample_rate: u32) -> Result<Vec<f32>> {
        if sample_rate != MODEL_SAMPLE_RATE {
            tracing::warn!(
                sample_rate,
                expected = MODEL_SAMPLE_RATE,
                "clip is not at the model sample rate, features may be off"
            );
        }

        let features: Array2<f32> = knf_rs::compute_fbank(samples)?;
        let features = features.insert_axis(ndarray::Axis(0)); // Add batch dimension
        let inputs = ort::inputs!["feats" => features.view()]?;

        let ort_outs = self.session.run(inputs)?;
        let ort_out = ort_outs
            .get("embs")
            .context("Output tensor not found")?
            .try_extract_tensor::<f32>()
            .context("Failed to extract tensor")?;

        Ok(ort_out.iter().copied().collect())
    }
}

impl Embedder for EmbeddingExtractor {
    fn embed(&mut self, samples: &[f32], sample_rate: u32) -> Result<Vec<f32>> {
        self.compute(samples, sample_rate)
    }
}
