use std::{fs, path::PathBuf};

use actor_memory::{build_database, logging, Config, EmbeddingExtractor};
use clap::Parser;
use eyre::{bail, Result, WrapErr};

/// Build a speaker embedding database from actor voice clips.
#[derive(Parser, Debug)]
#[command(name = "actor-memory")]
#[command(about = "Build a speaker embedding database from actor voice clips")]
struct Args {
    /// TOML config file (default: built-in actor list)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CAM++ ONNX model path
    #[arg(long)]
    model: Option<PathBuf>,

    /// Folder holding the reference clips
    #[arg(long)]
    audio_dir: Option<PathBuf>,

    /// Output JSON file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Intra-op threads for the model
    #[arg(long)]
    threads: Option<usize>,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(audio_dir) = self.audio_dir {
            config.audio_dir = audio_dir;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(threads) = self.threads {
            config.num_threads = threads;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    logging::init()?;
    let config = Args::parse().into_config()?;

    if !config.model.exists() {
        bail!(
            "model file not found: {} (download the CAM++ ONNX model first)",
            config.model.display()
        );
    }

    if !config.audio_dir.exists() {
        fs::create_dir_all(&config.audio_dir)
            .wrap_err_with(|| format!("failed to create {}", config.audio_dir.display()))?;
        tracing::info!(
            dir = %config.audio_dir.display(),
            "created audio folder, place the wav clips there and run again"
        );
        return Ok(());
    }

    tracing::info!(model = %config.model.display(), "loading embedding model");
    let mut extractor = EmbeddingExtractor::new(config.extractor())?;

    tracing::info!(
        dir = %config.audio_dir.display(),
        actors = config.actors.len(),
        "scanning clips"
    );
    let report = build_database(&config.actors, |file| config.resolve(file), &mut extractor)?;
    let database = report.into_database();

    if let Some(parent) = config.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
        }
    }
    database
        .save(&config.output)
        .wrap_err_with(|| format!("failed to write {}", config.output.display()))?;

    tracing::info!(
        actors = database.len(),
        output = %config.output.display(),
        "saved database"
    );
    Ok(())
}
