use crate::builder::ActorEntry;
use crate::embedding::ExtractorConfig;
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything a run needs, usually read from a TOML file.
///
/// ```toml
/// model = "models/campplus.onnx"
/// audio_dir = "voice-clips"
/// output = "output/actor-memory.json"
/// num_threads = 4
///
/// [[actors]]
/// file = "diavolo.wav"
/// name = "Katsuyuki Konishi"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: PathBuf,
    pub audio_dir: PathBuf,
    pub output: PathBuf,
    pub num_threads: usize,
    pub actors: Vec<ActorEntry>,
}

impl Default for Config {
    fn default() -> Self {
        let extractor = ExtractorConfig::default();
        Self {
            model: extractor.model,
            audio_dir: PathBuf::from("voice-clips"),
            output: PathBuf::from("output/actor-memory.json"),
            num_threads: extractor.num_threads,
            actors: default_actors(),
        }
    }
}

fn default_actors() -> Vec<ActorEntry> {
    vec![
        ActorEntry::new("diavolo.wav", "Katsuyuki Konishi"),
        ActorEntry::new("toji.wav", "Takehito Koyasu"),
        ActorEntry::new("daki.wav", "Miyuki Sawashiro"),
    ]
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&text).wrap_err_with(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Full path of a clip inside the audio directory.
    pub fn resolve(&self, file: &str) -> PathBuf {
        self.audio_dir.join(file)
    }

    pub fn extractor(&self) -> ExtractorConfig {
        ExtractorConfig {
            model: self.model.clone(),
            num_threads: self.num_threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_three_actors() {
        let config = Config::default();
        let names: Vec<_> = config.actors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            ["Katsuyuki Konishi", "Takehito Koyasu", "Miyuki Sawashiro"]
        );
        assert_eq!(config.model, PathBuf::from("models/campplus.onnx"));
        assert_eq!(config.output, PathBuf::from("output/actor-memory.json"));
        assert_eq!(config.num_threads, 4);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn actor_order_follows_the_file() {
        let config = Config::from_toml(
            r#"
            audio_dir = "clips"

            [[actors]]
            file = "zeta.wav"
            name = "Zeta"

            [[actors]]
            file = "alpha.wav"
            name = "Alpha"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.actors,
            vec![
                ActorEntry::new("zeta.wav", "Zeta"),
                ActorEntry::new("alpha.wav", "Alpha"),
            ]
        );
        assert_eq!(config.resolve("zeta.wav"), PathBuf::from("clips/zeta.wav"));
        assert_eq!(config.model, PathBuf::from("models/campplus.onnx"));
    }

    #[test]
    fn bad_types_are_rejected() {
        assert!(Config::from_toml("num_threads = \"many\"").is_err());
    }

    #[test]
    fn extractor_uses_model_and_threads() {
        let config = Config::from_toml("model = \"m.onnx\"\nnum_threads = 2").unwrap();
        let extractor = config.extractor();
        assert_eq!(extractor.model, PathBuf::from("m.onnx"));
        assert_eq!(extractor.num_threads, 2);
    }
}
