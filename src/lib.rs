mod session;

mod builder;
mod config;
mod database;
mod embedding;
mod error;
pub mod logging;
mod wav;

pub use builder::{build_database, ActorEntry, BuildReport, EntryOutcome};
pub use config::Config;
pub use database::{EmbeddingDatabase, EmbeddingRecord};
pub use embedding::{Embedder, EmbeddingExtractor, ExtractorConfig, MODEL_SAMPLE_RATE};
pub use error::{DatabaseError, LoadError};
pub use wav::{downmix_stereo, read_wav, AudioBuffer, I16_SCALE};
