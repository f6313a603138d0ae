use crate::database::{EmbeddingDatabase, EmbeddingRecord};
use crate::embedding::Embedder;
use crate::error::LoadError;
use crate::wav;
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A reference clip and the actor it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorEntry {
    pub file: String,
    pub name: String,
}

impl ActorEntry {
    pub fn new(file: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            name: name.into(),
        }
    }
}

/// What happened to one entry during a build.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Added { name: String, dimension: usize },
    /// The clip does not exist yet.
    Skipped { file: String, path: PathBuf },
    Failed { file: String, error: LoadError },
}

impl EntryOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub database: EmbeddingDatabase,
    pub outcomes: Vec<EntryOutcome>,
}

impl BuildReport {
    pub fn added(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_added()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EntryOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EntryOutcome::Failed { .. }))
            .count()
    }

    pub fn into_database(self) -> EmbeddingDatabase {
        self.database
    }
}

/// Embed every entry's clip, in order, into a fresh database.
///
/// Missing and unreadable clips are recorded in the report and left out of
/// the database. Errors from the embedder or the database abort the run.
pub fn build_database<E, R>(
    entries: &[ActorEntry],
    resolve: R,
    embedder: &mut E,
) -> Result<BuildReport>
where
    E: Embedder + ?Sized,
    R: Fn(&str) -> PathBuf,
{
    let mut report = BuildReport::default();

    for entry in entries {
        let path = resolve(&entry.file);
        let outcome = process_entry(entry, &path, embedder, &mut report.database)?;
        report.outcomes.push(outcome);
    }

    tracing::info!(
        added = report.added(),
        skipped = report.skipped(),
        failed = report.failed(),
        "database built"
    );
    Ok(report)
}

fn process_entry<E>(
    entry: &ActorEntry,
    path: &Path,
    embedder: &mut E,
    database: &mut EmbeddingDatabase,
) -> Result<EntryOutcome>
where
    E: Embedder + ?Sized,
{
    if !path.exists() {
        tracing::info!(file = %entry.file, "skipping, file not found");
        return Ok(EntryOutcome::Skipped {
            file: entry.file.clone(),
            path: path.to_path_buf(),
        });
    }

    let audio = match wav::read_wav(path) {
        Ok(audio) => audio,
        Err(error) => {
            tracing::warn!(file = %entry.file, %error, "failed to load clip");
            return Ok(EntryOutcome::Failed {
                file: entry.file.clone(),
                error,
            });
        }
    };
    tracing::debug!(
        file = %entry.file,
        sample_rate = audio.sample_rate,
        seconds = audio.duration_secs(),
        "clip loaded"
    );

    let vector = embedder
        .embed(&audio.samples, audio.sample_rate)
        .wrap_err_with(|| format!("embedding failed for {}", entry.file))?;
    let dimension = vector.len();

    database
        .push(EmbeddingRecord {
            name: entry.name.clone(),
            vector,
        })
        .wrap_err_with(|| format!("unexpected embedding from {}", entry.file))?;

    tracing::info!(actor = %entry.name, dimension, "processed");
    Ok(EntryOutcome::Added {
        name: entry.name.clone(),
        dimension,
    })
}
