use thiserror::Error;

/// Reasons a single clip cannot be turned into canonical audio.
///
/// These are per-file conditions: the builder records them and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("audio is {bits}-bit, must be 16-bit")]
    UnsupportedSampleWidth { bits: u16 },

    #[error("audio has {channels} channels, at most 2 are supported")]
    UnsupportedChannelCount { channels: u16 },

    #[error("{reason}")]
    ReadFailure { reason: String },
}

impl From<hound::Error> for LoadError {
    fn from(err: hound::Error) -> Self {
        Self::ReadFailure {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        Self::ReadFailure {
            reason: err.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("database io: {0}")]
    Io(#[from] std::io::Error),

    #[error("database json: {0}")]
    Json(#[from] serde_json::Error),
}
