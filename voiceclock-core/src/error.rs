use thiserror::Error;

/// All errors produced by voiceclock-core.
#[derive(Debug, Error)]
pub enum VoiceClockError {
    #[error("audio backend error: {0}")]
    AudioBackend(String),

    #[error("could not play clip: {path}")]
    Playback { path: std::path::PathBuf },

    #[error("audio worker has shut down")]
    AudioWorkerGone,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, VoiceClockError>;
