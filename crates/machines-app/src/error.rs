use std::path::PathBuf;

use thiserror::Error;

use machines_campaign::SaveError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("level file is not valid JSON: {0}")]
    Level(#[source] serde_json::Error),
    #[error("failed to encode summary: {0}")]
    Summary(#[source] serde_json::Error),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error("failed to start the game loop thread: {0}")]
    Thread(#[source] std::io::Error),
    #[error("game loop thread panicked")]
    LoopPanicked,
}
