//! Watcher error types

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the notification source
///
/// `Create`, `Root` and `Register` happen at startup and are fatal.
/// `Notify` arrives on the error stream while watching and is only logged.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The platform watcher handle could not be created
    #[error("failed to create watcher: {0}")]
    Create(#[source] notify::Error),

    /// The watch root could not be resolved
    #[error("failed to resolve watch root {}: {source}", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The watch root could not be registered with the watcher
    #[error("failed to watch {}: {source}", path.display())]
    Register {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// Error reported by the watcher while running
    #[error("{0}")]
    Notify(#[from] notify::Error),
}

impl WatchError {
    /// True for errors that only happen during startup
    pub fn is_fatal(&self) -> bool {
        !matches!(self, WatchError::Notify(_))
    }
}
