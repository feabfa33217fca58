//! Configuration errors

use thiserror::Error;

/// Errors raised while building a [`Config`](crate::Config)
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Quiet interval is NaN or infinite
    #[error("invalid quiet interval: {0} seconds")]
    InvalidQuiet(f64),

    /// Command was given with an empty program name
    #[error("command program name is empty")]
    EmptyProgram,
}
