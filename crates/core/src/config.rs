//! Run configuration
//!
//! Built once at startup from command-line input and handed to the
//! dispatcher by value. Nothing mutates it afterwards.

use crate::error::ConfigError;
use crate::event::Ops;
use std::time::Duration;

/// Default quiet period after a command launch, in seconds
pub const DEFAULT_QUIET_SECS: f64 = 5.0;

/// External command to run on a qualifying change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path
    pub program: String,
    /// Arguments passed to the executable
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Build from a positional argument list (`program arg1 arg2 ...`)
    ///
    /// Returns `Ok(None)` when the list is empty.
    pub fn from_argv(argv: Vec<String>) -> Result<Option<Self>, ConfigError> {
        let mut iter = argv.into_iter();
        let Some(program) = iter.next() else {
            return Ok(None);
        };
        if program.is_empty() {
            return Err(ConfigError::EmptyProgram);
        }
        Ok(Some(Self {
            program,
            args: iter.collect(),
        }))
    }
}

/// Immutable configuration for one watcher run
#[derive(Debug, Clone)]
pub struct Config {
    /// Glob restricting which paths can trigger the command
    pub name_pattern: Option<String>,
    /// Operations that can trigger the command
    pub op_mask: Ops,
    /// Minimum time between two command launches
    pub quiet_interval: Duration,
    /// Log every incoming event
    pub verbose: bool,
    /// Command to run; `None` means changes are only logged
    pub command: Option<CommandSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name_pattern: None,
            op_mask: Ops::INTERESTING,
            quiet_interval: Duration::from_millis((DEFAULT_QUIET_SECS * 1000.0) as u64),
            verbose: false,
            command: None,
        }
    }
}

impl Config {
    /// Set the name pattern; an empty string disables filtering
    pub fn with_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        self.name_pattern = (!pattern.is_empty()).then_some(pattern);
        self
    }

    /// Set the quiet interval from fractional seconds
    pub fn with_quiet_secs(mut self, secs: f64) -> Result<Self, ConfigError> {
        self.quiet_interval = quiet_interval_from_secs(secs)?;
        Ok(self)
    }

    /// Set the quiet interval directly
    pub fn with_quiet_interval(mut self, interval: Duration) -> Self {
        self.quiet_interval = interval;
        self
    }

    /// Enable or disable verbose per-event logging
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the command from positional arguments
    pub fn with_command(mut self, argv: Vec<String>) -> Result<Self, ConfigError> {
        self.command = CommandSpec::from_argv(argv)?;
        Ok(self)
    }
}

/// Convert fractional seconds to a millisecond-resolution duration
///
/// Sub-millisecond remainders are truncated. Negative values disable the
/// quiet period entirely.
pub fn quiet_interval_from_secs(secs: f64) -> Result<Duration, ConfigError> {
    if !secs.is_finite() {
        return Err(ConfigError::InvalidQuiet(secs));
    }
    if secs <= 0.0 {
        return Ok(Duration::ZERO);
    }
    Ok(Duration::from_millis((secs * 1000.0) as u64))
}
