//! Event dispatch loop
//!
//! A single consumer drains the event and error streams one item at a
//! time. Each change event goes through the quiet period, the name
//! pattern, the operation mask and finally the command runner. While a
//! command runs nothing else is handled; notifications wait in the source
//! queues.

use crate::debounce::QuietPeriod;
use crate::error::WatchError;
use crate::exec::{CommandRunner, ExecError, ExecutionResult, ProcessRunner};
use crate::filter::is_interesting;
use crate::pattern::NamePattern;
use crate::source::Streams;
use onchange_core::{ChangeEvent, Config, Ops};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// What happened to one change event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Arrived inside the quiet window
    Suppressed,
    /// Path did not match the name pattern
    PatternMismatch,
    /// No operation in the mask
    Ignored,
    /// Qualified, but there is no command to run
    NoCommand,
    /// Command ran; `success` is false on launch failure or non-zero exit
    Ran { success: bool },
}

/// Owns the configuration and debounce state for one watch session
pub struct Dispatcher<R = ProcessRunner> {
    config: Config,
    pattern: NamePattern,
    quiet: QuietPeriod,
    runner: Arc<R>,
    output: Box<dyn Write + Send>,
}

impl Dispatcher<ProcessRunner> {
    /// Dispatcher that spawns real processes and prints to stdout
    pub fn new(config: Config) -> Self {
        Self::with_runner(config, ProcessRunner::default())
    }
}

impl<R: CommandRunner> Dispatcher<R> {
    /// Dispatcher with a custom command runner
    pub fn with_runner(config: Config, runner: R) -> Self {
        let pattern = NamePattern::compile(config.name_pattern.as_deref());
        let quiet = QuietPeriod::new(config.quiet_interval);
        Self {
            config,
            pattern,
            quiet,
            runner: Arc::new(runner),
            output: Box::new(io::stdout()),
        }
    }

    /// Send command output somewhere other than stdout
    pub fn with_output(mut self, output: impl Write + Send + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pattern(&self) -> &NamePattern {
        &self.pattern
    }

    pub fn quiet_interval(&self) -> Duration {
        self.quiet.interval()
    }

    /// Time the last command was launched
    pub fn last_trigger(&self) -> Option<Instant> {
        self.quiet.last_trigger()
    }

    /// Log the active filter and quiet period before watching starts
    pub fn announce(&self) {
        if let Some(pattern) = &self.config.name_pattern {
            info!("Filtering on name pattern '{}'", pattern);
        }
        if let NamePattern::Malformed { pattern, reason } = &self.pattern {
            warn!("Malformed name pattern '{}' ({}), every path will match", pattern, reason);
        }
        info!("Quiet period: {:?}", self.quiet.interval());
    }

    /// Drain both streams until `cancel` fires or both streams close
    pub async fn run(&mut self, streams: Streams, cancel: CancellationToken) {
        let Streams {
            mut events,
            mut errors,
        } = streams;
        let mut events_open = true;
        let mut errors_open = true;

        while events_open || errors_open {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Shutting down watcher");
                    return;
                }
                event = events.recv(), if events_open => match event {
                    Some(event) => {
                        let outcome = self.handle_event(event, tokio::time::Instant::now().into_std()).await;
                        debug!("event outcome: {:?}", outcome);
                    }
                    None => {
                        debug!("event stream closed");
                        events_open = false;
                    }
                },
                err = errors.recv(), if errors_open => match err {
                    Some(err) => self.handle_error(&err),
                    None => {
                        debug!("error stream closed");
                        errors_open = false;
                    }
                },
            }
        }
    }

    /// Process one change event observed at `now`
    pub async fn handle_event(&mut self, event: ChangeEvent, now: Instant) -> Outcome {
        if self.quiet.should_suppress(now) {
            if self.config.verbose {
                info!("within quiet interval, skipped event: {}", event);
            }
            return Outcome::Suppressed;
        }

        if self.config.verbose {
            info!("event: {}", event);
        }

        if event.ops.contains(Ops::WRITE) {
            info!("modified file: {}", event.path.display());
        }

        if !self.pattern.matches(&event.path) {
            return Outcome::PatternMismatch;
        }

        if !is_interesting(event.ops, self.config.op_mask) {
            return Outcome::Ignored;
        }

        let Some(command) = self.config.command.clone() else {
            return Outcome::NoCommand;
        };

        info!("change detected...");
        self.quiet.record_trigger(now);

        let runner = Arc::clone(&self.runner);
        let result = tokio::task::spawn_blocking(move || runner.run(&command))
            .await
            .unwrap_or_else(|e| ExecutionResult {
                output: Vec::new(),
                error: Some(ExecError::Io(io::Error::other(e))),
            });

        self.report(&result);
        Outcome::Ran {
            success: result.is_success(),
        }
    }

    /// Log an error from the notification source
    pub fn handle_error(&self, err: &WatchError) {
        error!("error: {}", err);
    }

    fn report(&mut self, result: &ExecutionResult) {
        if let Err(e) = self.write_output(&result.output) {
            error!("failed to write command output: {}", e);
        }
        match &result.error {
            None => info!("ok"),
            Some(e) => error!("{}", e),
        }
    }

    /// Output followed by one newline, whether or not it already ends in one
    fn write_output(&mut self, output: &[u8]) -> io::Result<()> {
        self.output.write_all(output)?;
        self.output.write_all(b"\n")?;
        self.output.flush()
    }
}
