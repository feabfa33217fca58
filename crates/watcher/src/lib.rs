//! File system watching for onchange
//!
//! This crate provides the event pipeline that turns raw change
//! notifications into command launches:
//! - Name pattern matching (shell-style globs)
//! - Operation filtering
//! - Quiet-period debouncing
//! - Synchronous command execution with combined output
//! - A single-consumer dispatch loop over the event and error streams

pub mod debounce;
pub mod dispatch;
pub mod error;
pub mod exec;
pub mod filter;
pub mod pattern;
pub mod source;

pub use debounce::QuietPeriod;
pub use dispatch::{Dispatcher, Outcome};
pub use error::WatchError;
pub use exec::{CommandRunner, ExecError, ExecutionResult, ProcessRunner};
pub use filter::is_interesting;
pub use pattern::{matches, NamePattern};
pub use source::{NotifySource, Streams, DEFAULT_QUEUE_CAPACITY};

use onchange_core::Config;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Watch `root` and run the configured command on qualifying changes
///
/// Returns once `cancel` fires. Failing to create the watcher or to
/// register `root` is reported as an error before any event is handled.
pub async fn watch(config: Config, root: &Path, cancel: CancellationToken) -> Result<(), WatchError> {
    let mut dispatcher = Dispatcher::new(config);
    dispatcher.announce();

    let (_source, streams) = NotifySource::watch(root, DEFAULT_QUEUE_CAPACITY)?;
    dispatcher.run(streams, cancel).await;
    Ok(())
}
