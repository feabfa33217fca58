//! Notification source backed by `notify`
//!
//! Watches a single directory non-recursively and feeds two bounded
//! channels: translated change events and watcher errors. When a channel
//! is full the notification is dropped with a warning; the dispatcher may
//! be blocked on a running command for a long time.

use crate::error::WatchError;
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use onchange_core::{ChangeEvent, Ops};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

/// Queue depth used by [`crate::watch`]
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Receiving ends of the event and error streams
#[derive(Debug)]
pub struct Streams {
    pub events: mpsc::Receiver<ChangeEvent>,
    pub errors: mpsc::Receiver<WatchError>,
}

/// Live watch on one directory
///
/// Dropping it stops the watch and closes both streams.
pub struct NotifySource {
    root: PathBuf,
    _watcher: RecommendedWatcher,
}

impl NotifySource {
    /// Start watching `root` (non-recursive)
    pub fn watch(root: &Path, capacity: usize) -> Result<(Self, Streams), WatchError> {
        let root = root.canonicalize().map_err(|source| WatchError::Root {
            path: root.to_path_buf(),
            source,
        })?;

        let (event_tx, event_rx) = mpsc::channel(capacity);
        let (error_tx, error_rx) = mpsc::channel(capacity);

        let handler_root = root.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for change in translate(&event, &handler_root) {
                    forward(&event_tx, change, "event");
                }
            }
            Err(e) => forward(&error_tx, WatchError::Notify(e), "error"),
        })
        .map_err(WatchError::Create)?;

        watcher
            .watch(&root, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::Register {
                path: root.clone(),
                source,
            })?;
        debug!("Watching directory: {}", root.display());

        Ok((
            Self {
                root,
                _watcher: watcher,
            },
            Streams {
                events: event_rx,
                errors: error_rx,
            },
        ))
    }

    /// Canonical path of the watched directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn forward<T: std::fmt::Display>(tx: &mpsc::Sender<T>, item: T, kind: &str) {
    match tx.try_send(item) {
        Ok(()) => {}
        Err(TrySendError::Full(item)) => warn!("{} queue full, dropping {}", kind, item),
        Err(TrySendError::Closed(_)) => debug!("{} queue closed", kind),
    }
}

/// Translate a `notify` event into change events relative to `root`
///
/// Rename pairs become a `RENAME` on the old name and a `CREATE` on the
/// new one. Access notifications carry no change and are dropped.
pub fn translate(event: &Event, root: &Path) -> Vec<ChangeEvent> {
    let ops = match event.kind {
        EventKind::Create(_) => Ops::CREATE,
        EventKind::Remove(_) => Ops::REMOVE,
        EventKind::Modify(ModifyKind::Metadata(_)) => Ops::CHMOD,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Ops::CREATE,
        // inotify also reports both halves separately as From and To
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => return Vec::new(),
        EventKind::Modify(ModifyKind::Name(_)) => Ops::RENAME,
        EventKind::Modify(_) => Ops::WRITE,
        EventKind::Access(_) | EventKind::Any | EventKind::Other => return Vec::new(),
    };

    event
        .paths
        .iter()
        .map(|path| ChangeEvent::new(relative_to(path, root), ops))
        .collect()
}

fn relative_to(path: &Path, root: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
        _ => path.to_path_buf(),
    }
}
