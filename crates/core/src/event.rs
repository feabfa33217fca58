//! Change event data structures

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::path::{Path, PathBuf};

/// Set of filesystem operation kinds carried by a change notification
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Ops(u8);

impl Ops {
    /// File or directory created
    pub const CREATE: Ops = Ops(1 << 0);
    /// File contents written
    pub const WRITE: Ops = Ops(1 << 1);
    /// File or directory removed
    pub const REMOVE: Ops = Ops(1 << 2);
    /// File or directory renamed away
    pub const RENAME: Ops = Ops(1 << 3);
    /// Permissions or other metadata changed
    pub const CHMOD: Ops = Ops(1 << 4);

    /// Operations that can trigger a command
    pub const INTERESTING: Ops = Ops(Self::CREATE.0 | Self::WRITE.0 | Self::REMOVE.0 | Self::RENAME.0);

    const NAMES: [(Ops, &'static str); 5] = [
        (Self::CREATE, "CREATE"),
        (Self::REMOVE, "REMOVE"),
        (Self::WRITE, "WRITE"),
        (Self::RENAME, "RENAME"),
        (Self::CHMOD, "CHMOD"),
    ];

    /// The empty set
    pub const fn empty() -> Self {
        Ops(0)
    }

    /// True if no operation is set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every operation in `other` is also in `self`
    pub const fn contains(self, other: Ops) -> bool {
        !other.is_empty() && self.0 & other.0 == other.0
    }

    /// True if `self` and `other` share at least one operation
    pub const fn intersects(self, other: Ops) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for Ops {
    type Output = Ops;

    fn bitor(self, rhs: Ops) -> Ops {
        Ops(self.0 | rhs.0)
    }
}

impl BitOrAssign for Ops {
    fn bitor_assign(&mut self, rhs: Ops) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Ops {
    type Output = Ops;

    fn bitand(self, rhs: Ops) -> Ops {
        Ops(self.0 & rhs.0)
    }
}

impl fmt::Display for Ops {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (op, name) in Self::NAMES {
            if self.contains(op) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Ops {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ops({})", self)
    }
}

/// A single filesystem change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Path that changed, relative to the watched root
    pub path: PathBuf,
    /// Operations observed on the path
    pub ops: Ops,
}

impl ChangeEvent {
    /// Create a new change event
    pub fn new(path: impl Into<PathBuf>, ops: Ops) -> Self {
        Self {
            path: path.into(),
            ops,
        }
    }

    /// Path that changed
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.path.display().to_string(), self.ops)
    }
}
