//! Name pattern matching
//!
//! Patterns are shell-style globs (`*`, `?`, `[...]`, `[!...]`, `[^...]`,
//! `\` escapes) matched against the path as reported by the source,
//! relative to the watched root. Wildcards never match a path separator,
//! and a `**` that is not a whole path component behaves like `*`.
//!
//! A pattern that fails to parse matches every path instead of none.
//! [`Dispatcher::announce`](crate::Dispatcher::announce) logs a warning
//! for it at startup.

use globset::{GlobBuilder, GlobMatcher};
use std::path::Path;

/// A compiled `-name` filter
#[derive(Debug, Clone)]
pub enum NamePattern {
    /// No filter configured
    Any,
    /// Valid glob
    Glob(GlobMatcher),
    /// Pattern that failed to parse; matches everything
    Malformed { pattern: String, reason: String },
}

impl NamePattern {
    /// Compile an optional pattern; `None` and `""` both mean no filter
    pub fn compile(pattern: Option<&str>) -> Self {
        match pattern {
            None | Some("") => NamePattern::Any,
            Some(raw) => match GlobBuilder::new(raw)
                .literal_separator(true)
                .backslash_escape(true)
                .build()
            {
                Ok(glob) => NamePattern::Glob(glob.compile_matcher()),
                Err(e) => NamePattern::Malformed {
                    pattern: raw.to_string(),
                    reason: e.kind().to_string(),
                },
            },
        }
    }

    /// Check whether `path` passes the filter
    pub fn matches(&self, path: &Path) -> bool {
        match self {
            NamePattern::Any | NamePattern::Malformed { .. } => true,
            NamePattern::Glob(glob) => glob.is_match(path),
        }
    }

    /// True if the pattern failed to parse
    pub fn is_malformed(&self) -> bool {
        matches!(self, NamePattern::Malformed { .. })
    }
}

/// Check `path` against an optional, uncompiled pattern
pub fn matches(path: &Path, pattern: Option<&str>) -> bool {
    NamePattern::compile(pattern).matches(path)
}
