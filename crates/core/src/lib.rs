//! Core types for onchange
//!
//! This crate provides:
//! - Change event data structures (path + operation set)
//! - Immutable run configuration built once at startup
//! - Configuration errors

pub mod config;
pub mod error;
pub mod event;

// Re-exports
pub use config::{quiet_interval_from_secs, CommandSpec, Config, DEFAULT_QUIET_SECS};
pub use error::ConfigError;
pub use event::{ChangeEvent, Ops};
