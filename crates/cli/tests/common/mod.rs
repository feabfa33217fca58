//! Common utilities for integration tests

pub mod cli;

pub use cli::{logged, wait_for, OnchangeCommand};
