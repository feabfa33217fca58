//! onchange command-line front end
//!
//! Exposes argument handling so it can be tested without spawning the
//! binary.

pub mod args;
