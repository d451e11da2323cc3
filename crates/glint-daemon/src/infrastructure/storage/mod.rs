//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads and writes the daemon's TOML configuration
//! and supplies defaults on first run, when no file exists yet.

pub mod config;
