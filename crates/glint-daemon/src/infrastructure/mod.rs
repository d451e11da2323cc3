//! Infrastructure layer for the daemon.
//!
//! Contains the file-system and hardware-facing adapters: the TOML config
//! store, the JSON state-file feed and the simulated controller family.
//!
//! **Dependency rule**: this layer may depend on `application`, `glint_core`
//! and `glint_devices`, but MUST NOT be imported by the `application` layer.

pub mod simulated;
pub mod state_feed;
pub mod storage;
