//! Typed views over [`GameState`](crate::GameState) for the games the built-in
//! handlers understand.
//!
//! Each game integration supplies a state with its own `kind` tag.  These
//! views only read the generic tree; they never parse raw telemetry.

pub mod dota2;
pub mod rocket_league;
