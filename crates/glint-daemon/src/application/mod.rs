//! Application layer use cases for the daemon.
//!
//! Use cases here orchestrate `glint_core` and `glint_devices` and depend on
//! abstractions ([`state_feed::StateFeed`], [`glint_devices::LightingDevice`])
//! rather than on files, threads or hardware.
//!
//! # Sub-modules
//!
//! - **`build_stack`** – Turns the `[[layers]]` configuration into a
//!   [`glint_core::LayerStack`].
//!
//! - **`render_loop`** – One visual tick (state → composite → every device
//!   family) and the async driver that repeats it at a fixed rate while
//!   forwarding hot-plug notifications.
//!
//! - **`state_feed`** – The game-state collaborator contract.

pub mod build_stack;
pub mod render_loop;
pub mod state_feed;
