//! # glint-core
//!
//! Shared library for glint containing colour math, the read-only game-state
//! tree, effect layers, layer handlers and the layer compositor.
//!
//! This crate has zero dependencies on OS APIs or device transports; the
//! device side lives in `glint-devices`.
//!
//! # Architecture overview
//!
//! Every visual tick runs the same pipeline:
//!
//! ```text
//! GameState ──► [LayerHandler × N] ──► [EffectLayer × N] ──► composite() ──► ColorMap
//! ```
//!
//! - **`domain`** – Plain data: [`Color`], [`LogicalKey`], [`GameState`] and
//!   [`EffectLayer`].  No behaviour beyond accessors and blend arithmetic.
//!
//! - **`render`** – The [`LayerHandler`] capability, the ordered
//!   [`LayerStack`] and the [`composite`] function that folds a stack into one
//!   resolved [`ColorMap`].
//!
//! - **`handlers`** – Built-in handlers (solid colour, ability cooldowns,
//!   team colour).  New games are added by implementing [`LayerHandler`];
//!   the compositor never changes.
//!
//! - **`games`** – Typed views over the generic state tree for the games the
//!   built-in handlers understand.

pub mod domain;
pub mod games;
pub mod handlers;
pub mod render;

pub use domain::color::{blend, correct_with_alpha, BlendMode, Color, ColorParseError};
pub use domain::key::LogicalKey;
pub use domain::layer::{ColorMap, EffectLayer};
pub use domain::state::{GameState, Node, StateError};
pub use render::compositor::composite;
pub use render::stack::{LayerEntry, LayerHandler, LayerStack};
