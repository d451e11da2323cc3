//! Rendering: the handler capability, the ordered layer stack and the
//! compositor that folds a stack into a single [`ColorMap`](crate::ColorMap).
//!
//! - **`stack`** – [`LayerHandler`](stack::LayerHandler) and
//!   [`LayerStack`](stack::LayerStack).
//! - **`compositor`** – [`composite`](compositor::composite), a pure function
//!   of (stack, state).
//! - **`properties`** – the instance → template → default override chain used
//!   by handler properties.

pub mod compositor;
pub mod properties;
pub mod stack;
