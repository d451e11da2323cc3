//! Domain entities for glint.
//!
//! Pure data with no infrastructure dependencies.  Everything in here can be
//! compiled and tested on any platform without hardware attached.

pub mod color;
pub mod key;
pub mod layer;
pub mod state;
