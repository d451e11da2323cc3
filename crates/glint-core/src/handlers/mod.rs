//! Built-in layer handlers.
//!
//! | Handler                    | State kind      | Paints |
//! |----------------------------|-----------------|--------|
//! | [`SolidColorLayerHandler`] | any             | a fixed colour on its keys |
//! | [`AbilityLayerHandler`]    | `dota2`         | ability readiness per slot key |
//! | [`TeamColorLayerHandler`]  | `rocket_league` | the player's team colour |

pub mod abilities;
pub mod solid;
pub mod team_color;

pub use abilities::{AbilityLayerHandler, AbilityLayerProperties};
pub use solid::SolidColorLayerHandler;
pub use team_color::TeamColorLayerHandler;
