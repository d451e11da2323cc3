//! Dota 2 view: hero abilities.
//!
//! Expected shape (abilities may be an array or an object keyed
//! `ability0`, `ability1`, … in slot order):
//!
//! ```json
//! { "abilities": { "ability0": { "name": "axe_berserkers_call", "level": 1,
//!   "can_cast": true, "cooldown": 0, "ultimate": false } } }
//! ```

use crate::domain::state::{GameState, Node};

/// State kind tag produced by the Dota 2 integration.
pub const KIND: &str = "dota2";

/// One ability slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Ability {
    pub name: String,
    pub level: i64,
    pub can_cast: bool,
    /// Remaining cooldown in seconds.
    pub cooldown: f64,
    pub ultimate: bool,
}

impl Ability {
    /// Reads an ability, treating missing fields as zero / false / empty.
    pub fn from_node(node: Node<'_>) -> Self {
        Self {
            name: node.string("name").unwrap_or_default().to_string(),
            level: node.int("level").unwrap_or(0),
            can_cast: node.boolean("can_cast").unwrap_or(false),
            cooldown: node.float("cooldown").unwrap_or(0.0),
            ultimate: node.boolean("ultimate").unwrap_or(false),
        }
    }

    pub fn is_learned(&self) -> bool {
        self.level > 0
    }
}

/// Abilities in slot order.  Empty for non-Dota states.
pub fn abilities(state: &GameState) -> Vec<Ability> {
    if !state.is_kind(KIND) {
        return Vec::new();
    }
    state
        .root()
        .items("abilities")
        .into_iter()
        .map(Ability::from_node)
        .collect()
}
