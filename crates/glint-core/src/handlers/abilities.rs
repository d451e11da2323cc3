//! Ability cooldown layer for Dota 2.
//!
//! Each ability slot lights one configured key:
//!
//! - **ready** – learned, castable and off cooldown → ready colour.
//! - **imminent** – learned and the remaining cooldown is within the blend
//!   window → linear blend from ready to blocked by `cooldown / window`.
//! - **blocked** – everything else, including any ability not yet learned.
//!
//! Ultimates always light the reserved sixth key, whatever their slot.
//! Abilities whose name matches an exclusion pattern (seasonal or emote
//! abilities) are skipped and leave their key to lower layers.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::color::{blend, Color};
use crate::domain::key::LogicalKey;
use crate::domain::layer::EffectLayer;
use crate::domain::state::GameState;
use crate::games::dota2::{self, Ability};
use crate::render::properties::{resolve, resolve_ref};
use crate::render::stack::LayerHandler;

/// Slot index of the key reserved for ultimates.
pub const ULTIMATE_KEY_INDEX: usize = 5;

/// Smallest key list the handler will render with.
pub const MIN_ABILITY_KEYS: usize = ULTIMATE_KEY_INDEX + 1;

const DEFAULT_READY_COLOR: Color = Color::GREEN;
const DEFAULT_BLOCKED_COLOR: Color = Color::RED;
const DEFAULT_BLEND_WINDOW: f64 = 5.0;

fn default_ability_keys() -> Vec<LogicalKey> {
    ["Q", "W", "E", "D", "F", "R"]
        .into_iter()
        .map(LogicalKey::from_static)
        .collect()
}

fn default_excluded_names() -> Vec<String> {
    vec!["seasonal".to_string(), "high_five".to_string()]
}

/// User-facing properties.  Unset fields fall through to the template and
/// then to the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityLayerProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_color: Option<Color>,
    /// Keys in ability-slot order.  The sixth is reserved for ultimates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ability_keys: Option<Vec<LogicalKey>>,
    /// Remaining cooldown at or below which the colour starts blending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend_window: Option<f64>,
    /// Name substrings of abilities that are never rendered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct AbilityLayerHandler {
    properties: AbilityLayerProperties,
    template: AbilityLayerProperties,
}

impl AbilityLayerHandler {
    pub fn new(properties: AbilityLayerProperties) -> Self {
        Self {
            properties,
            template: AbilityLayerProperties::default(),
        }
    }

    /// Uses `template` for any property this instance leaves unset.
    pub fn with_template(mut self, template: AbilityLayerProperties) -> Self {
        self.template = template;
        self
    }

    pub fn ready_color(&self) -> Color {
        resolve(
            [self.properties.ready_color, self.template.ready_color],
            DEFAULT_READY_COLOR,
        )
    }

    pub fn blocked_color(&self) -> Color {
        resolve(
            [self.properties.blocked_color, self.template.blocked_color],
            DEFAULT_BLOCKED_COLOR,
        )
    }

    pub fn blend_window(&self) -> f64 {
        resolve(
            [self.properties.blend_window, self.template.blend_window],
            DEFAULT_BLEND_WINDOW,
        )
    }

    pub fn ability_keys(&self) -> Vec<LogicalKey> {
        resolve_ref(
            [
                self.properties.ability_keys.as_ref(),
                self.template.ability_keys.as_ref(),
            ],
            default_ability_keys,
        )
    }

    pub fn excluded_names(&self) -> Vec<String> {
        resolve_ref(
            [
                self.properties.excluded_names.as_ref(),
                self.template.excluded_names.as_ref(),
            ],
            default_excluded_names,
        )
    }

    fn ability_color(&self, ability: &Ability) -> Color {
        let ready = self.ready_color();
        let blocked = self.blocked_color();
        let window = self.blend_window();

        if !ability.is_learned() {
            return blocked;
        }
        if ability.can_cast && ability.cooldown == 0.0 {
            return ready;
        }
        if ability.cooldown <= window {
            let t = if window > 0.0 {
                ability.cooldown / window
            } else {
                0.0
            };
            return blend(ready, blocked, t);
        }
        blocked
    }
}

impl LayerHandler for AbilityLayerHandler {
    fn id(&self) -> &str {
        "Dota2Abilities"
    }

    fn render(&self, state: &GameState) -> EffectLayer {
        let mut layer = EffectLayer::new("Dota 2 - Abilities");

        if !state.is_kind(dota2::KIND) {
            debug!(kind = state.kind(), "abilities layer skipped: not a dota2 state");
            return layer;
        }

        let keys = self.ability_keys();
        let excluded = self.excluded_names();
        let abilities = dota2::abilities(state);
        let mut renderable: Vec<(usize, &Ability)> = abilities
            .iter()
            .enumerate()
            .filter(|(_, a)| !excluded.iter().any(|pat| a.name.contains(pat.as_str())))
            .collect();

        let out_of_range = renderable
            .iter()
            .any(|(slot, a)| !a.ultimate && *slot >= keys.len());
        if keys.len() < MIN_ABILITY_KEYS || keys.len() < renderable.len() || out_of_range {
            debug!(
                keys = keys.len(),
                abilities = renderable.len(),
                "abilities layer skipped: not enough ability keys configured"
            );
            return layer;
        }

        // Ultimates go last so they own the reserved key.
        renderable.sort_by_key(|(_, a)| a.ultimate);
        for (slot, ability) in renderable {
            let key = if ability.ultimate {
                &keys[ULTIMATE_KEY_INDEX]
            } else {
                &keys[slot]
            };
            layer.set(key.clone(), self.ability_color(ability));
        }

        layer
    }
}
