//! Builds the layer stack from configuration.
//!
//! Each `[[layers]]` entry names a handler type, its properties, and how it
//! blends with the layers below.  Entries are listed bottom to top:
//!
//! ```toml
//! [[layers]]
//! type = "solid"
//! color = "#101010"
//! keys = ["Peripheral"]
//!
//! [[layers]]
//! type = "abilities"
//! ready_color = "#00FF00"
//!
//! [[layers]]
//! type = "team_color"
//! blend = "alpha_over"
//! ```
//!
//! Ability layers resolve unset properties through `[templates.abilities]`
//! before falling back to built-in defaults.

use glint_core::handlers::{
    AbilityLayerHandler, AbilityLayerProperties, SolidColorLayerHandler, TeamColorLayerHandler,
};
use glint_core::{BlendMode, Color, LayerEntry, LayerHandler, LayerStack, LogicalKey};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One configured layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    #[serde(flatten)]
    pub kind: LayerKind,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub blend: BlendMode,
}

/// Handler type and its properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerKind {
    Solid {
        color: Color,
        keys: Vec<LogicalKey>,
    },
    Abilities(AbilityLayerProperties),
    TeamColor {
        #[serde(default = "default_team_keys")]
        keys: Vec<LogicalKey>,
    },
}

/// Shared property templates, one per templated handler type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default)]
    pub abilities: AbilityLayerProperties,
}

fn default_true() -> bool {
    true
}

fn default_team_keys() -> Vec<LogicalKey> {
    vec![LogicalKey::PERIPHERAL]
}

impl LayerConfig {
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            enabled: true,
            blend: BlendMode::default(),
        }
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }
}

/// The layers used when the config file names none: a dim peripheral
/// background, ability cooldowns, and team colour on the peripheral.
pub fn default_layers() -> Vec<LayerConfig> {
    vec![
        LayerConfig::new(LayerKind::Solid {
            color: Color::rgb(16, 16, 16),
            keys: vec![LogicalKey::PERIPHERAL],
        }),
        LayerConfig::new(LayerKind::Abilities(AbilityLayerProperties::default())),
        LayerConfig::new(LayerKind::TeamColor {
            keys: default_team_keys(),
        }),
    ]
}

fn build_handler(kind: &LayerKind, templates: &TemplateConfig) -> Box<dyn LayerHandler> {
    match kind {
        LayerKind::Solid { color, keys } => {
            Box::new(SolidColorLayerHandler::new(*color, keys.clone()))
        }
        LayerKind::Abilities(properties) => Box::new(
            AbilityLayerHandler::new(properties.clone())
                .with_template(templates.abilities.clone()),
        ),
        LayerKind::TeamColor { keys } => Box::new(TeamColorLayerHandler::new(keys.clone())),
    }
}

/// Builds a stack from `layers`, bottom to top.
pub fn build_stack(layers: &[LayerConfig], templates: &TemplateConfig) -> LayerStack {
    layers
        .iter()
        .map(|layer| {
            let handler = build_handler(&layer.kind, templates);
            debug!(handler = handler.id(), enabled = layer.enabled, blend = ?layer.blend, "layer configured");
            let entry = LayerEntry::new(handler).with_blend(layer.blend);
            if layer.enabled {
                entry
            } else {
                entry.disabled()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::{composite, GameState};
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Layers {
        layers: Vec<LayerConfig>,
    }

    fn parse(text: &str) -> Vec<LayerConfig> {
        toml::from_str::<Layers>(text).expect("valid layers").layers
    }

    #[test]
    fn test_parses_every_layer_type() {
        // Arrange
        let text = r##"
            [[layers]]
            type = "solid"
            color = "#101010"
            keys = ["Peripheral", "Q"]

            [[layers]]
            type = "abilities"
            ready_color = "#0000FF"
            blend_window = 3.0

            [[layers]]
            type = "team_color"
            blend = "alpha_over"
            enabled = false
        "##;

        // Act
        let layers = parse(text);

        // Assert
        assert_eq!(layers.len(), 3);
        assert_eq!(
            layers[0].kind,
            LayerKind::Solid {
                color: Color::rgb(16, 16, 16),
                keys: vec![LogicalKey::PERIPHERAL, LogicalKey::from_static("Q")],
            }
        );
        match &layers[1].kind {
            LayerKind::Abilities(props) => {
                assert_eq!(props.ready_color, Some(Color::BLUE));
                assert_eq!(props.blend_window, Some(3.0));
                assert_eq!(props.blocked_color, None);
            }
            other => panic!("expected abilities layer, got {other:?}"),
        }
        assert_eq!(
            layers[2].kind,
            LayerKind::TeamColor {
                keys: vec![LogicalKey::PERIPHERAL]
            }
        );
        assert_eq!(layers[2].blend, BlendMode::AlphaOver);
        assert!(!layers[2].enabled);
        assert!(layers[0].enabled);
    }

    #[test]
    fn test_unknown_layer_type_is_rejected() {
        let result = toml::from_str::<Layers>(
            r#"
            [[layers]]
            type = "rainbow"
        "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_build_stack_preserves_order_and_flags() {
        // Arrange
        let mut layers = default_layers();
        layers[2].enabled = false;

        // Act
        let stack = build_stack(&layers, &TemplateConfig::default());

        // Assert
        let ids: Vec<_> = stack.entries().iter().map(|e| e.handler.id()).collect();
        assert_eq!(ids, ["SolidColor", "Dota2Abilities", "RocketLeagueTeamColor"]);
        assert!(stack.entries()[0].enabled);
        assert!(!stack.entries()[2].enabled);
    }

    #[test]
    fn test_ability_template_fills_unset_properties() {
        // Arrange
        let templates = TemplateConfig {
            abilities: AbilityLayerProperties {
                ready_color: Some(Color::BLUE),
                ..Default::default()
            },
        };
        let layers = vec![LayerConfig::new(LayerKind::Abilities(
            AbilityLayerProperties::default(),
        ))];
        let state = GameState::from_value(
            "dota2",
            json!({ "abilities": {
                "ability0": { "name": "a", "level": 1, "can_cast": true, "cooldown": 0 },
            }}),
        );

        // Act
        let map = composite(&build_stack(&layers, &templates), &state);

        // Assert
        assert_eq!(map.get(&LogicalKey::from_static("Q")), Some(&Color::BLUE));
    }
}
