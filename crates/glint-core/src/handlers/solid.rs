//! Solid colour layer.

use crate::domain::color::Color;
use crate::domain::key::LogicalKey;
use crate::domain::layer::EffectLayer;
use crate::domain::state::GameState;
use crate::render::stack::LayerHandler;

/// Paints a fixed colour on a fixed set of keys, whatever the game state.
#[derive(Debug, Clone)]
pub struct SolidColorLayerHandler {
    color: Color,
    keys: Vec<LogicalKey>,
}

impl SolidColorLayerHandler {
    pub fn new(color: Color, keys: Vec<LogicalKey>) -> Self {
        Self { color, keys }
    }
}

impl LayerHandler for SolidColorLayerHandler {
    fn id(&self) -> &str {
        "SolidColor"
    }

    fn render(&self, _state: &GameState) -> EffectLayer {
        let mut layer = EffectLayer::new("Solid Color");
        layer.fill(&self.keys, self.color);
        layer
    }
}
