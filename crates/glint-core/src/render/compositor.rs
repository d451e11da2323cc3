//! Layer composition.

use tracing::trace;

use crate::domain::layer::ColorMap;
use crate::domain::state::GameState;
use crate::render::stack::LayerStack;

/// Renders every enabled layer of `stack` against `state` and folds the
/// results, bottom to top, into one map.
///
/// For each key a layer defines, its colour is combined with the value
/// accumulated so far using that layer's blend mode; a key seen for the first
/// time takes the layer's colour as-is.  Keys no layer defines stay absent.
///
/// The result depends only on `stack` and `state`.
pub fn composite(stack: &LayerStack, state: &GameState) -> ColorMap {
    let mut resolved = ColorMap::new();

    for entry in stack.entries().iter().filter(|e| e.enabled) {
        let layer = entry.handler.render(state);
        trace!(
            handler = entry.handler.id(),
            keys = layer.len(),
            "layer rendered"
        );

        for (key, &color) in layer.iter() {
            resolved
                .entry(key.clone())
                .and_modify(|below| *below = entry.blend.apply(*below, color))
                .or_insert(color);
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::color::{BlendMode, Color};
    use crate::domain::key::LogicalKey;
    use crate::domain::layer::EffectLayer;
    use crate::render::stack::{LayerEntry, LayerHandler};

    #[derive(Debug)]
    struct Fixed {
        keys: Vec<(&'static str, Color)>,
    }

    impl LayerHandler for Fixed {
        fn id(&self) -> &str {
            "fixed"
        }

        fn render(&self, _state: &GameState) -> EffectLayer {
            let mut layer = EffectLayer::new("fixed");
            for (key, color) in &self.keys {
                layer.set(LogicalKey::from_static(key), *color);
            }
            layer
        }
    }

    fn entry(keys: Vec<(&'static str, Color)>) -> LayerEntry {
        LayerEntry::new(Box::new(Fixed { keys }))
    }

    #[test]
    fn test_empty_stack_yields_empty_map() {
        let map = composite(&LayerStack::new(), &GameState::empty("any"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_later_layer_overwrites_earlier() {
        let stack = LayerStack::new()
            .with(entry(vec![("Q", Color::RED), ("W", Color::RED)]))
            .with(entry(vec![("Q", Color::BLUE)]));

        let map = composite(&stack, &GameState::empty("any"));

        assert_eq!(map.get(&LogicalKey::from_static("Q")), Some(&Color::BLUE));
        assert_eq!(map.get(&LogicalKey::from_static("W")), Some(&Color::RED));
    }

    #[test]
    fn test_disabled_layer_is_skipped() {
        let stack = LayerStack::new()
            .with(entry(vec![("Q", Color::RED)]))
            .with(entry(vec![("Q", Color::BLUE), ("E", Color::BLUE)]).disabled());

        let map = composite(&stack, &GameState::empty("any"));

        assert_eq!(map.get(&LogicalKey::from_static("Q")), Some(&Color::RED));
        assert!(!map.contains_key(&LogicalKey::from_static("E")));
    }

    #[test]
    fn test_blend_mode_applies_only_over_existing_keys() {
        let stack = LayerStack::new()
            .with(entry(vec![("Q", Color::rgb(100, 0, 0))]))
            .with(
                entry(vec![("Q", Color::rgb(100, 50, 0)), ("W", Color::rgb(1, 2, 3))])
                    .with_blend(BlendMode::Additive),
            );

        let map = composite(&stack, &GameState::empty("any"));

        assert_eq!(map.get(&LogicalKey::from_static("Q")), Some(&Color::rgb(200, 50, 0)));
        // First opinion for W: taken as-is, not added to black.
        assert_eq!(map.get(&LogicalKey::from_static("W")), Some(&Color::rgb(1, 2, 3)));
    }

    #[test]
    fn test_set_enabled_toggles_entry() {
        let mut stack = LayerStack::new().with(entry(vec![("Q", Color::RED)]));
        assert!(stack.set_enabled(0, false));
        assert!(!stack.set_enabled(4, false));
        assert!(composite(&stack, &GameState::empty("any")).is_empty());
    }
}
