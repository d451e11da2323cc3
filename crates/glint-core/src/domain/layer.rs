//! Effect layers: one handler's colour opinions for a single tick.

use std::collections::HashMap;

use super::color::Color;
use super::key::LogicalKey;

/// The resolved colour for every key some layer had an opinion about.
///
/// Keys that no layer set are absent, never defaulted.
pub type ColorMap = HashMap<LogicalKey, Color>;

/// A sparse mapping from keys to colours produced by one handler render.
///
/// An unset key means "no opinion", which is different from a key set to
/// black: the compositor leaves unset keys to lower layers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectLayer {
    name: String,
    colors: HashMap<LogicalKey, Color>,
}

impl EffectLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            colors: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the colour of one key, replacing any earlier value in this layer.
    pub fn set(&mut self, key: LogicalKey, color: Color) {
        self.colors.insert(key, color);
    }

    /// Sets every key in `keys` to `color`.
    pub fn fill<'k>(&mut self, keys: impl IntoIterator<Item = &'k LogicalKey>, color: Color) {
        for key in keys {
            self.colors.insert(key.clone(), color);
        }
    }

    pub fn get(&self, key: &LogicalKey) -> Option<Color> {
        self.colors.get(key).copied()
    }

    pub fn contains(&self, key: &LogicalKey) -> bool {
        self.colors.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LogicalKey, &Color)> {
        self.colors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_layer_has_no_opinions() {
        let layer = EffectLayer::new("empty");
        assert!(layer.is_empty());
        assert_eq!(layer.get(&LogicalKey::PERIPHERAL), None);
    }

    #[test]
    fn test_black_is_an_opinion() {
        let mut layer = EffectLayer::new("black");
        layer.set(LogicalKey::PERIPHERAL, Color::BLACK);
        assert!(layer.contains(&LogicalKey::PERIPHERAL));
        assert_eq!(layer.get(&LogicalKey::PERIPHERAL), Some(Color::BLACK));
    }

    #[test]
    fn test_fill_sets_every_key() {
        let keys = [LogicalKey::from_static("Q"), LogicalKey::from_static("W")];
        let mut layer = EffectLayer::new("fill");
        layer.fill(&keys, Color::RED);
        assert_eq!(layer.len(), 2);
        assert!(keys.iter().all(|k| layer.get(k) == Some(Color::RED)));
    }
}
