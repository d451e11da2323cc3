//! The layer handler capability and the ordered stack of handlers.

use std::fmt;

use crate::domain::color::BlendMode;
use crate::domain::layer::EffectLayer;
use crate::domain::state::GameState;

/// A rendering unit that turns a game-state snapshot into one effect layer.
///
/// Handlers render independently of each other.  They may read their own
/// properties but must not mutate shared state, so `render` takes `&self`.
///
/// A handler that receives a state of a kind it does not understand, or whose
/// configuration cannot cover the state's shape, returns an empty layer instead
/// of failing the tick.
pub trait LayerHandler: Send + Sync + fmt::Debug {
    /// Stable identifier, used in logs and configuration.
    fn id(&self) -> &str;

    fn render(&self, state: &GameState) -> EffectLayer;
}

/// One slot of a [`LayerStack`].
#[derive(Debug)]
pub struct LayerEntry {
    pub handler: Box<dyn LayerHandler>,
    pub enabled: bool,
    pub blend: BlendMode,
}

impl LayerEntry {
    /// An enabled entry using [`BlendMode::Overwrite`].
    pub fn new(handler: Box<dyn LayerHandler>) -> Self {
        Self {
            handler,
            enabled: true,
            blend: BlendMode::Overwrite,
        }
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Ordered handlers; later entries composite over earlier ones.
#[derive(Debug, Default)]
pub struct LayerStack {
    entries: Vec<LayerEntry>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry on top of the stack.
    pub fn push(&mut self, entry: LayerEntry) {
        self.entries.push(entry);
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, entry: LayerEntry) -> Self {
        self.push(entry);
        self
    }

    /// Enables or disables the entry at `index`.  Returns `false` when the
    /// index is out of range.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Entries bottom to top.
    pub fn entries(&self) -> &[LayerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<LayerEntry> for LayerStack {
    fn from_iter<I: IntoIterator<Item = LayerEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
