//! Game-state collaborator contract.
//!
//! A [`StateFeed`] produces the current [`GameState`] snapshot each tick.
//! The render loop owns no knowledge of where state comes from: a file, a
//! local HTTP listener fed by the game, or a fixed value in tests.

use async_trait::async_trait;
use glint_core::{GameState, StateError};
use std::path::PathBuf;
use thiserror::Error;

/// Error type for state feed reads.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The backing source could not be read.
    #[error("failed to read game state from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot was read but is not a valid state tree.
    #[error(transparent)]
    State(#[from] StateError),
}

/// Source of game-state snapshots.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StateFeed: Send + Sync {
    /// Returns the latest snapshot.
    async fn next_state(&self) -> Result<GameState, FeedError>;
}

/// A feed that always returns the same snapshot.
#[derive(Debug, Clone)]
pub struct StaticStateFeed {
    state: GameState,
}

impl StaticStateFeed {
    pub fn new(state: GameState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl StateFeed for StaticStateFeed {
    async fn next_state(&self) -> Result<GameState, FeedError> {
        Ok(self.state.clone())
    }
}
