//! JSON snapshot file as a game-state feed.
//!
//! Game integrations (or a test harness) write the latest telemetry to a
//! file; the feed re-reads it on every call.  The game kind is fixed per feed
//! because the telemetry itself does not carry it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use glint_core::GameState;
use tracing::trace;

use crate::application::state_feed::{FeedError, StateFeed};

#[derive(Debug, Clone)]
pub struct JsonFileStateFeed {
    path: PathBuf,
    kind: String,
}

impl JsonFileStateFeed {
    pub fn new(path: impl Into<PathBuf>, kind: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: kind.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StateFeed for JsonFileStateFeed {
    async fn next_state(&self) -> Result<GameState, FeedError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FeedError::Io {
                path: self.path.clone(),
                source,
            })?;
        trace!(path = %self.path.display(), bytes = text.len(), "state snapshot read");
        Ok(GameState::from_json(self.kind.clone(), &text)?)
    }
}
