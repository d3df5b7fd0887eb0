//! Session persistence boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storyforge_core::{SceneStatus, Storyboard};
use storyforge_error::StoryforgeResult;
use uuid::Uuid;

/// Lightweight listing entry for a stored storyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct SessionSummary {
    /// Storyboard id
    id: Uuid,
    /// Creation time
    created_at: DateTime<Utc>,
    /// Story premise
    idea: String,
    /// Number of scenes
    scenes: usize,
    /// Scenes with an image
    ready: usize,
    /// Scenes that failed
    failed: usize,
    /// Whether a strategy was attached
    has_strategy: bool,
}

impl SessionSummary {
    /// Create a summary from its parts.
    pub fn new(
        id: Uuid,
        created_at: DateTime<Utc>,
        idea: impl Into<String>,
        scenes: usize,
        ready: usize,
        failed: usize,
        has_strategy: bool,
    ) -> Self {
        Self {
            id,
            created_at,
            idea: idea.into(),
            scenes,
            ready,
            failed,
            has_strategy,
        }
    }

    /// Summarize a storyboard.
    pub fn of(storyboard: &Storyboard) -> Self {
        Self {
            id: *storyboard.id(),
            created_at: *storyboard.created_at(),
            idea: storyboard.parameters().idea().clone(),
            scenes: storyboard.len(),
            ready: storyboard.count(SceneStatus::Ready),
            failed: storyboard.count(SceneStatus::Failed),
            has_strategy: storyboard.strategy().is_some(),
        }
    }
}

/// Persists storyboards so a session can be resumed or redisplayed.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Save (or overwrite) a storyboard snapshot.
    ///
    /// Scenes caught mid-flight are persisted as Failed.
    async fn save(&self, storyboard: &Storyboard) -> StoryforgeResult<()>;

    /// Load a storyboard by id.
    async fn load(&self, id: Uuid) -> StoryforgeResult<Storyboard>;

    /// Summaries of all stored storyboards, newest first.
    async fn list(&self) -> StoryforgeResult<Vec<SessionSummary>>;

    /// Remove a stored storyboard.
    async fn delete(&self, id: Uuid) -> StoryforgeResult<()>;
}
