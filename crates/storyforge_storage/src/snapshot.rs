//! Persisted form of a storyboard.

use crate::MediaReference;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storyforge_core::{StoryParameters, StrategyRecord};
use uuid::Uuid;

/// Snapshot format version written by this crate.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Reason recorded for scenes that were mid-flight when a snapshot was taken.
pub const INTERRUPTED: &str = "interrupted before completion";

/// Stored scene state. In-flight states are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StoredSceneState {
    /// Not yet started
    Pending,
    /// Image available
    Ready {
        /// Composed image prompt
        prompt: String,
        /// Stored image
        image: MediaReference,
    },
    /// Gave up on this scene
    Failed {
        /// Composed image prompt, if composition finished
        prompt: Option<String>,
        /// Failure description
        reason: String,
    },
}

/// One stored scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Position in the storyboard
    pub index: usize,
    /// Raw description
    pub description: String,
    /// Stored state
    #[serde(flatten)]
    pub state: StoredSceneState,
}

/// Stored storyboard with images replaced by references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Format version
    pub version: u32,
    /// Storyboard id
    pub id: Uuid,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Identity reference image
    pub identity_image: MediaReference,
    /// Identity profile text
    pub identity_profile: Option<String>,
    /// Run inputs
    pub parameters: StoryParameters,
    /// Scenes by index
    pub scenes: Vec<SceneSnapshot>,
    /// Current anchor image
    pub anchor: Option<MediaReference>,
    /// Publishing strategy
    pub strategy: Option<StrategyRecord>,
}

impl SessionSnapshot {
    /// Number of ready scenes.
    pub fn count_ready(&self) -> usize {
        self.scenes
            .iter()
            .filter(|s| matches!(s.state, StoredSceneState::Ready { .. }))
            .count()
    }

    /// Number of failed scenes.
    pub fn count_failed(&self) -> usize {
        self.scenes
            .iter()
            .filter(|s| matches!(s.state, StoredSceneState::Failed { .. }))
            .count()
    }
}
