//! The ordered scene collection of one production run.

use crate::{IdentityReference, MediaPayload, Scene, SceneStatus, StoryParameters, StrategyRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storyforge_error::{PreconditionError, PreconditionErrorKind, StoryforgeResult};
use uuid::Uuid;

/// Scenes of one run plus the inputs that produced them.
///
/// The scene list is fixed at creation; scenes are addressed by index and scene 0
/// is always the anchor.
///
/// # Examples
///
/// ```
/// use storyforge_core::{IdentityReference, MediaPayload, StoryParameters, Storyboard};
///
/// let identity = IdentityReference::new(MediaPayload::new("image/png", vec![1, 2, 3]));
/// let board = Storyboard::new(
///     identity,
///     StoryParameters::default(),
///     vec!["The Protagonist arrives.".to_string(), "The Protagonist leaves.".to_string()],
/// )
/// .unwrap();
///
/// assert_eq!(board.scenes().len(), 2);
/// assert!(board.anchor().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Storyboard {
    /// Identity used for guards and persistence
    id: Uuid,
    /// Creation time
    created_at: DateTime<Utc>,
    /// Subject likeness
    identity: IdentityReference,
    /// Run inputs
    parameters: StoryParameters,
    /// Scenes by index
    scenes: Vec<Scene>,
    /// Current anchor image
    anchor: Option<MediaPayload>,
    /// Publishing strategy, once synthesized
    strategy: Option<StrategyRecord>,
}

impl Storyboard {
    /// Create a storyboard of pending scenes.
    ///
    /// # Errors
    ///
    /// Returns a precondition error when the identity has no image, the scene list
    /// is empty, or any scene text is blank.
    pub fn new(
        identity: IdentityReference,
        parameters: StoryParameters,
        descriptions: Vec<String>,
    ) -> StoryforgeResult<Self> {
        if !identity.is_usable() {
            return Err(PreconditionError::new(PreconditionErrorKind::MissingIdentity).into());
        }
        if descriptions.is_empty() {
            return Err(PreconditionError::new(PreconditionErrorKind::NoScenes).into());
        }
        if let Some(index) = descriptions.iter().position(|d| d.trim().is_empty()) {
            return Err(PreconditionError::new(PreconditionErrorKind::BlankScene(index)).into());
        }

        let scenes = descriptions
            .into_iter()
            .enumerate()
            .map(|(index, description)| Scene::new(index, description))
            .collect();

        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            identity,
            parameters,
            scenes,
            anchor: None,
            strategy: None,
        })
    }

    /// Rebuild a storyboard from persisted parts.
    pub fn restore(
        id: Uuid,
        created_at: DateTime<Utc>,
        identity: IdentityReference,
        parameters: StoryParameters,
        scenes: Vec<Scene>,
        anchor: Option<MediaPayload>,
        strategy: Option<StrategyRecord>,
    ) -> Self {
        Self {
            id,
            created_at,
            identity,
            parameters,
            scenes,
            anchor,
            strategy,
        }
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// True for a storyboard with no scenes (only reachable through `restore`).
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Scene at `index`.
    pub fn scene(&self, index: usize) -> StoryforgeResult<&Scene> {
        let len = self.scenes.len();
        self.scenes.get(index).ok_or_else(|| {
            PreconditionError::new(PreconditionErrorKind::SceneOutOfRange { index, len }).into()
        })
    }

    /// Mutable scene at `index`.
    pub fn scene_mut(&mut self, index: usize) -> StoryforgeResult<&mut Scene> {
        let len = self.scenes.len();
        self.scenes.get_mut(index).ok_or_else(|| {
            PreconditionError::new(PreconditionErrorKind::SceneOutOfRange { index, len }).into()
        })
    }

    /// Replace the anchor image.
    pub fn set_anchor(&mut self, image: MediaPayload) {
        self.anchor = Some(image);
    }

    /// Attach the publishing strategy.
    pub fn set_strategy(&mut self, strategy: StrategyRecord) {
        self.strategy = Some(strategy);
    }

    /// Scene descriptions in order.
    pub fn descriptions(&self) -> Vec<&str> {
        self.scenes.iter().map(|s| s.description().as_str()).collect()
    }

    /// True while no scene has left Pending.
    pub fn is_untouched(&self) -> bool {
        self.scenes.iter().all(|s| s.status() == SceneStatus::Pending)
    }

    /// Number of scenes with the given status.
    pub fn count(&self, status: SceneStatus) -> usize {
        self.scenes.iter().filter(|s| s.status() == status).count()
    }
}
