//! Per-scene state machine.

use crate::MediaPayload;
use serde::{Deserialize, Serialize};
use storyforge_error::TransitionError;

/// Position of a scene in the anchor protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum SceneRole {
    /// Scene 0, generated from the identity reference alone
    Anchor,
    /// Any later scene, generated against the identity reference and the anchor image
    Child,
}

impl SceneRole {
    /// Role of the scene at `index`.
    pub fn for_index(index: usize) -> Self {
        if index == 0 {
            SceneRole::Anchor
        } else {
            SceneRole::Child
        }
    }
}

/// Observable status of a scene.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum SceneStatus {
    /// Not yet started
    Pending,
    /// Prompt is being composed
    Composing,
    /// Synthesis call outstanding
    Generating,
    /// Image available
    Ready,
    /// Gave up on this scene
    Failed,
}

impl SceneStatus {
    /// Statuses reachable from this one during a production run.
    pub fn allowed_transitions(&self) -> &'static [SceneStatus] {
        match self {
            SceneStatus::Pending => &[SceneStatus::Composing],
            SceneStatus::Composing => &[SceneStatus::Generating, SceneStatus::Failed],
            SceneStatus::Generating => &[SceneStatus::Ready, SceneStatus::Failed],
            SceneStatus::Ready | SceneStatus::Failed => &[],
        }
    }

    /// Whether a run may move a scene from this status to `to`.
    pub fn can_transition_to(&self, to: SceneStatus) -> bool {
        self.allowed_transitions().contains(&to)
    }

    /// Ready and Failed end a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SceneStatus::Ready | SceneStatus::Failed)
    }

    /// Composing and Generating mean a call is (or is about to be) outstanding.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SceneStatus::Composing | SceneStatus::Generating)
    }
}

/// Scene state with the data each status guarantees.
///
/// `Ready` always carries both the prompt and the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SceneState {
    /// Not yet started
    Pending,
    /// Prompt is being composed
    Composing,
    /// Synthesis call outstanding for `prompt`
    Generating {
        /// Composed image prompt
        prompt: String,
    },
    /// Image available
    Ready {
        /// Composed image prompt
        prompt: String,
        /// Synthesized image
        image: MediaPayload,
    },
    /// Gave up on this scene
    Failed {
        /// Composed image prompt, if composition finished
        prompt: Option<String>,
        /// Failure description
        reason: String,
    },
}

impl SceneState {
    /// Status projection.
    pub fn status(&self) -> SceneStatus {
        match self {
            SceneState::Pending => SceneStatus::Pending,
            SceneState::Composing => SceneStatus::Composing,
            SceneState::Generating { .. } => SceneStatus::Generating,
            SceneState::Ready { .. } => SceneStatus::Ready,
            SceneState::Failed { .. } => SceneStatus::Failed,
        }
    }
}

/// One tracked unit of a storyboard.
///
/// # Examples
///
/// ```
/// use storyforge_core::{MediaPayload, Scene, SceneStatus};
///
/// let mut scene = Scene::new(0, "The Protagonist waves.");
/// scene.begin_composing().unwrap();
/// scene.begin_generating("Insert the character...").unwrap();
/// scene.complete(MediaPayload::new("image/png", vec![1, 2, 3])).unwrap();
///
/// assert_eq!(scene.status(), SceneStatus::Ready);
/// assert!(scene.prompt().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Scene {
    /// Position in the storyboard; 0 is the anchor
    index: usize,
    /// Raw description, possibly with inline dialogue
    description: String,
    /// Current state
    state: SceneState,
}

impl Scene {
    /// A pending scene.
    pub fn new(index: usize, description: impl Into<String>) -> Self {
        Self {
            index,
            description: description.into(),
            state: SceneState::Pending,
        }
    }

    /// Rebuild a scene from persisted parts.
    pub fn restore(index: usize, description: impl Into<String>, state: SceneState) -> Self {
        Self {
            index,
            description: description.into(),
            state,
        }
    }

    /// Current status.
    pub fn status(&self) -> SceneStatus {
        self.state.status()
    }

    /// Anchor or child.
    pub fn role(&self) -> SceneRole {
        SceneRole::for_index(self.index)
    }

    /// Composed prompt, once composition has finished.
    pub fn prompt(&self) -> Option<&str> {
        match &self.state {
            SceneState::Generating { prompt } | SceneState::Ready { prompt, .. } => Some(prompt),
            SceneState::Failed { prompt, .. } => prompt.as_deref(),
            SceneState::Pending | SceneState::Composing => None,
        }
    }

    /// Synthesized image, when ready.
    pub fn image(&self) -> Option<&MediaPayload> {
        match &self.state {
            SceneState::Ready { image, .. } => Some(image),
            _ => None,
        }
    }

    /// Failure description, when failed.
    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            SceneState::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// Pending → Composing.
    pub fn begin_composing(&mut self) -> Result<(), TransitionError> {
        self.check(SceneStatus::Composing)?;
        self.state = SceneState::Composing;
        Ok(())
    }

    /// Composing → Generating.
    pub fn begin_generating(&mut self, prompt: impl Into<String>) -> Result<(), TransitionError> {
        self.check(SceneStatus::Generating)?;
        self.state = SceneState::Generating {
            prompt: prompt.into(),
        };
        Ok(())
    }

    /// Generating → Ready.
    pub fn complete(&mut self, image: MediaPayload) -> Result<(), TransitionError> {
        self.check(SceneStatus::Ready)?;
        let prompt = self.take_prompt();
        self.state = SceneState::Ready { prompt, image };
        Ok(())
    }

    /// Composing or Generating → Failed.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), TransitionError> {
        self.check(SceneStatus::Failed)?;
        let prompt = self.prompt().map(str::to_string);
        self.state = SceneState::Failed {
            prompt,
            reason: reason.into(),
        };
        Ok(())
    }

    /// Replace the image of a finished scene that has a prompt.
    ///
    /// This is the only way out of Failed, and the only way to change a Ready image.
    pub fn regenerated(&mut self, image: MediaPayload) -> Result<(), TransitionError> {
        let status = self.status();
        if !status.is_terminal() || self.prompt().is_none() {
            return Err(TransitionError::new(
                self.index,
                status.to_string(),
                SceneStatus::Ready.to_string(),
            ));
        }
        let prompt = self.take_prompt();
        self.state = SceneState::Ready { prompt, image };
        Ok(())
    }

    /// Mark an in-flight scene Failed. Returns whether anything changed.
    pub fn interrupt(&mut self, reason: impl Into<String>) -> bool {
        if self.status().is_in_flight() {
            self.fail(reason).is_ok()
        } else {
            false
        }
    }

    fn check(&self, to: SceneStatus) -> Result<(), TransitionError> {
        let from = self.status();
        if from.can_transition_to(to) {
            Ok(())
        } else {
            Err(TransitionError::new(
                self.index,
                from.to_string(),
                to.to_string(),
            ))
        }
    }

    fn take_prompt(&mut self) -> String {
        match std::mem::replace(&mut self.state, SceneState::Pending) {
            SceneState::Generating { prompt } | SceneState::Ready { prompt, .. } => prompt,
            SceneState::Failed { prompt, .. } => prompt.unwrap_or_default(),
            SceneState::Pending | SceneState::Composing => String::new(),
        }
    }
}
