//! Progress events emitted while a storyboard is produced.

use crate::{SceneStatus, StrategySource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of a progress event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum EventLevel {
    /// Routine step
    Info,
    /// Something finished well
    Success,
    /// Something failed
    Error,
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressKind {
    /// A production run started
    RunStarted {
        /// Number of scenes
        scenes: usize,
    },
    /// A scene changed status
    SceneTransition {
        /// Scene index
        index: usize,
        /// Previous status
        from: SceneStatus,
        /// New status
        to: SceneStatus,
    },
    /// The anchor image is in place
    AnchorReady,
    /// The anchor failed and the run stopped
    RunAborted,
    /// Every scene reached Ready or Failed
    RunCompleted {
        /// Ready scenes
        ready: usize,
        /// Failed scenes
        failed: usize,
    },
    /// A strategy record was attached
    StrategyReady {
        /// Provenance of its fields
        source: StrategySource,
    },
    /// A single-scene regeneration started
    RegenerationStarted {
        /// Scene index
        index: usize,
    },
    /// A single-scene regeneration replaced the image
    RegenerationSucceeded {
        /// Scene index
        index: usize,
    },
    /// A single-scene regeneration failed; the scene is unchanged
    RegenerationFailed {
        /// Scene index
        index: usize,
    },
}

impl ProgressKind {
    /// Default severity for this kind of event.
    pub fn level(&self) -> EventLevel {
        match self {
            ProgressKind::SceneTransition { to, .. } => match to {
                SceneStatus::Ready => EventLevel::Success,
                SceneStatus::Failed => EventLevel::Error,
                _ => EventLevel::Info,
            },
            ProgressKind::AnchorReady | ProgressKind::RegenerationSucceeded { .. } => {
                EventLevel::Success
            }
            ProgressKind::RunCompleted { failed, .. } if *failed == 0 => EventLevel::Success,
            ProgressKind::StrategyReady { source } if *source != StrategySource::Fallback => {
                EventLevel::Success
            }
            ProgressKind::RunAborted | ProgressKind::RegenerationFailed { .. } => EventLevel::Error,
            _ => EventLevel::Info,
        }
    }
}

/// One human-readable, individually reportable progress step.
///
/// # Examples
///
/// ```
/// use storyforge_core::{EventLevel, ProgressEvent, ProgressKind, SceneStatus};
/// use uuid::Uuid;
///
/// let event = ProgressEvent::new(
///     Uuid::new_v4(),
///     ProgressKind::SceneTransition {
///         index: 2,
///         from: SceneStatus::Generating,
///         to: SceneStatus::Failed,
///     },
///     "Scene 3 failed",
/// );
/// assert_eq!(event.level(), &EventLevel::Error);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ProgressEvent {
    /// Storyboard the event belongs to
    storyboard_id: Uuid,
    /// When it happened
    timestamp: DateTime<Utc>,
    /// Severity
    level: EventLevel,
    /// What happened
    kind: ProgressKind,
    /// Log line
    message: String,
}

impl ProgressEvent {
    /// Create an event stamped now, with the kind's default severity.
    pub fn new(storyboard_id: Uuid, kind: ProgressKind, message: impl Into<String>) -> Self {
        Self {
            storyboard_id,
            timestamp: Utc::now(),
            level: kind.level(),
            kind,
            message: message.into(),
        }
    }

    /// Scene index the event concerns, if any.
    pub fn scene_index(&self) -> Option<usize> {
        match self.kind {
            ProgressKind::SceneTransition { index, .. }
            | ProgressKind::RegenerationStarted { index }
            | ProgressKind::RegenerationSucceeded { index }
            | ProgressKind::RegenerationFailed { index } => Some(index),
            _ => None,
        }
    }
}
