//! A storyboard shared between a run, regenerations and watchers.

use crate::guard::RegenerationSlot;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use storyforge_core::Storyboard;
use storyforge_error::BusyError;
use uuid::Uuid;

/// Cloneable handle to one storyboard.
///
/// Access goes through short closures so the lock is never held across an
/// `.await`. Every clone shares one regeneration slot, so at most one
/// regeneration runs per storyboard whichever orchestrator drives it.
///
/// # Examples
///
/// ```
/// use storyforge_core::{IdentityReference, MediaPayload, SceneStatus, StoryParameters, Storyboard};
/// use storyforge_narrative::SharedStoryboard;
///
/// let identity = IdentityReference::new(MediaPayload::new("image/png", vec![1]));
/// let board = Storyboard::new(identity, StoryParameters::default(), vec!["A scene.".into()]).unwrap();
/// let shared = SharedStoryboard::new(board);
///
/// assert_eq!(shared.read(|sb| sb.count(SceneStatus::Pending)), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SharedStoryboard {
    id: Uuid,
    inner: Arc<Mutex<Storyboard>>,
    regenerating: Arc<AtomicBool>,
}

impl SharedStoryboard {
    /// Share a storyboard.
    pub fn new(storyboard: Storyboard) -> Self {
        Self {
            id: *storyboard.id(),
            inner: Arc::new(Mutex::new(storyboard)),
            regenerating: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Storyboard id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Run `f` against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&Storyboard) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Run `f` against the current state with write access.
    pub fn update<R>(&self, f: impl FnOnce(&mut Storyboard) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Claim the storyboard's regeneration slot until the returned value drops.
    pub(crate) fn claim_regeneration(&self) -> Result<RegenerationSlot, BusyError> {
        RegenerationSlot::claim(&self.regenerating, self.id)
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> Storyboard {
        self.inner.lock().clone()
    }
}

impl From<Storyboard> for SharedStoryboard {
    fn from(storyboard: Storyboard) -> Self {
        Self::new(storyboard)
    }
}
