//! Drop guards for in-flight work.

use crate::SharedStoryboard;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use storyforge_core::{ProgressEvent, ProgressKind, SceneStatus};
use storyforge_error::BusyError;
use storyforge_interface::ProgressObserver;
use uuid::Uuid;

/// Reason recorded on a scene whose run was dropped mid-flight.
pub(crate) const ABANDONED: &str = "abandoned";

/// Fails a scene that is still in flight when the guard drops.
///
/// Armed while a scene is Composing or Generating. Disarm once the scene has
/// been driven to a terminal state by normal control flow.
pub(crate) struct InFlightGuard {
    board: SharedStoryboard,
    observer: Arc<dyn ProgressObserver>,
    index: usize,
    armed: bool,
}

impl InFlightGuard {
    pub(crate) fn new(
        board: SharedStoryboard,
        observer: Arc<dyn ProgressObserver>,
        index: usize,
    ) -> Self {
        Self {
            board,
            observer,
            index,
            armed: true,
        }
    }

    pub(crate) fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let index = self.index;
        let from = self.board.update(|sb| {
            let scene = sb.scene_mut(index).ok()?;
            let from = scene.status();
            scene.interrupt(ABANDONED).then_some(from)
        });
        if let Some(from) = from {
            tracing::warn!(index, %from, "Scene abandoned mid-flight");
            self.observer.on_event(&ProgressEvent::new(
                self.board.id(),
                ProgressKind::SceneTransition {
                    index,
                    from,
                    to: SceneStatus::Failed,
                },
                format!("Scene {} abandoned while {}", index + 1, from),
            ));
        }
    }
}

/// Releases a storyboard's regeneration slot on drop.
///
/// Claimed through [`SharedStoryboard::claim_regeneration`].
#[derive(Debug)]
pub(crate) struct RegenerationSlot {
    taken: Arc<AtomicBool>,
}

impl RegenerationSlot {
    /// Take the slot behind `taken`, or fail with `BusyError` for `id`.
    pub(crate) fn claim(taken: &Arc<AtomicBool>, id: Uuid) -> Result<Self, BusyError> {
        taken
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| BusyError::new(id.to_string()))?;
        Ok(Self {
            taken: Arc::clone(taken),
        })
    }
}

impl Drop for RegenerationSlot {
    fn drop(&mut self) {
        self.taken.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_is_exclusive_until_dropped() {
        let taken = Arc::new(AtomicBool::new(false));
        let other = Arc::new(AtomicBool::new(false));
        let id = Uuid::new_v4();

        let first = RegenerationSlot::claim(&taken, id);
        assert!(first.is_ok());
        assert!(RegenerationSlot::claim(&taken, id).is_err());
        assert!(RegenerationSlot::claim(&other, Uuid::new_v4()).is_ok());

        drop(first);
        assert!(RegenerationSlot::claim(&taken, id).is_ok());
    }
}
