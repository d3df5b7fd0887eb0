//! Progress observation.

use storyforge_core::ProgressEvent;

/// Receives every progress event, in emission order.
///
/// Called synchronously from the producing task, including from drop guards, so
/// implementations must not block.
pub trait ProgressObserver: Send + Sync {
    /// Handle one event.
    fn on_event(&self, event: &ProgressEvent);
}
