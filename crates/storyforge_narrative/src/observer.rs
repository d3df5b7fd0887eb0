//! Progress observers.

use std::sync::Arc;
use storyforge_core::{EventLevel, ProgressEvent};
use storyforge_interface::ProgressObserver;
use tokio::sync::mpsc;

/// Logs every event at the level matching its severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_event(&self, event: &ProgressEvent) {
        match event.level() {
            EventLevel::Error => tracing::error!(
                storyboard_id = %event.storyboard_id(),
                scene = ?event.scene_index(),
                "{}",
                event.message()
            ),
            EventLevel::Success | EventLevel::Info => tracing::info!(
                storyboard_id = %event.storyboard_id(),
                scene = ?event.scene_index(),
                level = %event.level(),
                "{}",
                event.message()
            ),
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_event(&self, _event: &ProgressEvent) {}
}

/// Forwards events to an unbounded channel.
///
/// A dropped receiver is not an error: the watcher abandoned the run, and
/// production carries on without it.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelObserver {
    /// Create an observer and the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_event(&self, event: &ProgressEvent) {
        if self.sender.send(event.clone()).is_err() {
            tracing::trace!("Progress receiver dropped");
        }
    }
}

/// Fans every event out to several observers, in insertion order.
#[derive(Clone, Default)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn ProgressObserver>>,
}

impl ObserverSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer.
    pub fn with(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Number of observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// True when no observer is registered.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl ProgressObserver for ObserverSet {
    fn on_event(&self, event: &ProgressEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}
