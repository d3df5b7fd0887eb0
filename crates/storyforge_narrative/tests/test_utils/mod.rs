//! Test utilities for narrative tests.

pub mod mock_gateway;

#[allow(unused_imports)]
pub use mock_gateway::{MockGateway, MockImage, png};

use storyforge_core::{IdentityReference, ProgressEvent, StoryParameters};
use storyforge_narrative::SharedStoryboard;
use tokio::sync::mpsc::UnboundedReceiver;

/// Identity reference with a recognizable payload.
#[allow(dead_code)]
pub fn identity() -> IdentityReference {
    IdentityReference::new(png(0))
}

/// Four-scene storyboard with default parameters.
#[allow(dead_code)]
pub fn board() -> SharedStoryboard {
    storyforge_narrative::StoryboardOrchestrator::<MockGateway>::prepare(
        identity(),
        StoryParameters::default(),
        vec![
            r#"The Protagonist arrives. (Ana: "Hola!")"#.to_string(),
            "The Protagonist climbs.".to_string(),
            "The Protagonist falls.".to_string(),
            "The Protagonist laughs.".to_string(),
        ],
    )
    .expect("valid storyboard")
}

/// Drain every event received so far.
#[allow(dead_code)]
pub fn drain(receiver: &mut UnboundedReceiver<ProgressEvent>) -> Vec<ProgressEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}
