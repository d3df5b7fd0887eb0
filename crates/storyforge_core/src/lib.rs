//! Core data types for the Storyforge storyboard pipeline.
//!
//! A [`Storyboard`] is an indexed, fixed-size list of [`Scene`]s produced from one
//! [`IdentityReference`] and one set of [`StoryParameters`]. Scene 0 is the anchor;
//! its image constrains the look of every other scene.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod identity;
mod media;
mod parameters;
mod progress;
mod scene;
mod storyboard;
mod strategy;

pub use identity::IdentityReference;
pub use media::MediaPayload;
pub use parameters::{AspectRatio, StoryParameters, StoryParametersBuilder, VisualStyle};
pub use progress::{EventLevel, ProgressEvent, ProgressKind};
pub use scene::{Scene, SceneRole, SceneState, SceneStatus};
pub use storyboard::Storyboard;
pub use strategy::{PlatformTips, StrategyRecord, StrategySource, normalize_hashtags};
