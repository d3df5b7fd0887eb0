//! Storyboard production for Storyforge.
//!
//! This crate turns story parameters and an identity reference into a visually
//! consistent storyboard:
//!
//! - [`ScriptWriter`] asks for four scene texts, falling back to a fixed script
//! - [`PromptCompositor`] turns a scene text into an image instruction
//! - [`StoryboardOrchestrator`] runs the anchor scene first, then every child
//!   scene against the anchor image, and handles single-scene regeneration
//! - [`StrategySynthesizer`] derives a publishing strategy with field-level fallback
//!
//! # Dialogue markup
//!
//! Scene texts may embed spoken lines as `(Speaker: "utterance")`. The
//! [`dialogue`] module strips them from image prompts and splits them out for
//! display.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod dialogue;

mod compositor;
mod guard;
mod observer;
mod orchestrator;
mod profile;
mod script;
mod shared;
mod strategy;

pub use compositor::{PromptCompositor, compose};
pub use dialogue::{SceneSegment, segments, strip_dialogue};
pub use observer::{ChannelObserver, NoopObserver, ObserverSet, TracingObserver};
pub use orchestrator::{RunReport, StoryboardOrchestrator};
pub use profile::{FALLBACK_PROFILE, SubjectProfiler};
pub use script::{SCENE_COUNT, Script, ScriptSource, ScriptWriter, fallback_script};
pub use shared::SharedStoryboard;
pub use strategy::{StrategySynthesizer, merge as merge_strategy};
