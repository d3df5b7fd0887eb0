//! Storyforge - identity-consistent storyboard production
//!
//! Storyforge turns one reference image of a subject and a short story brief
//! into a storyboard of scenes that share the subject's likeness and a single
//! visual style, plus a publishing strategy for the result.
//!
//! # How consistency is kept
//!
//! - **Anchor scene**: scene 1 is synthesized from the identity reference alone
//! - **Child scenes**: every later scene is synthesized against both the identity
//!   reference and the anchor image
//! - **Regeneration**: any single scene can be redone from its stored prompt
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use storyforge::{
//!     GeminiGateway, IdentityReference, MediaPayload, StoryParameters, StoryboardOrchestrator,
//!     StoryforgeConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoryforgeConfig::load()?;
//!     let orchestrator = StoryboardOrchestrator::new(GeminiGateway::new(config.gemini().clone())?);
//!
//!     let params = StoryParameters::default();
//!     let script = orchestrator.write_script(&params).await;
//!     let identity = IdentityReference::new(MediaPayload::new("image/png", std::fs::read("me.png")?));
//!     let board = StoryboardOrchestrator::<GeminiGateway>::prepare(identity, params, script.into_scenes())?;
//!
//!     let report = orchestrator.run(&board).await?;
//!     println!("{}", report.strategy().caption());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `storyforge_error` - Error types
//! - `storyforge_core` - Data model and scene state machine
//! - `storyforge_interface` - Gateway, observer and session store traits
//! - `storyforge_storage` - Content-addressable media and session snapshots
//! - `storyforge_models` - Gemini adapter
//! - `storyforge_narrative` - Prompt composition and orchestration
//!
//! This crate re-exports everything and adds configuration and logging setup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod logging;

pub use config::{ProductionConfig, StorageConfig, StoryforgeConfig};
pub use logging::{LoggingConfig, init_logging};

pub use storyforge_core::*;
pub use storyforge_error::*;
pub use storyforge_interface::*;
pub use storyforge_models::*;
pub use storyforge_narrative::{
    ChannelObserver, FALLBACK_PROFILE, NoopObserver, ObserverSet, PromptCompositor, RunReport,
    SCENE_COUNT, SceneSegment, Script, ScriptSource, ScriptWriter, SharedStoryboard,
    StoryboardOrchestrator, StrategySynthesizer, SubjectProfiler, TracingObserver, compose,
    fallback_script, merge_strategy, segments, strip_dialogue,
};
pub use storyforge_storage::{
    FileSessionStore, FileSystemMediaStore, MediaReference, MediaStore, SceneSnapshot,
    SessionSnapshot, StoredSceneState,
};
