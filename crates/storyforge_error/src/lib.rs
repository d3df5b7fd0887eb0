//! Error types for the Storyforge pipeline.
//!
//! This crate provides the foundation error types used throughout the Storyforge workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! The pipeline-level conditions are [`PreconditionError`], [`GenerationError`],
//! [`SynthesisError`], [`StrategyError`] and [`BusyError`]. The rest describe
//! transport, serialization, configuration and storage failures.
//!
//! # Examples
//!
//! ```
//! use storyforge_error::{PreconditionError, PreconditionErrorKind, StoryforgeResult};
//!
//! fn start_run(scene_count: usize) -> StoryforgeResult<()> {
//!     if scene_count == 0 {
//!         Err(PreconditionError::new(PreconditionErrorKind::NoScenes))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(start_run(0).is_err());
//! assert!(start_run(4).is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod busy;
mod config;
mod error;
mod gateway;
mod generation;
mod http;
mod json;
mod precondition;
mod storage;
mod strategy;
mod synthesis;
mod transition;

pub use busy::BusyError;
pub use config::ConfigError;
pub use error::{StoryforgeError, StoryforgeErrorKind, StoryforgeResult};
pub use gateway::{GatewayError, GatewayErrorKind};
pub use generation::GenerationError;
pub use http::HttpError;
pub use json::JsonError;
pub use precondition::{PreconditionError, PreconditionErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use strategy::StrategyError;
pub use synthesis::{SynthesisError, SynthesisErrorKind};
pub use transition::TransitionError;
