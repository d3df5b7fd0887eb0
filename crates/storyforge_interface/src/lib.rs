//! Trait definitions for the Storyforge pipeline.
//!
//! The pipeline talks to the outside world through three seams:
//! - [`CapabilityGateway`]: the four remote generation capabilities
//! - [`ProgressObserver`]: receives every progress event of a run
//! - [`SessionStore`]: persists storyboards across process restarts

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gateway;
mod observer;
mod requests;
mod session;

pub use gateway::CapabilityGateway;
pub use observer::ProgressObserver;
pub use requests::{
    DescribeRequest, PlatformTipsDraft, ScriptRequest, StrategyDraft, StrategyRequest,
    SynthesisRequest,
};
pub use session::{SessionStore, SessionSummary};
