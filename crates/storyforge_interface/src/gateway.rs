//! The remote capability boundary.

use crate::{DescribeRequest, ScriptRequest, StrategyDraft, StrategyRequest, SynthesisRequest};
use async_trait::async_trait;
use storyforge_core::MediaPayload;
use storyforge_error::StoryforgeResult;

/// Four independently failable generation capabilities.
///
/// Implementations are thin: they translate requests to the provider's wire
/// format and map failures to typed errors. They never retry and never
/// substitute fallbacks; callers decide what a failure means.
#[async_trait]
pub trait CapabilityGateway: Send + Sync {
    /// Describe the physical features of the subject in an image.
    async fn describe_subject(&self, req: &DescribeRequest) -> StoryforgeResult<String>;

    /// Write an ordered list of scene texts.
    ///
    /// Fails with a `GenerationError` when the output is malformed or does not
    /// contain exactly `req.expected_scenes()` entries.
    async fn write_scenes(&self, req: &ScriptRequest) -> StoryforgeResult<Vec<String>>;

    /// Synthesize one image.
    ///
    /// Fails with a `SynthesisError` when the response carries no image.
    async fn synthesize_image(&self, req: &SynthesisRequest) -> StoryforgeResult<MediaPayload>;

    /// Draft a publishing strategy. Missing fields stay `None`.
    ///
    /// Fails with a `StrategyError` when the output cannot be read at all.
    async fn craft_strategy(&self, req: &StrategyRequest) -> StoryforgeResult<StrategyDraft>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;
}
