//! Media store trait definition.

use crate::MediaReference;
use storyforge_core::MediaPayload;
use storyforge_error::StoryforgeResult;

/// Pluggable content-addressed store for image and video payloads.
#[async_trait::async_trait]
pub trait MediaStore: Send + Sync {
    /// Store a payload and return its reference.
    ///
    /// Storing identical bytes twice yields the same reference.
    async fn put(&self, payload: &MediaPayload) -> StoryforgeResult<MediaReference>;

    /// Load a payload, verifying its content hash.
    async fn get(&self, reference: &MediaReference) -> StoryforgeResult<MediaPayload>;

    /// Remove a payload.
    async fn remove(&self, reference: &MediaReference) -> StoryforgeResult<()>;

    /// Whether the payload is present.
    async fn contains(&self, reference: &MediaReference) -> StoryforgeResult<bool>;
}
