//! Best-effort physical description of the subject.

use std::sync::Arc;
use storyforge_core::{IdentityReference, MediaPayload};
use storyforge_interface::{CapabilityGateway, DescribeRequest};

/// Description used when the vision call fails.
pub const FALLBACK_PROFILE: &str = "A character with distinct features";

const INSTRUCTION: &str = "Describe the PHYSICAL FEATURES of the main subject in this image: \
    hair color and style, eye color, facial structure, skin tone, body build and current \
    outfit. Be concise and objective. Do not describe the background.";

/// Fills identity profiles through the gateway's describe capability.
pub struct SubjectProfiler<G> {
    gateway: Arc<G>,
}

impl<G: CapabilityGateway> SubjectProfiler<G> {
    /// Create a profiler over a shared gateway.
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Describe the subject in `image`, or return [`FALLBACK_PROFILE`].
    #[tracing::instrument(skip_all, fields(mime = image.mime(), bytes = image.len()))]
    pub async fn describe(&self, image: &MediaPayload) -> String {
        let request = DescribeRequest::new(INSTRUCTION, image.clone());
        match self.gateway.describe_subject(&request).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                tracing::warn!("Empty subject description, using fallback");
                FALLBACK_PROFILE.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Subject description failed, using fallback");
                FALLBACK_PROFILE.to_string()
            }
        }
    }

    /// Attach a described profile to `identity`.
    pub async fn profile(&self, identity: IdentityReference) -> IdentityReference {
        let profile = self.describe(identity.image()).await;
        identity.with_profile(profile)
    }
}
