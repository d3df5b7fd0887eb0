//! The recurring subject's identity reference.

use crate::MediaPayload;
use serde::{Deserialize, Serialize};

/// The single image that establishes the subject's likeness across all scenes.
///
/// The profile is a physical description filled in later by a vision call.
/// It is informational only; prompts never restate physical traits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct IdentityReference {
    /// Reference image
    image: MediaPayload,
    /// Physical-description profile, if described
    profile: Option<String>,
}

impl IdentityReference {
    /// Create an identity reference without a profile.
    pub fn new(image: MediaPayload) -> Self {
        Self {
            image,
            profile: None,
        }
    }

    /// Attach a described profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// True when the reference carries a usable image.
    pub fn is_usable(&self) -> bool {
        !self.image.is_empty()
    }
}
