//! Gemini adapter configuration.

use serde::{Deserialize, Serialize};

/// Endpoint, models and timeout for the Gemini adapter.
///
/// Deserializes from the `[gemini]` section of `storyforge.toml`; missing keys
/// take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct GeminiConfig {
    /// API root, without trailing `/models`
    base_url: String,
    /// Model for scene writing and strategy
    text_model: String,
    /// Model for subject description
    vision_model: String,
    /// Model for image synthesis
    image_model: String,
    /// Per-request timeout in seconds
    timeout_secs: u64,
    /// Environment variable holding the API key
    api_key_env: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            text_model: "gemini-2.5-flash".to_string(),
            vision_model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            timeout_secs: 120,
            api_key_env: "GEMINI_API_KEY".to_string(),
        }
    }
}
