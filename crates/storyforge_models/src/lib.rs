//! Generative model adapters for Storyforge.
//!
//! Each adapter implements [`storyforge_interface::CapabilityGateway`] for one
//! provider and sits behind its own feature flag.
//!
//! # Available Providers
//!
//! - **Gemini** (Google) - Enabled by default with the `gemini` feature
//!
//! ```no_run
//! # #[cfg(feature = "gemini")]
//! # {
//! use storyforge_core::MediaPayload;
//! use storyforge_interface::{CapabilityGateway, SynthesisRequest};
//! use storyforge_models::{GeminiConfig, GeminiGateway};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = GeminiGateway::new(GeminiConfig::default())?;
//! let face = MediaPayload::new("image/png", std::fs::read("face.png")?);
//! let request = SynthesisRequest::new("The character waves.", Some(face), None);
//! let image = gateway.synthesize_image(&request).await?;
//! std::fs::write("scene1.png", image.data())?;
//! # Ok(())
//! # }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{
    Candidate, Content, GeminiConfig, GeminiGateway, GenerateContentRequest,
    GenerateContentRequestBuilder, GenerateContentResponse, GenerationConfig, InlineData,
    InlineDataPart, Part, PromptFeedback, ResponseContent, ResponsePart, TextPart,
};
