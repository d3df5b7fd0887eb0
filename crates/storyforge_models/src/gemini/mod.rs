//! Google Gemini adapter.
//!
//! Talks to the REST `generateContent` endpoint directly so images can travel as
//! inline parts in both directions:
//! - text capabilities (scene writing, strategy) request JSON with a response schema
//! - subject description sends the identity image with an instruction
//! - image synthesis sends identity, then anchor, then the framed prompt

mod config;
mod dto;
mod extract;
mod gateway;

pub use config::GeminiConfig;
pub use dto::{
    Candidate, Content, GenerateContentRequest, GenerateContentRequestBuilder,
    GenerateContentResponse, GenerationConfig, InlineData, InlineDataPart, Part, PromptFeedback,
    ResponseContent, ResponsePart, TextPart,
};
pub use gateway::GeminiGateway;
