//! Gemini `generateContent` wire types.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use storyforge_core::MediaPayload;

/// One part of a request turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// Text content
    Text(TextPart),
    /// Inline binary content
    InlineData(InlineDataPart),
}

impl Part {
    /// Text part.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text(TextPart { text: text.into() })
    }

    /// Inline part carrying a media payload as base64.
    pub fn media(payload: &MediaPayload) -> Self {
        Part::InlineData(InlineDataPart {
            inline_data: InlineData {
                mime_type: payload.mime().to_string(),
                data: payload.to_base64(),
            },
        })
    }
}

/// Text content part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPart {
    /// The text
    pub text: String,
}

/// Inline data content part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineDataPart {
    /// The payload
    pub inline_data: InlineData,
}

/// Inline data with MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type
    pub mime_type: String,
    /// Base64-encoded bytes
    pub data: String,
}

/// A turn of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Author role; omitted for system instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Parts in order
    pub parts: Vec<Part>,
}

impl Content {
    /// A user turn.
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }

    /// A system instruction.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

/// Output controls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Requested MIME type of text output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    /// OpenAPI-style schema the output must follow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    /// Output modalities, e.g. `["IMAGE", "TEXT"]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

impl GenerationConfig {
    /// JSON output constrained by `schema`.
    pub fn json(schema: serde_json::Value) -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
            response_modalities: None,
        }
    }

    /// Image output with optional accompanying text.
    pub fn image() -> Self {
        Self {
            response_modalities: Some(vec!["IMAGE".to_string(), "TEXT".to_string()]),
            ..Self::default()
        }
    }
}

/// Request body of `models/{model}:generateContent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns
    contents: Vec<Content>,
    /// System instruction
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    /// Output controls
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Creates a new builder for `GenerateContentRequest`.
    pub fn builder() -> GenerateContentRequestBuilder {
        GenerateContentRequestBuilder::default()
    }
}

/// Response part; unknown part kinds deserialize with both fields empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponsePart {
    /// Text content
    pub text: Option<String>,
    /// Inline binary content
    pub inline_data: Option<InlineData>,
    /// True for model reasoning parts
    pub thought: Option<bool>,
}

/// Response turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseContent {
    /// Parts in order
    pub parts: Vec<ResponsePart>,
}

/// One candidate answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Candidate {
    /// Candidate content
    pub content: Option<ResponseContent>,
    /// Why generation stopped
    pub finish_reason: Option<String>,
}

/// Feedback about the prompt itself, e.g. a safety block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromptFeedback {
    /// Block reason, if blocked
    pub block_reason: Option<String>,
}

/// Response body of `generateContent`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateContentResponse {
    /// Candidate answers
    pub candidates: Vec<Candidate>,
    /// Prompt feedback
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .into_iter()
            .flat_map(|content| content.parts.iter())
            .filter(|part| part.thought != Some(true))
    }

    /// Concatenated text of the first candidate, if any.
    pub fn text(&self) -> Option<String> {
        let text: String = self.parts().filter_map(|p| p.text.as_deref()).collect();
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// First inline payload of the first candidate, if any.
    pub fn inline_data(&self) -> Option<&InlineData> {
        self.parts().find_map(|p| p.inline_data.as_ref())
    }

    /// Why the response is empty, when the service said so.
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
            .or_else(|| {
                self.candidates
                    .first()
                    .and_then(|c| c.finish_reason.as_deref())
            })
    }
}
