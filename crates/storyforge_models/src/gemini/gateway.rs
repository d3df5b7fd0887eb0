//! Gemini implementation of the capability gateway.

use crate::gemini::extract::extract_json;
use crate::gemini::{
    Content, GeminiConfig, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Part,
};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use storyforge_core::MediaPayload;
use storyforge_error::{
    GatewayError, GatewayErrorKind, GenerationError, HttpError, StoryforgeResult, StrategyError,
    SynthesisError, SynthesisErrorKind,
};
use storyforge_interface::{
    CapabilityGateway, DescribeRequest, ScriptRequest, StrategyDraft, StrategyRequest,
    SynthesisRequest,
};
use tracing::{debug, instrument, warn};

/// Capability gateway backed by the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiGateway {
    client: Client,
    api_key: String,
    config: GeminiConfig,
}

impl GeminiGateway {
    /// Creates a gateway reading the API key from `config.api_key_env()`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The API key is not set in the environment
    /// - The HTTP client cannot be initialized
    #[instrument(skip_all)]
    pub fn new(config: GeminiConfig) -> StoryforgeResult<Self> {
        let api_key = std::env::var(config.api_key_env()).map_err(|_| {
            GatewayError::new(GatewayErrorKind::MissingApiKey(
                config.api_key_env().clone(),
            ))
        })?;
        Self::with_api_key(api_key, config)
    }

    /// Creates a gateway with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    #[instrument(skip_all)]
    pub fn with_api_key(api_key: impl Into<String>, config: GeminiConfig) -> StoryforgeResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(*config.timeout_secs()))
            .build()
            .map_err(|e| GatewayError::new(GatewayErrorKind::ClientCreation(e.to_string())))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    #[instrument(skip(self, body))]
    async fn generate(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> StoryforgeResult<GenerateContentResponse> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url().trim_end_matches('/'),
            model
        );
        debug!(url = %url, "Sending Gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Request to {} failed: {}", model, e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GatewayError::new(GatewayErrorKind::HttpStatus {
                status_code: status,
                message: error_text,
            })
            .into());
        }

        response.json::<GenerateContentResponse>().await.map_err(|e| {
            GatewayError::new(GatewayErrorKind::ApiRequest(format!(
                "Failed to parse response: {}",
                e
            )))
            .into()
        })
    }

    fn text_request(
        system_instruction: &str,
        parts: Vec<Part>,
        schema: Value,
    ) -> StoryforgeResult<GenerateContentRequest> {
        GenerateContentRequest::builder()
            .contents(vec![Content::user(parts)])
            .system_instruction(Some(Content::system(system_instruction)))
            .generation_config(Some(GenerationConfig::json(schema)))
            .build()
            .map_err(|e| GatewayError::new(GatewayErrorKind::ApiRequest(e.to_string())).into())
    }
}

fn scene_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": { "type": "STRING" }
    })
}

fn strategy_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "viralHooks": { "type": "ARRAY", "items": { "type": "STRING" } },
            "caption": { "type": "STRING" },
            "hashtags": { "type": "ARRAY", "items": { "type": "STRING" } },
            "platformTips": {
                "type": "OBJECT",
                "properties": {
                    "shortFormVideo": { "type": "STRING" },
                    "photoReel": { "type": "STRING" },
                    "generalFeed": { "type": "STRING" }
                }
            },
            "bestTime": { "type": "STRING" }
        },
        "required": ["viralHooks", "caption", "hashtags", "platformTips", "bestTime"]
    })
}

/// Parse an ordered scene list from model text.
///
/// Accepts a bare JSON array of strings or an object with a `scenes` array.
pub(crate) fn parse_scenes(text: &str, expected: usize) -> StoryforgeResult<Vec<String>> {
    let json = extract_json(text)
        .ok_or_else(|| GenerationError::new("response contains no JSON"))?;
    let value: Value = serde_json::from_str(&json)
        .map_err(|e| GenerationError::new(format!("invalid scene JSON: {}", e)))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("scenes") {
            Some(Value::Array(items)) => items,
            _ => return Err(GenerationError::new("object has no `scenes` array").into()),
        },
        _ => return Err(GenerationError::new("expected a JSON array of scenes").into()),
    };

    let scenes = items
        .into_iter()
        .map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            _ => Err(GenerationError::new("every scene must be a non-empty string")),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if scenes.len() != expected {
        return Err(GenerationError::new(format!(
            "expected {} scenes, got {}",
            expected,
            scenes.len()
        ))
        .into());
    }
    Ok(scenes)
}

#[async_trait]
impl CapabilityGateway for GeminiGateway {
    #[instrument(skip(self, req), fields(mime = %req.image().mime()))]
    async fn describe_subject(&self, req: &DescribeRequest) -> StoryforgeResult<String> {
        let body = GenerateContentRequest::builder()
            .contents(vec![Content::user(vec![
                Part::media(req.image()),
                Part::text(req.instruction()),
            ])])
            .build()
            .map_err(|e| GatewayError::new(GatewayErrorKind::ApiRequest(e.to_string())))?;

        let response = self.generate(self.config.vision_model(), &body).await?;
        response
            .text()
            .ok_or_else(|| GatewayError::new(GatewayErrorKind::EmptyResponse).into())
    }

    #[instrument(skip(self, req), fields(expected = req.expected_scenes(), video = req.style_reference().is_some()))]
    async fn write_scenes(&self, req: &ScriptRequest) -> StoryforgeResult<Vec<String>> {
        let mut parts = Vec::with_capacity(2);
        if let Some(video) = req.style_reference() {
            parts.push(Part::media(video));
        }
        parts.push(Part::text(req.prompt()));

        let body = Self::text_request(req.system_instruction(), parts, scene_schema())?;
        let response = self.generate(self.config.text_model(), &body).await?;
        let text = response
            .text()
            .ok_or_else(|| GenerationError::new("scene writer returned no text"))?;

        parse_scenes(&text, *req.expected_scenes())
    }

    #[instrument(skip(self, req), fields(identity = req.identity().is_some(), anchor = req.anchor().is_some()))]
    async fn synthesize_image(&self, req: &SynthesisRequest) -> StoryforgeResult<MediaPayload> {
        let mut parts: Vec<Part> = req.images().into_iter().map(Part::media).collect();
        parts.push(Part::text(req.framed_prompt()));

        let body = GenerateContentRequest::builder()
            .contents(vec![Content::user(parts)])
            .generation_config(Some(GenerationConfig::image()))
            .build()
            .map_err(|e| GatewayError::new(GatewayErrorKind::ApiRequest(e.to_string())))?;

        let response = self.generate(self.config.image_model(), &body).await?;
        let Some(inline) = response.inline_data() else {
            warn!(
                reason = response.block_reason().unwrap_or("unknown"),
                "Image response carried no image"
            );
            return Err(SynthesisError::new(SynthesisErrorKind::NoImagePayload).into());
        };

        let bytes = STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|e| GatewayError::new(GatewayErrorKind::Base64Decode(e.to_string())))?;
        if bytes.is_empty() {
            return Err(SynthesisError::new(SynthesisErrorKind::NoImagePayload).into());
        }

        debug!(size = bytes.len(), mime = %inline.mime_type, "Received image");
        Ok(MediaPayload::new(inline.mime_type.clone(), bytes))
    }

    #[instrument(skip(self, req))]
    async fn craft_strategy(&self, req: &StrategyRequest) -> StoryforgeResult<StrategyDraft> {
        let body = Self::text_request(
            req.system_instruction(),
            vec![Part::text(req.prompt())],
            strategy_schema(),
        )?;
        let response = self.generate(self.config.text_model(), &body).await?;
        let text = response
            .text()
            .ok_or_else(|| StrategyError::new("strategist returned no text"))?;
        let json = extract_json(&text)
            .ok_or_else(|| StrategyError::new("strategy response contains no JSON"))?;

        StrategyDraft::from_json(&json)
            .map_err(|e| StrategyError::new(format!("invalid strategy JSON: {}", e)).into())
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_scene_array() {
        let scenes = parse_scenes(r#"["a", "b", "c", "d"]"#, 4).unwrap();
        assert_eq!(scenes, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn parses_wrapped_scene_object() {
        let text = "```json\n{\"scenes\": [\" a \", \"b\", \"c\", \"d\"]}\n```";
        let scenes = parse_scenes(text, 4).unwrap();
        assert_eq!(scenes[0], "a");
    }

    #[test]
    fn rejects_wrong_count() {
        let err = parse_scenes(r#"["a", "b", "c"]"#, 4).unwrap_err();
        assert!(format!("{}", err).contains("expected 4 scenes, got 3"));
    }

    #[test]
    fn rejects_non_string_entries() {
        assert!(parse_scenes(r#"["a", 2, "c", "d"]"#, 4).is_err());
        assert!(parse_scenes(r#"["a", "", "c", "d"]"#, 4).is_err());
        assert!(parse_scenes("four scenes coming up", 4).is_err());
    }

    #[test]
    fn missing_api_key_is_reported() {
        let config: GeminiConfig = serde_json::from_value(json!({
            "api_key_env": "STORYFORGE_TEST_KEY_THAT_IS_NEVER_SET"
        }))
        .unwrap();

        let err = GeminiGateway::new(config).unwrap_err();
        assert!(format!("{}", err).contains("STORYFORGE_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn explicit_key_builds_client() {
        let gateway = GeminiGateway::with_api_key("test-key", GeminiConfig::default()).unwrap();
        assert_eq!(gateway.provider_name(), "gemini");
        assert_eq!(gateway.config().image_model(), "gemini-2.5-flash-image");
    }
}
