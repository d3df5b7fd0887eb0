//! Request and response shapes crossing the capability boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use storyforge_core::MediaPayload;

/// Ask for a physical description of the subject in an image.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct DescribeRequest {
    /// What to describe and how
    instruction: String,
    /// Image of the subject
    image: MediaPayload,
}

impl DescribeRequest {
    /// Create a describe request.
    pub fn new(instruction: impl Into<String>, image: MediaPayload) -> Self {
        Self {
            instruction: instruction.into(),
            image,
        }
    }
}

/// Ask for an ordered list of scene texts.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct ScriptRequest {
    /// Writer persona and rules
    system_instruction: String,
    /// Story brief
    prompt: String,
    /// Video whose pacing and tone should be imitated
    style_reference: Option<MediaPayload>,
    /// Exact number of scenes required
    expected_scenes: usize,
}

impl ScriptRequest {
    /// Create a script request.
    pub fn new(
        system_instruction: impl Into<String>,
        prompt: impl Into<String>,
        style_reference: Option<MediaPayload>,
        expected_scenes: usize,
    ) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            prompt: prompt.into(),
            style_reference,
            expected_scenes,
        }
    }
}

/// Ask for one image.
///
/// The identity image, when present, is always sent first and the anchor second.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct SynthesisRequest {
    /// Composed scene prompt
    prompt: String,
    /// Subject likeness
    identity: Option<MediaPayload>,
    /// Established scene whose look must be matched
    anchor: Option<MediaPayload>,
}

impl SynthesisRequest {
    /// Create a synthesis request.
    pub fn new(
        prompt: impl Into<String>,
        identity: Option<MediaPayload>,
        anchor: Option<MediaPayload>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            identity,
            anchor,
        }
    }

    /// Reference images in send order.
    pub fn images(&self) -> Vec<&MediaPayload> {
        self.identity.iter().chain(self.anchor.iter()).collect()
    }

    /// Prompt text with the priority of each reference image spelled out.
    ///
    /// Identity and anchor get separate priority statements so neither can
    /// override the other's domain.
    ///
    /// ```
    /// use storyforge_core::MediaPayload;
    /// use storyforge_interface::SynthesisRequest;
    ///
    /// let png = MediaPayload::new("image/png", vec![1]);
    /// let req = SynthesisRequest::new("The character jumps.", Some(png.clone()), Some(png));
    /// let text = req.framed_prompt();
    /// assert!(text.contains("IMAGE 1"));
    /// assert!(text.contains("IMAGE 2"));
    /// assert!(text.ends_with("The character jumps."));
    /// ```
    pub fn framed_prompt(&self) -> String {
        let mut lines = Vec::new();
        let mut position = 0;

        if self.identity.is_some() {
            position += 1;
            lines.push(format!(
                "IMAGE {} is the IDENTITY REFERENCE. It has top priority for the subject's face, \
                 hair, body and identity. Reproduce this exact subject.",
                position
            ));
        }
        if self.anchor.is_some() {
            position += 1;
            lines.push(format!(
                "IMAGE {} is the STYLE ANCHOR (the establishing scene). It has top priority for \
                 lighting, color palette, render style and atmosphere. Match that look exactly, \
                 but show the subject performing the new action below instead of copying its pose.",
                position
            ));
        }

        if lines.is_empty() {
            return self.prompt.clone();
        }

        lines.push(String::new());
        lines.push(self.prompt.clone());
        lines.join("\n")
    }
}

/// Ask for a publishing strategy.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct StrategyRequest {
    /// Strategist persona and content rules
    system_instruction: String,
    /// Story and scene listing
    prompt: String,
}

impl StrategyRequest {
    /// Create a strategy request.
    pub fn new(system_instruction: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            prompt: prompt.into(),
        }
    }
}

/// Per-platform tips as returned by the generator; any may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformTipsDraft {
    /// Short-form vertical video tip
    pub short_form_video: Option<String>,
    /// Photo reel tip
    pub photo_reel: Option<String>,
    /// General feed tip
    pub general_feed: Option<String>,
}

/// A strategy as returned by the generator; any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyDraft {
    /// Opening hooks
    pub viral_hooks: Option<Vec<String>>,
    /// Prose caption
    pub caption: Option<String>,
    /// Hashtags
    pub hashtags: Option<Vec<String>>,
    /// Per-platform tips
    pub platform_tips: PlatformTipsDraft,
    /// Recommended posting time
    pub best_time: Option<String>,
}

impl StrategyDraft {
    /// Read a draft from generator JSON, keeping every field that has the right shape.
    ///
    /// Fails only when the text is not a JSON object. Fields with the wrong type
    /// are dropped individually. Platform keys accept both the neutral names and
    /// `tiktok`/`instagram`/`facebook`.
    ///
    /// ```
    /// use storyforge_interface::StrategyDraft;
    ///
    /// let draft = StrategyDraft::from_json(r#"{"caption": "Once upon a time", "hashtags": 7}"#).unwrap();
    /// assert_eq!(draft.caption.as_deref(), Some("Once upon a time"));
    /// assert!(draft.hashtags.is_none());
    /// assert!(StrategyDraft::from_json("not json").is_err());
    /// ```
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(map) = value else {
            return Err(serde::de::Error::custom("strategy must be a JSON object"));
        };

        let tips = map
            .get("platformTips")
            .or_else(|| map.get("platform_tips"))
            .and_then(Value::as_object);
        let tip = |keys: &[&str]| {
            tips.and_then(|t| keys.iter().find_map(|k| t.get(*k)))
                .and_then(non_blank_string)
        };

        Ok(Self {
            viral_hooks: field(&map, &["viralHooks", "viral_hooks"]).and_then(string_list),
            caption: field(&map, &["caption"]).and_then(non_blank_string),
            hashtags: field(&map, &["hashtags"]).and_then(string_list),
            platform_tips: PlatformTipsDraft {
                short_form_video: tip(&["shortFormVideo", "short_form_video", "tiktok"]),
                photo_reel: tip(&["photoReel", "photo_reel", "instagram"]),
                general_feed: tip(&["generalFeed", "general_feed", "facebook"]),
            },
            best_time: field(&map, &["bestTime", "best_time"]).and_then(non_blank_string),
        })
    }
}

fn field<'a>(map: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| map.get(*k))
}

fn non_blank_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    let items: Vec<String> = value
        .as_array()?
        .iter()
        .filter_map(non_blank_string)
        .collect();
    (!items.is_empty()).then_some(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(byte: u8) -> MediaPayload {
        MediaPayload::new("image/png", vec![byte])
    }

    #[test]
    fn identity_only_prompt_has_single_priority() {
        let req = SynthesisRequest::new("Scene.", Some(png(1)), None);
        let text = req.framed_prompt();

        assert!(text.starts_with("IMAGE 1 is the IDENTITY REFERENCE"));
        assert!(!text.contains("STYLE ANCHOR"));
        assert_eq!(req.images().len(), 1);
    }

    #[test]
    fn anchor_priorities_are_stated_separately() {
        let req = SynthesisRequest::new("Scene.", Some(png(1)), Some(png(2)));
        let text = req.framed_prompt();
        let identity_line = text.lines().next().unwrap();
        let anchor_line = text.lines().nth(1).unwrap();

        assert!(identity_line.contains("face"));
        assert!(!identity_line.contains("lighting"));
        assert!(anchor_line.contains("lighting"));
        assert!(anchor_line.contains("palette"));
        assert_eq!(req.images(), vec![&png(1), &png(2)]);
    }

    #[test]
    fn bare_prompt_is_unchanged() {
        let req = SynthesisRequest::new("Scene.", None, None);
        assert_eq!(req.framed_prompt(), "Scene.");
    }

    #[test]
    fn draft_accepts_platform_aliases() {
        let draft = StrategyDraft::from_json(
            r#"{
                "viralHooks": ["Look!", "  "],
                "platformTips": {"tiktok": "Use trends", "photoReel": "", "facebook": "Groups"},
                "bestTime": "19:00"
            }"#,
        )
        .unwrap();

        assert_eq!(draft.viral_hooks, Some(vec!["Look!".to_string()]));
        assert_eq!(draft.platform_tips.short_form_video.as_deref(), Some("Use trends"));
        assert_eq!(draft.platform_tips.photo_reel, None);
        assert_eq!(draft.platform_tips.general_feed.as_deref(), Some("Groups"));
        assert_eq!(draft.best_time.as_deref(), Some("19:00"));
        assert_eq!(draft.caption, None);
    }

    #[test]
    fn draft_rejects_non_objects() {
        assert!(StrategyDraft::from_json("[1, 2]").is_err());
    }
}
