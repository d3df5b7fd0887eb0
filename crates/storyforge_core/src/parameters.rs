//! Inputs to a single production run.

use crate::MediaPayload;
use serde::{Deserialize, Serialize};

/// Target frame shape.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AspectRatio {
    /// 9:16 short-form video framing
    #[strum(to_string = "portrait", serialize = "9:16", serialize = "reel")]
    Portrait,
    /// 16:9 cinematic framing
    #[default]
    #[strum(to_string = "landscape", serialize = "16:9")]
    Landscape,
}

impl AspectRatio {
    /// Directive line appended to image prompts.
    pub fn directive(&self) -> &'static str {
        match self {
            AspectRatio::Portrait => "9:16 (Vertical)",
            AspectRatio::Landscape => "16:9 (Cinematic)",
        }
    }

    /// Framing hint for the scene writer.
    pub fn framing(&self) -> &'static str {
        match self {
            AspectRatio::Portrait => "vertical short-form video (Reel/TikTok/Shorts)",
            AspectRatio::Landscape => "horizontal cinematic storyboard",
        }
    }
}

/// Rendering style of every scene in a storyboard.
///
/// ```
/// use std::str::FromStr;
/// use storyforge_core::VisualStyle;
///
/// assert_eq!(VisualStyle::from_str("3d").ok(), Some(VisualStyle::Animated3d));
/// assert!(VisualStyle::Photoreal.keywords().contains("Photorealistic"));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum VisualStyle {
    /// Stylized 3D animation
    #[default]
    #[serde(rename = "animated-3d", alias = "3d")]
    #[strum(to_string = "animated-3d", serialize = "3d")]
    Animated3d,
    /// Photorealistic CGI
    #[strum(to_string = "photoreal", serialize = "realistic")]
    Photoreal,
    /// Flat 2D vector illustration
    #[strum(to_string = "flat-illustration", serialize = "flat")]
    FlatIllustration,
}

impl VisualStyle {
    /// Style keywords appended to image prompts.
    pub fn keywords(&self) -> &'static str {
        match self {
            VisualStyle::Animated3d => {
                "3D Pixar style render, Disney animation style, cute, expressive, high fidelity, octane render"
            }
            VisualStyle::Photoreal => {
                "Photorealistic, 8k, cinematic, unreal engine 5, hyperrealistic"
            }
            VisualStyle::FlatIllustration => {
                "2D vector illustration, flat design, vibrant colors, clean lines"
            }
        }
    }
}

/// Immutable inputs to one pipeline run.
///
/// # Examples
///
/// ```
/// use storyforge_core::{AspectRatio, StoryParametersBuilder, VisualStyle};
///
/// let params = StoryParametersBuilder::default()
///     .idea("A chef discovers a singing tomato")
///     .aspect_ratio(AspectRatio::Portrait)
///     .style(VisualStyle::FlatIllustration)
///     .closing_line("Follow for more!")
///     .build()
///     .unwrap();
///
/// assert_eq!(params.effective_audience(), "General audience");
/// assert_eq!(params.language(), "Spanish");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct StoryParameters {
    /// Story premise; empty asks the writer to invent one
    idea: String,
    /// Target audience
    audience: String,
    /// Goal of the piece
    goal: String,
    /// Free-text guidance for the writer
    guidance: String,
    /// Narrative language
    language: String,
    /// Master instructions of the owning profile
    #[builder(setter(into, strip_option))]
    profile_context: Option<String>,
    /// Video whose pacing and tone the writer should imitate
    #[builder(setter(into, strip_option))]
    style_reference: Option<MediaPayload>,
    /// Role the subject plays in the story
    #[builder(setter(into, strip_option))]
    character_role: Option<String>,
    /// Line to weave into the end of the caption
    #[builder(setter(into, strip_option))]
    closing_line: Option<String>,
    /// Frame shape
    aspect_ratio: AspectRatio,
    /// Rendering style
    style: VisualStyle,
    /// Environment or outfit modifiers applied to every scene
    modifiers: String,
}

impl Default for StoryParameters {
    fn default() -> Self {
        Self {
            idea: String::new(),
            audience: String::new(),
            goal: String::new(),
            guidance: String::new(),
            language: "Spanish".to_string(),
            profile_context: None,
            style_reference: None,
            character_role: None,
            closing_line: None,
            aspect_ratio: AspectRatio::default(),
            style: VisualStyle::default(),
            modifiers: String::new(),
        }
    }
}

impl StoryParameters {
    /// Audience, or "General audience" when blank.
    pub fn effective_audience(&self) -> &str {
        non_blank(&self.audience).unwrap_or("General audience")
    }

    /// Goal, or "Viral entertainment" when blank.
    pub fn effective_goal(&self) -> &str {
        non_blank(&self.goal).unwrap_or("Viral entertainment")
    }

    /// Guidance prefixed with the profile context, if any.
    pub fn effective_guidance(&self) -> String {
        match self.profile_context.as_deref().and_then(non_blank) {
            Some(context) => format!(
                "[PROFILE CONTEXT]: {}\n\n[SPECIFIC INSTRUCTIONS]: {}",
                context, self.guidance
            ),
            None => self.guidance.clone(),
        }
    }

    /// Closing line, ignoring blank values.
    pub fn effective_closing_line(&self) -> Option<&str> {
        self.closing_line.as_deref().and_then(non_blank)
    }

    /// Character role, ignoring blank values.
    pub fn effective_character_role(&self) -> Option<&str> {
        self.character_role.as_deref().and_then(non_blank)
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
