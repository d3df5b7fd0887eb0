//! Publishing strategy derived from a finished storyboard.

use serde::{Deserialize, Serialize};

const FALLBACK_HOOKS: [&str; 3] = [
    "Wait a moment!",
    "Incredible, you have to see this",
    "Don't miss it",
];
const FALLBACK_HASHTAGS: [&str; 4] = ["#viral", "#ai", "#content", "#shorts"];
const FALLBACK_BEST_TIME: &str = "20:00 - 22:00 (local time)";

/// Whether any field of a record came from the fixed defaults.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum StrategySource {
    /// Every field came from the generator
    Generated,
    /// Some fields fell back to defaults
    Partial,
    /// The call failed; every field is a default
    Fallback,
}

/// Tips for the three fixed publishing surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct PlatformTips {
    /// Short-form vertical video
    short_form_video: String,
    /// Photo reel
    photo_reel: String,
    /// General feed
    general_feed: String,
}

impl PlatformTips {
    /// Create tips for all three surfaces.
    pub fn new(
        short_form_video: impl Into<String>,
        photo_reel: impl Into<String>,
        general_feed: impl Into<String>,
    ) -> Self {
        Self {
            short_form_video: short_form_video.into(),
            photo_reel: photo_reel.into(),
            general_feed: general_feed.into(),
        }
    }

    /// Default short-form video tip.
    pub fn fallback_short_form_video() -> &'static str {
        "Use trending audio and fast transitions."
    }

    /// Default photo reel tip.
    pub fn fallback_photo_reel() -> &'static str {
        "Share it as a Reel and in your stories."
    }

    /// Default general feed tip.
    pub fn fallback_general_feed() -> &'static str {
        "Post in relevant groups and encourage interaction."
    }
}

impl Default for PlatformTips {
    fn default() -> Self {
        Self::new(
            Self::fallback_short_form_video(),
            Self::fallback_photo_reel(),
            Self::fallback_general_feed(),
        )
    }
}

/// Hooks, caption, hashtags, tips and timing for publishing a storyboard.
///
/// # Examples
///
/// ```
/// use storyforge_core::{StrategyRecord, StrategySource};
///
/// let record = StrategyRecord::fallback("a singing tomato");
/// assert_eq!(record.source(), &StrategySource::Fallback);
/// assert_eq!(record.caption(), "New post about a singing tomato");
/// assert!(!record.hashtags().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct StrategyRecord {
    /// Short opening hooks, in display order
    viral_hooks: Vec<String>,
    /// Prose narrative covering every scene
    caption: String,
    /// Unique hashtags, in display order
    hashtags: Vec<String>,
    /// Per-platform tips
    platform_tips: PlatformTips,
    /// Recommended posting time
    best_time: String,
    /// Provenance of the fields
    source: StrategySource,
}

impl StrategyRecord {
    /// Create a record; hashtags are normalized.
    pub fn new(
        viral_hooks: Vec<String>,
        caption: impl Into<String>,
        hashtags: Vec<String>,
        platform_tips: PlatformTips,
        best_time: impl Into<String>,
        source: StrategySource,
    ) -> Self {
        Self {
            viral_hooks,
            caption: caption.into(),
            hashtags: normalize_hashtags(hashtags),
            platform_tips,
            best_time: best_time.into(),
            source,
        }
    }

    /// The fixed record used when the strategy call fails outright.
    pub fn fallback(idea: &str) -> Self {
        Self::new(
            Self::fallback_hooks(),
            Self::fallback_caption(idea),
            Self::fallback_hashtags(),
            PlatformTips::default(),
            Self::fallback_best_time(),
            StrategySource::Fallback,
        )
    }

    /// Default hooks.
    pub fn fallback_hooks() -> Vec<String> {
        FALLBACK_HOOKS.iter().map(|h| h.to_string()).collect()
    }

    /// Default caption for `idea`.
    pub fn fallback_caption(idea: &str) -> String {
        format!("New post about {}", idea.trim())
    }

    /// Default hashtags.
    pub fn fallback_hashtags() -> Vec<String> {
        FALLBACK_HASHTAGS.iter().map(|h| h.to_string()).collect()
    }

    /// Default posting time.
    pub fn fallback_best_time() -> &'static str {
        FALLBACK_BEST_TIME
    }
}

/// Prefix `#`, drop blanks and duplicates, keep first-seen order.
///
/// ```
/// use storyforge_core::normalize_hashtags;
///
/// let tags = normalize_hashtags(vec!["viral".into(), "#Viral".into(), "#ai".into(), " ".into()]);
/// assert_eq!(tags, vec!["#viral".to_string(), "#ai".to_string()]);
/// ```
pub fn normalize_hashtags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .filter_map(|tag| {
            let body = tag.trim().trim_start_matches('#').trim();
            if body.is_empty() || body.contains(char::is_whitespace) {
                return None;
            }
            seen.insert(body.to_lowercase())
                .then(|| format!("#{}", body))
        })
        .collect()
}
