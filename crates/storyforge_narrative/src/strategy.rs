//! Publishing strategy with field-level fallback.

use std::sync::Arc;
use storyforge_core::{PlatformTips, StoryParameters, StrategyRecord, StrategySource, normalize_hashtags};
use storyforge_interface::{CapabilityGateway, StrategyDraft, StrategyRequest};

/// Number of independently defaulted fields in a record.
const FIELDS: usize = 7;

/// Derives a [`StrategyRecord`] from a finished storyboard.
pub struct StrategySynthesizer<G> {
    gateway: Arc<G>,
}

impl<G: CapabilityGateway> StrategySynthesizer<G> {
    /// Create a synthesizer over a shared gateway.
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Build the strategy request for the given scene texts.
    pub fn request(scenes: &[String], parameters: &StoryParameters) -> StrategyRequest {
        StrategyRequest::new(system_instruction(parameters), brief(scenes, parameters))
    }

    /// Synthesize the record. Never fails.
    ///
    /// A failed call yields [`StrategyRecord::fallback`]; a partial draft keeps
    /// what it has and defaults the rest field by field.
    #[tracing::instrument(skip_all, fields(scenes = scenes.len()))]
    pub async fn synthesize(&self, scenes: &[String], parameters: &StoryParameters) -> StrategyRecord {
        let request = Self::request(scenes, parameters);
        match self.gateway.craft_strategy(&request).await {
            Ok(draft) => {
                let record = merge(draft, parameters.idea());
                tracing::info!(source = %record.source(), "Strategy ready");
                record
            }
            Err(e) => {
                tracing::warn!(error = %e, "Strategy call failed, using fallback record");
                StrategyRecord::fallback(parameters.idea())
            }
        }
    }
}

/// Fill every missing or blank field of `draft` with its default.
///
/// ```
/// use storyforge_core::StrategySource;
/// use storyforge_interface::StrategyDraft;
/// use storyforge_narrative::merge_strategy;
///
/// let draft = StrategyDraft {
///     caption: Some("A tomato learns to sing.".into()),
///     ..Default::default()
/// };
/// let record = merge_strategy(draft, "tomato");
/// assert_eq!(record.caption(), "A tomato learns to sing.");
/// assert_eq!(record.source(), &StrategySource::Partial);
/// assert!(!record.hashtags().is_empty());
/// ```
pub fn merge(draft: StrategyDraft, idea: &str) -> StrategyRecord {
    let mut defaulted = 0;

    let caption = text_or(draft.caption, &mut defaulted, || {
        StrategyRecord::fallback_caption(idea)
    });
    let best_time = text_or(draft.best_time, &mut defaulted, || {
        StrategyRecord::fallback_best_time().to_string()
    });
    let tips = draft.platform_tips;
    let short_form_video = text_or(tips.short_form_video, &mut defaulted, || {
        PlatformTips::fallback_short_form_video().to_string()
    });
    let photo_reel = text_or(tips.photo_reel, &mut defaulted, || {
        PlatformTips::fallback_photo_reel().to_string()
    });
    let general_feed = text_or(tips.general_feed, &mut defaulted, || {
        PlatformTips::fallback_general_feed().to_string()
    });
    let hooks = list_or(draft.viral_hooks, &mut defaulted, StrategyRecord::fallback_hooks);
    let hashtags = list_or(
        draft.hashtags.map(normalize_hashtags),
        &mut defaulted,
        StrategyRecord::fallback_hashtags,
    );

    let source = match defaulted {
        0 => StrategySource::Generated,
        FIELDS => StrategySource::Fallback,
        _ => StrategySource::Partial,
    };

    StrategyRecord::new(
        hooks,
        caption,
        hashtags,
        PlatformTips::new(short_form_video, photo_reel, general_feed),
        best_time,
        source,
    )
}

fn text_or(value: Option<String>, defaulted: &mut usize, default: impl FnOnce() -> String) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => {
            *defaulted += 1;
            default()
        }
    }
}

fn list_or(
    value: Option<Vec<String>>,
    defaulted: &mut usize,
    default: impl FnOnce() -> Vec<String>,
) -> Vec<String> {
    let items: Vec<String> = value
        .unwrap_or_default()
        .into_iter()
        .filter(|item| !item.trim().is_empty())
        .collect();
    if items.is_empty() {
        *defaulted += 1;
        default()
    } else {
        items
    }
}

fn system_instruction(parameters: &StoryParameters) -> String {
    let mut rules = vec![
        "You are a social media strategist preparing a storyboard for publication.".to_string(),
        "Return a JSON object with these fields:".to_string(),
        "- viralHooks: three short opening hooks.".to_string(),
        format!(
            "- caption: a full prose narrative in {} that tells the story across ALL scenes, \
             with the characters' dialogue woven into the text.",
            parameters.language()
        ),
        "  Never describe the subject's physical appearance (hair, eyes, skin, body or \
         clothing) in the caption."
            .to_string(),
    ];
    if let Some(line) = parameters.effective_closing_line() {
        rules.push(format!(
            "  End the story with this closing line woven naturally into its final moment, \
             not appended after it: \"{}\"",
            line
        ));
    }
    rules.extend([
        "- hashtags: five to ten relevant hashtags.".to_string(),
        "- platformTips: an object with shortFormVideo, photoReel and generalFeed tips."
            .to_string(),
        "- bestTime: the recommended posting time.".to_string(),
        "Respond with JSON only.".to_string(),
    ]);
    rules.join("\n")
}

fn brief(scenes: &[String], parameters: &StoryParameters) -> String {
    let listing = scenes
        .iter()
        .enumerate()
        .map(|(i, scene)| format!("{}. {}", i + 1, scene))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Idea: {}\nAudience: {}\nGoal: {}\n\nScenes:\n{}",
        parameters.idea().trim(),
        parameters.effective_audience(),
        parameters.effective_goal(),
        listing
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyforge_core::StoryParametersBuilder;
    use storyforge_interface::PlatformTipsDraft;

    fn complete_draft() -> StrategyDraft {
        StrategyDraft {
            viral_hooks: Some(vec!["Look!".into()]),
            caption: Some("Story".into()),
            hashtags: Some(vec!["tomato".into()]),
            platform_tips: PlatformTipsDraft {
                short_form_video: Some("a".into()),
                photo_reel: Some("b".into()),
                general_feed: Some("c".into()),
            },
            best_time: Some("noon".into()),
        }
    }

    #[test]
    fn complete_draft_is_generated() {
        let record = merge(complete_draft(), "idea");
        assert_eq!(record.source(), &StrategySource::Generated);
        assert_eq!(record.hashtags(), &vec!["#tomato".to_string()]);
    }

    #[test]
    fn empty_draft_is_all_defaults() {
        let record = merge(StrategyDraft::default(), "idea");
        assert_eq!(record, StrategyRecord::fallback("idea"));
    }

    #[test]
    fn tips_fall_back_independently() {
        let mut draft = complete_draft();
        draft.platform_tips.photo_reel = None;
        let record = merge(draft, "idea");
        assert_eq!(record.platform_tips().short_form_video(), "a");
        assert_eq!(
            record.platform_tips().photo_reel(),
            PlatformTips::fallback_photo_reel()
        );
        assert_eq!(record.source(), &StrategySource::Partial);
    }

    #[test]
    fn unusable_hashtags_fall_back() {
        let mut draft = complete_draft();
        draft.hashtags = Some(vec!["  ".into(), "two words".into()]);
        let record = merge(draft, "idea");
        assert_eq!(record.hashtags(), &StrategyRecord::fallback_hashtags());
    }

    #[test]
    fn closing_line_is_woven_not_appended() {
        let params = StoryParametersBuilder::default()
            .closing_line("Follow for more!")
            .build()
            .unwrap();
        let instruction = system_instruction(&params);
        assert!(instruction.contains("\"Follow for more!\""));
        assert!(instruction.contains("not appended"));
        assert!(instruction.contains("Never describe the subject's physical appearance"));

        let without = system_instruction(&StoryParameters::default());
        assert!(!without.contains("closing line"));
    }

    #[test]
    fn brief_lists_every_scene() {
        let scenes = vec!["one".to_string(), "two".to_string()];
        let text = brief(&scenes, &StoryParameters::default());
        assert!(text.contains("1. one\n2. two"));
    }
}
