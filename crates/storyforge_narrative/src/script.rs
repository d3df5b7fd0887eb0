//! Scene writing with a fixed fallback script.

use std::sync::Arc;
use storyforge_core::StoryParameters;
use storyforge_interface::{CapabilityGateway, ScriptRequest};

/// Number of scenes a written script always has.
pub const SCENE_COUNT: usize = 4;

const FALLBACK_SCRIPT: [&str; SCENE_COUNT] = [
    r#"The Protagonist standing confidently in the center of the frame, dramatic lighting. (Don: "¡Empecemos la historia!")"#,
    "The Protagonist performing the main action with intense focus.",
    "A wide shot of The Protagonist interacting with the environment.",
    r#"Close up of The Protagonist showing emotion, blurred background. (Don: "¡Fin de la escena!")"#,
];

/// The script used whenever scene writing fails.
///
/// ```
/// use storyforge_narrative::{SCENE_COUNT, fallback_script};
///
/// let script = fallback_script();
/// assert_eq!(script.len(), SCENE_COUNT);
/// assert!(script[0].contains("Empecemos"));
/// ```
pub fn fallback_script() -> Vec<String> {
    FALLBACK_SCRIPT.iter().map(|s| s.to_string()).collect()
}

/// Where a script came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum ScriptSource {
    /// Written by the generator
    Generated,
    /// The fixed fallback script
    Fallback,
}

/// Four scene texts and their provenance.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct Script {
    /// Scene texts in order
    scenes: Vec<String>,
    /// Provenance
    source: ScriptSource,
}

impl Script {
    /// Take the scene texts.
    pub fn into_scenes(self) -> Vec<String> {
        self.scenes
    }
}

/// Asks the gateway for a four-scene script.
pub struct ScriptWriter<G> {
    gateway: Arc<G>,
}

impl<G: CapabilityGateway> ScriptWriter<G> {
    /// Create a writer over a shared gateway.
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Build the request for `parameters`.
    pub fn request(parameters: &StoryParameters) -> ScriptRequest {
        ScriptRequest::new(
            system_instruction(parameters),
            brief(parameters),
            parameters.style_reference().clone(),
            SCENE_COUNT,
        )
    }

    /// Write the script, falling back to [`fallback_script`] on any failure.
    ///
    /// Never fails: a malformed response or a wrong scene count counts as a
    /// failure and yields the fallback.
    #[tracing::instrument(skip(self, parameters), fields(provider = self.gateway.provider_name()))]
    pub async fn write(&self, parameters: &StoryParameters) -> Script {
        let request = Self::request(parameters);
        match self.gateway.write_scenes(&request).await {
            Ok(scenes) if is_complete(&scenes) => {
                tracing::info!(scenes = scenes.len(), "Script written");
                Script {
                    scenes: scenes.into_iter().map(|s| s.trim().to_string()).collect(),
                    source: ScriptSource::Generated,
                }
            }
            Ok(scenes) => {
                tracing::warn!(
                    received = scenes.len(),
                    expected = SCENE_COUNT,
                    "Unusable script, using fallback"
                );
                Self::fallback()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Scene writing failed, using fallback");
                Self::fallback()
            }
        }
    }

    fn fallback() -> Script {
        Script {
            scenes: fallback_script(),
            source: ScriptSource::Fallback,
        }
    }
}

fn is_complete(scenes: &[String]) -> bool {
    scenes.len() == SCENE_COUNT && scenes.iter().all(|s| !s.trim().is_empty())
}

fn dialogue_language(language: &str) -> &str {
    match language.trim() {
        "" | "Spanish" | "spanish" | "es" => "Latin American Spanish",
        other => other,
    }
}

fn system_instruction(parameters: &StoryParameters) -> String {
    let mut rules = vec![
        format!(
            "You are Don, an art director who writes storyboards of exactly {} scenes for {}.",
            SCENE_COUNT,
            parameters.aspect_ratio().framing()
        ),
        "Scene 1 is the MOTHER SCENE: an establishing shot that defines the setting, \
         lighting and mood of the whole story."
            .to_string(),
        format!(
            "Scenes 2 to {} continue from the Mother Scene in the same world.",
            SCENE_COUNT
        ),
        "Always call the main subject \"The Protagonist\". Never describe physical traits \
         such as hair, eyes, skin, build or clothing; the subject's look comes from a \
         reference image."
            .to_string(),
        "Describe each scene visually: action, framing and camera angle.".to_string(),
        format!(
            "Spoken lines use the format (Name: \"line\") and are written in {}.",
            dialogue_language(parameters.language())
        ),
    ];

    if let Some(role) = parameters.effective_character_role() {
        rules.push(format!("The Protagonist plays this role: {}.", role));
    }
    if parameters.style_reference().is_some() {
        rules.push(
            "A reference video is attached. Imitate its pacing, tone and shot style.".to_string(),
        );
    }
    rules.push(format!(
        "Respond with a JSON array of exactly {} strings, one per scene.",
        SCENE_COUNT
    ));

    rules.join("\n")
}

fn brief(parameters: &StoryParameters) -> String {
    let idea = match parameters.idea().trim() {
        "" => "Invent an original, engaging story.",
        idea => idea,
    };
    let guidance = parameters.effective_guidance();
    let guidance = match guidance.trim() {
        "" => "none",
        g => g,
    };

    format!(
        "Story idea: {}\nAudience: {}\nGoal: {}\nGuidance: {}\nWrite the scene texts in {}.",
        idea,
        parameters.effective_audience(),
        parameters.effective_goal(),
        guidance,
        parameters.language()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyforge_core::StoryParametersBuilder;

    #[test]
    fn fallback_script_uses_the_placeholder_everywhere() {
        assert!(
            fallback_script()
                .iter()
                .all(|scene| scene.contains("The Protagonist"))
        );
    }

    #[test]
    fn completeness_requires_four_non_blank_scenes() {
        let four = vec!["a".to_string(), "b".into(), "c".into(), "d".into()];
        assert!(is_complete(&four));
        assert!(!is_complete(&four[..3]));
        let blank = vec!["a".to_string(), " ".into(), "c".into(), "d".into()];
        assert!(!is_complete(&blank));
    }

    #[test]
    fn optional_directives_follow_parameters() {
        let plain = system_instruction(&StoryParameters::default());
        assert!(!plain.contains("plays this role"));
        assert!(plain.contains("Latin American Spanish"));

        let params = StoryParametersBuilder::default()
            .character_role("a retired pirate")
            .language("English")
            .build()
            .unwrap();
        let instruction = system_instruction(&params);
        assert!(instruction.contains("The Protagonist plays this role: a retired pirate."));
        assert!(instruction.contains("written in English"));
    }

    #[test]
    fn brief_invents_when_idea_is_blank() {
        let text = brief(&StoryParameters::default());
        assert!(text.contains("Invent an original"));
        assert!(text.contains("General audience"));
        assert!(text.contains("Guidance: none"));
    }
}
