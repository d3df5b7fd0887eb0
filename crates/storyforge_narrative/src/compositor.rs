//! Scene text to image instruction.

use crate::dialogue::strip_dialogue;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use storyforge_core::{AspectRatio, SceneRole, StoryParameters, VisualStyle};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bthe\s+protagonist\b").expect("valid placeholder pattern")
});

/// Neutral noun that replaces the subject placeholder in image prompts.
const SUBJECT: &str = "the character";

/// Compose the image instruction for one scene.
///
/// Dialogue markup is removed and the "The Protagonist" placeholder becomes
/// "the character" before the action text is placed in the instruction. The
/// sections always appear in the same order: insertion, identity rules, action,
/// modifiers, aspect ratio, style.
///
/// # Examples
///
/// ```
/// use storyforge_core::{AspectRatio, SceneRole, VisualStyle};
/// use storyforge_narrative::compose;
///
/// let prompt = compose(
///     r#"The Protagonist waves. (Ana: "Hola!")"#,
///     SceneRole::Anchor,
///     VisualStyle::Photoreal,
///     AspectRatio::Portrait,
///     "",
/// );
/// assert!(prompt.contains("ACTION: The character waves."));
/// assert!(prompt.contains("MODIFIERS: none"));
/// assert!(!prompt.contains("Hola"));
/// assert!(!prompt.contains("Ana"));
/// ```
pub fn compose(
    description: &str,
    role: SceneRole,
    style: VisualStyle,
    aspect_ratio: AspectRatio,
    modifiers: &str,
) -> String {
    let action = clean_action(description);
    let modifiers = match modifiers.trim() {
        "" => "none",
        m => m,
    };

    format!(
        "{insert}\n\n\
         IDENTITY RULES:\n\
         - Keep the exact same face, hair and identity as the reference subject.\n\
         - Keep the same outfit unless the modifiers below change it.\n\n\
         ACTION: {action}\n\
         MODIFIERS: {modifiers}\n\
         ASPECT RATIO: {aspect}\n\
         STYLE: {style}",
        insert = insertion(role),
        aspect = aspect_ratio.directive(),
        style = style.keywords(),
    )
}

fn insertion(role: SceneRole) -> &'static str {
    match role {
        SceneRole::Anchor => {
            "Insert the reference subject into this establishing scene. This image defines \
             the lighting, color palette and render style for every scene that follows."
        }
        SceneRole::Child => {
            "Insert the reference subject into this scene, continuing the established \
             storyboard with the same lighting, color palette and render style."
        }
    }
}

fn clean_action(description: &str) -> String {
    let stripped = strip_dialogue(description);
    let replaced = PLACEHOLDER.replace_all(&stripped, |caps: &Captures| {
        let start = caps.get(0).map(|m| m.start()).unwrap_or_default();
        if starts_sentence(&stripped[..start]) {
            "The character".to_string()
        } else {
            SUBJECT.to_string()
        }
    });
    let action = replaced.trim();
    if action.is_empty() {
        // Dialogue-only scene
        "The character speaks to the camera.".to_string()
    } else {
        action.to_string()
    }
}

fn starts_sentence(before: &str) -> bool {
    match before.trim_end().chars().last() {
        None => true,
        Some(c) => matches!(c, '.' | '!' | '?' | '¡' | '¿' | ':'),
    }
}

/// Compositor bound to the style, aspect ratio and modifiers of one run.
///
/// The settings are captured when the compositor is built, so later edits to the
/// parameters do not change prompts composed by this instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptCompositor {
    style: VisualStyle,
    aspect_ratio: AspectRatio,
    modifiers: String,
}

impl PromptCompositor {
    /// Capture the visual settings of `parameters`.
    pub fn new(parameters: &StoryParameters) -> Self {
        Self {
            style: *parameters.style(),
            aspect_ratio: *parameters.aspect_ratio(),
            modifiers: parameters.modifiers().clone(),
        }
    }

    /// Compose the instruction for a scene in the given role.
    pub fn compose(&self, description: &str, role: SceneRole) -> String {
        compose(
            description,
            role,
            self.style,
            self.aspect_ratio,
            &self.modifiers,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section_order(prompt: &str) -> Vec<usize> {
        ["IDENTITY RULES:", "ACTION:", "MODIFIERS:", "ASPECT RATIO:", "STYLE:"]
            .iter()
            .map(|marker| prompt.find(marker).unwrap_or(usize::MAX))
            .collect()
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let prompt = compose(
            "The Protagonist jumps.",
            SceneRole::Child,
            VisualStyle::FlatIllustration,
            AspectRatio::Landscape,
            "rainy street",
        );
        let order = section_order(&prompt);
        assert!(order.windows(2).all(|w| w[0] < w[1]), "{prompt}");
        assert!(prompt.starts_with("Insert the reference subject into this scene"));
        assert!(prompt.contains("MODIFIERS: rainy street"));
        assert!(prompt.contains("ASPECT RATIO: 16:9 (Cinematic)"));
        assert!(prompt.contains(VisualStyle::FlatIllustration.keywords()));
    }

    #[test]
    fn placeholder_is_replaced_case_insensitively() {
        let action = clean_action("A wide shot of THE PROTAGONIST. the protagonist smiles.");
        assert_eq!(action, "A wide shot of the character. The character smiles.");
    }

    #[test]
    fn dialogue_only_scene_still_has_an_action() {
        assert_eq!(
            clean_action(r#"(Don: "¡Hola!")"#),
            "The character speaks to the camera."
        );
    }

    #[test]
    fn compositor_is_deterministic() {
        let params = StoryParameters::default();
        let compositor = PromptCompositor::new(&params);
        assert_eq!(
            compositor.compose("The Protagonist runs.", SceneRole::Anchor),
            compositor.compose("The Protagonist runs.", SceneRole::Anchor)
        );
    }
}
