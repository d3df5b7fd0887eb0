//! Inline dialogue markup.
//!
//! A segment of the form `(Speaker: "utterance")` inside a scene text is spoken
//! dialogue; everything else is visual description. Straight and curly quotes
//! are both accepted.

use regex::Regex;
use std::sync::LazyLock;

static DIALOGUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\(\s*([^()":]+?)\s*:\s*["“]([^"”]*)["”]\s*\)"#).expect("valid dialogue pattern")
});

/// A piece of scene text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneSegment<'a> {
    /// Visual or action description
    Action(&'a str),
    /// A spoken line
    Dialogue {
        /// Who speaks
        speaker: &'a str,
        /// What they say
        line: &'a str,
        /// The full markup, parentheses included
        raw: &'a str,
    },
}

/// Split scene text into action and dialogue segments, in order.
///
/// Empty action runs between adjacent dialogue segments are dropped.
///
/// ```
/// use storyforge_narrative::{SceneSegment, segments};
///
/// let parts = segments(r#"The Protagonist waves. (Ana: "Hola!")"#);
/// assert_eq!(parts[0], SceneSegment::Action("The Protagonist waves. "));
/// assert_eq!(
///     parts[1],
///     SceneSegment::Dialogue { speaker: "Ana", line: "Hola!", raw: r#"(Ana: "Hola!")"# }
/// );
/// ```
pub fn segments(text: &str) -> Vec<SceneSegment<'_>> {
    let mut out = Vec::new();
    let mut cursor = 0;

    for caps in DIALOGUE.captures_iter(text) {
        let (Some(whole), Some(speaker), Some(line)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if whole.start() > cursor && !text[cursor..whole.start()].trim().is_empty() {
            out.push(SceneSegment::Action(&text[cursor..whole.start()]));
        }
        out.push(SceneSegment::Dialogue {
            speaker: speaker.as_str(),
            line: line.as_str(),
            raw: whole.as_str(),
        });
        cursor = whole.end();
    }

    if cursor < text.len() && !text[cursor..].trim().is_empty() {
        out.push(SceneSegment::Action(&text[cursor..]));
    }
    out
}

/// Remove every dialogue segment and normalize whitespace.
///
/// ```
/// use storyforge_narrative::strip_dialogue;
///
/// assert_eq!(
///     strip_dialogue(r#"(Don: "¡Vamos!") The Protagonist runs  outside."#),
///     "The Protagonist runs outside."
/// );
/// ```
pub fn strip_dialogue(text: &str) -> String {
    let stripped = DIALOGUE.replace_all(text, " ");
    let joined = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    joined
        .replace(" .", ".")
        .replace(" ,", ",")
        .replace(" !", "!")
        .replace(" ?", "?")
}
