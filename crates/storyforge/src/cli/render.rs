//! Terminal rendering of scenes, progress and strategies.

use crossterm::style::Stylize;
use storyforge::{
    EventLevel, ProgressEvent, SceneSegment, SceneStatus, Storyboard, StrategyRecord, segments,
};

/// Scene text with dialogue spans highlighted.
pub fn scene_text(text: &str) -> String {
    segments(text)
        .into_iter()
        .map(|segment| match segment {
            SceneSegment::Action(action) => action.to_string(),
            SceneSegment::Dialogue { raw, .. } => raw.yellow().italic().to_string(),
        })
        .collect()
}

/// Numbered scene list.
pub fn script(scenes: &[String]) -> String {
    scenes
        .iter()
        .enumerate()
        .map(|(i, scene)| format!("{} {}", format!("{}.", i + 1).bold(), scene_text(scene)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One progress line.
pub fn progress(event: &ProgressEvent) -> String {
    let time = event.timestamp().format("%H:%M:%S").to_string();
    let message = match event.level() {
        EventLevel::Info => event.message().clone().stylize(),
        EventLevel::Success => event.message().clone().green(),
        EventLevel::Error => event.message().clone().red(),
    };
    format!("{} {}", time.dark_grey(), message)
}

fn status_badge(status: SceneStatus) -> String {
    let label = format!("[{}]", status);
    match status {
        SceneStatus::Ready => label.green().to_string(),
        SceneStatus::Failed => label.red().to_string(),
        SceneStatus::Pending => label.dark_grey().to_string(),
        SceneStatus::Composing | SceneStatus::Generating => label.cyan().to_string(),
    }
}

/// Every scene with its status, followed by the strategy if any.
pub fn storyboard(board: &Storyboard) -> String {
    let mut lines = vec![format!(
        "{} {} ({})",
        "Session".bold(),
        board.id(),
        board.created_at().format("%Y-%m-%d %H:%M")
    )];
    if let Some(profile) = board.identity().profile() {
        lines.push(format!("{} {}", "Subject:".bold(), profile));
    }
    for scene in board.scenes() {
        lines.push(format!(
            "{} {} {}",
            format!("{}.", scene.index() + 1).bold(),
            status_badge(scene.status()),
            scene_text(scene.description())
        ));
        if let Some(reason) = scene.failure() {
            lines.push(format!("   {}", reason.red()));
        }
    }
    if let Some(strategy) = board.strategy() {
        lines.push(String::new());
        lines.push(self::strategy(strategy));
    }
    lines.join("\n")
}

/// Publishing strategy block.
pub fn strategy(strategy: &StrategyRecord) -> String {
    let tips = strategy.platform_tips();
    let mut lines = vec![format!("{} ({})", "Strategy".bold(), strategy.source())];
    lines.push(format!("{}", "Hooks:".bold()));
    lines.extend(strategy.viral_hooks().iter().map(|hook| format!("  - {}", hook)));
    lines.push(format!("{} {}", "Caption:".bold(), strategy.caption()));
    lines.push(format!("{} {}", "Hashtags:".bold(), strategy.hashtags().join(" ")));
    lines.push(format!("{} {}", "Short-form video:".bold(), tips.short_form_video()));
    lines.push(format!("{} {}", "Photo reel:".bold(), tips.photo_reel()));
    lines.push(format!("{} {}", "General feed:".bold(), tips.general_feed()));
    lines.push(format!("{} {}", "Best time:".bold(), strategy.best_time()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialogue_is_styled_and_action_is_not() {
        let raw = r#"The Protagonist waves. (Ana: "Hola!")"#;
        let dialogue = r#"(Ana: "Hola!")"#;
        let rendered = scene_text(raw);

        assert_ne!(rendered, raw);
        assert!(rendered.starts_with("The Protagonist waves. "));
        assert!(rendered.ends_with(&dialogue.yellow().italic().to_string()));
    }

    #[test]
    fn plain_scene_is_unchanged() {
        assert_eq!(scene_text("A wide shot."), "A wide shot.");
    }
}
