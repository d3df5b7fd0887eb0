//! Regenerate, show and sessions command handlers.

use super::produce::{gateway, store};
use super::render;
use crossterm::style::Stylize;
use std::sync::Arc;
use storyforge::{
    PreconditionError, PreconditionErrorKind, SessionStore, SharedStoryboard,
    StoryboardOrchestrator, StoryforgeConfig, StoryforgeResult, TracingObserver,
};
use uuid::Uuid;

/// Regenerate one scene (numbered from 1) of a stored session.
///
/// The session is saved again only when the regeneration succeeds.
pub async fn regenerate(config: &StoryforgeConfig, session: Uuid, scene: usize) -> StoryforgeResult<()> {
    let store = store(config)?;
    let board = SharedStoryboard::new(store.load(session).await?);
    let len = board.read(|sb| sb.len());
    let index = scene
        .checked_sub(1)
        .filter(|index| *index < len)
        .ok_or_else(|| {
            PreconditionError::new(PreconditionErrorKind::SceneOutOfRange {
                index: scene.saturating_sub(1),
                len,
            })
        })?;

    let orchestrator =
        StoryboardOrchestrator::new(gateway(config)?).with_observer(Arc::new(TracingObserver));
    orchestrator.regenerate(&board, index).await?;

    let snapshot = board.snapshot();
    store.save(&snapshot).await?;
    println!("{}", render::storyboard(&snapshot));
    Ok(())
}

/// Print a stored session.
pub async fn show(config: &StoryforgeConfig, session: Uuid) -> StoryforgeResult<()> {
    let board = store(config)?.load(session).await?;
    println!("{}", render::storyboard(&board));
    Ok(())
}

/// List stored sessions, newest first.
pub async fn sessions(config: &StoryforgeConfig) -> StoryforgeResult<()> {
    let summaries = store(config)?.list().await?;
    if summaries.is_empty() {
        println!("No sessions yet.");
        return Ok(());
    }

    for summary in summaries {
        let idea = match summary.idea().trim() {
            "" => "(invented story)",
            idea => idea,
        };
        println!(
            "{}  {}  {}/{} ready, {} failed{}  {}",
            summary.id().to_string().bold(),
            summary.created_at().format("%Y-%m-%d %H:%M"),
            summary.ready(),
            summary.scenes(),
            summary.failed(),
            if *summary.has_strategy() { ", strategy" } else { "" },
            idea
        );
    }
    Ok(())
}
