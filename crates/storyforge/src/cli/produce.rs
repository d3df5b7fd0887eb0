//! Describe, script and produce command handlers.

use super::commands::{ProduceArgs, ScriptArgs, StoryArgs};
use super::render;
use std::path::Path;
use std::sync::Arc;
use storyforge::{
    ChannelObserver, FileSessionStore, GeminiGateway, IdentityReference, JsonError, MediaPayload,
    ObserverSet, SessionStore, StorageError, StorageErrorKind, StoryParameters,
    StoryboardOrchestrator, StoryforgeConfig, StoryforgeResult, TracingObserver,
};

/// Gateway from the `[gemini]` section.
pub(super) fn gateway(config: &StoryforgeConfig) -> StoryforgeResult<GeminiGateway> {
    GeminiGateway::new(config.gemini().clone())
}

/// Session store under the configured storage root.
pub(super) fn store(config: &StoryforgeConfig) -> StoryforgeResult<FileSessionStore> {
    FileSessionStore::new(config.storage().resolve_path()?)
}

/// Read a media file, guessing its type from the extension.
fn load_media(path: &Path) -> StoryforgeResult<MediaPayload> {
    let data = std::fs::read(path).map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;
    Ok(MediaPayload::new(MediaPayload::mime_for_path(path), data))
}

/// Parameters for `story`, with the style video attached when given.
fn parameters(config: &StoryforgeConfig, story: &StoryArgs) -> StoryforgeResult<StoryParameters> {
    let video = story.style_video.as_deref().map(load_media).transpose()?;
    Ok(story.parameters(config.production(), video))
}

/// Print the subject profile of an identity image.
pub async fn describe(config: &StoryforgeConfig, identity: &Path) -> StoryforgeResult<()> {
    let orchestrator = StoryboardOrchestrator::new(gateway(config)?);
    let identity = IdentityReference::new(load_media(identity)?);
    let profiled = orchestrator.profile_identity(identity).await;
    if let Some(profile) = profiled.profile() {
        println!("{}", profile);
    }
    Ok(())
}

/// Write and print a script, optionally saving it as JSON.
pub async fn script(config: &StoryforgeConfig, args: &ScriptArgs) -> StoryforgeResult<()> {
    let orchestrator = StoryboardOrchestrator::new(gateway(config)?);
    let params = parameters(config, &args.story)?;
    let script = orchestrator.write_script(&params).await;

    println!("{}", render::script(script.scenes()));
    tracing::info!(source = %script.source(), "Script ready");

    if let Some(out) = &args.out {
        let json = serde_json::to_string_pretty(script.scenes())
            .map_err(|e| JsonError::new(e.to_string()))?;
        std::fs::write(out, json).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!("{}: {}", out.display(), e)))
        })?;
        tracing::info!(path = %out.display(), "Scenes saved");
    }
    Ok(())
}

/// Produce a storyboard with live progress and store it as a session.
///
/// The session is saved even when the anchor fails, so the run can be
/// inspected and its anchor regenerated later.
pub async fn produce(config: &StoryforgeConfig, args: &ProduceArgs) -> StoryforgeResult<()> {
    let store = store(config)?;
    let params = parameters(config, &args.story)?;

    let (channel, mut events) = ChannelObserver::new();
    let observers = ObserverSet::new()
        .with(Arc::new(TracingObserver))
        .with(Arc::new(channel));
    let orchestrator =
        StoryboardOrchestrator::new(gateway(config)?).with_observer(Arc::new(observers));

    let scenes = match (&args.scenes, args.scene.is_empty()) {
        (Some(path), _) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            })?;
            serde_json::from_str::<Vec<String>>(&text)
                .map_err(|e| JsonError::new(format!("{}: {}", path.display(), e)))?
        }
        (None, false) => args.scene.clone(),
        (None, true) => {
            let script = orchestrator.write_script(&params).await;
            println!("{}\n", render::script(script.scenes()));
            script.into_scenes()
        }
    };

    let identity = orchestrator
        .profile_identity(IdentityReference::new(load_media(&args.identity)?))
        .await;
    let board = StoryboardOrchestrator::<GeminiGateway>::prepare(identity, params, scenes)?;

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            println!("{}", render::progress(&event));
        }
    });

    let outcome = orchestrator.run(&board).await;
    // Closing the channel lets the printer drain and finish
    drop(orchestrator);
    if let Err(e) = printer.await {
        tracing::warn!(error = %e, "Progress printer stopped early");
    }

    let snapshot = board.snapshot();
    store.save(&snapshot).await?;
    println!("\n{}", render::storyboard(&snapshot));
    println!("\nSaved session {}", snapshot.id());

    outcome.map(|report| {
        tracing::info!(
            ready = report.ready(),
            failed = report.failed(),
            "Production finished"
        );
    })
}
