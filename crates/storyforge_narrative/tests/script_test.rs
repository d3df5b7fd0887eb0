//! Tests for scene writing, subject profiling and dialogue display.

mod test_utils;

use std::sync::Arc;
use storyforge_core::{StoryParameters, StoryParametersBuilder};
use storyforge_narrative::{
    FALLBACK_PROFILE, SCENE_COUNT, SceneSegment, ScriptSource, ScriptWriter, StoryboardOrchestrator,
    SubjectProfiler, fallback_script, segments,
};
use test_utils::{MockGateway, identity, png};

fn four_scenes() -> Vec<String> {
    (1..=SCENE_COUNT)
        .map(|n| format!("The Protagonist does thing {}.", n))
        .collect()
}

#[tokio::test]
async fn test_writer_returns_generated_scenes() {
    let writer = ScriptWriter::new(Arc::new(MockGateway::default().scenes(four_scenes())));
    let script = writer.write(&StoryParameters::default()).await;

    assert_eq!(script.source(), &ScriptSource::Generated);
    assert_eq!(script.scenes(), &four_scenes());
}

#[tokio::test]
async fn test_writer_falls_back_on_wrong_count() {
    let mut three = four_scenes();
    three.pop();
    let writer = ScriptWriter::new(Arc::new(MockGateway::default().scenes(three)));
    let script = writer.write(&StoryParameters::default()).await;

    assert_eq!(script.source(), &ScriptSource::Fallback);
    assert_eq!(script.scenes(), &fallback_script());
}

#[tokio::test]
async fn test_writer_falls_back_on_error() {
    let writer = ScriptWriter::new(Arc::new(MockGateway::default()));
    let script = writer.write(&StoryParameters::default()).await;

    assert_eq!(script.source(), &ScriptSource::Fallback);
    assert_eq!(script.into_scenes().len(), SCENE_COUNT);
}

#[test]
fn test_request_carries_style_reference_and_count() {
    let params = StoryParametersBuilder::default()
        .idea("A cat opens a bakery")
        .style_reference(png(9))
        .build()
        .unwrap();
    let request = ScriptWriter::<MockGateway>::request(&params);

    assert_eq!(*request.expected_scenes(), SCENE_COUNT);
    assert_eq!(request.style_reference(), &Some(png(9)));
    assert!(request.prompt().contains("A cat opens a bakery"));
    assert!(request.system_instruction().contains("reference video"));
    assert!(request.system_instruction().contains("MOTHER SCENE"));
}

#[tokio::test]
async fn test_profiler_uses_description() {
    let profiler = SubjectProfiler::new(Arc::new(
        MockGateway::default().description("  Short red hair, green jacket.  "),
    ));
    let profiled = profiler.profile(identity()).await;
    assert_eq!(profiled.profile().as_deref(), Some("Short red hair, green jacket."));
}

#[tokio::test]
async fn test_profiler_falls_back_on_failure() {
    let orchestrator = StoryboardOrchestrator::new(MockGateway::default());
    let profiled = orchestrator.profile_identity(identity()).await;
    assert_eq!(profiled.profile().as_deref(), Some(FALLBACK_PROFILE));
}

#[test]
fn test_display_segments_isolate_dialogue() {
    let parts = segments(r#"The Protagonist waves. (Ana: "Hola!")"#);

    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0], SceneSegment::Action("The Protagonist waves. "));
    assert_eq!(
        parts[1],
        SceneSegment::Dialogue {
            speaker: "Ana",
            line: "Hola!",
            raw: r#"(Ana: "Hola!")"#,
        }
    );
}
