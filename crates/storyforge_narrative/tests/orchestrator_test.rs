//! Tests for the two-phase anchor protocol and scene regeneration.

mod test_utils;

use std::sync::Arc;
use std::time::Duration;
use storyforge_core::{
    PlatformTips, ProgressKind, SceneStatus, StoryParameters, StrategySource,
};
use storyforge_error::{PreconditionErrorKind, StoryforgeErrorKind};
use storyforge_interface::{PlatformTipsDraft, StrategyDraft};
use storyforge_narrative::{ChannelObserver, StoryboardOrchestrator};
use test_utils::{MockGateway, MockImage, board, drain, identity, png};
use tokio::sync::Notify;

fn full_strategy() -> StrategyDraft {
    StrategyDraft {
        viral_hooks: Some(vec!["You won't believe this".into()]),
        caption: Some("Ana says hola and the climb begins.".into()),
        hashtags: Some(vec!["climbing".into(), "#story".into()]),
        platform_tips: PlatformTipsDraft {
            short_form_video: Some("Cut on the beat.".into()),
            photo_reel: Some("Lead with the fall.".into()),
            general_feed: Some("Ask a question.".into()),
        },
        best_time: Some("18:00".into()),
    }
}

fn statuses(board: &storyforge_narrative::SharedStoryboard) -> Vec<SceneStatus> {
    board.read(|sb| sb.scenes().iter().map(|s| s.status()).collect())
}

fn precondition_kind(err: &storyforge_error::StoryforgeError) -> Option<PreconditionErrorKind> {
    match err.kind() {
        StoryforgeErrorKind::Precondition(e) => Some(e.kind.clone()),
        _ => None,
    }
}

#[tokio::test]
async fn test_end_to_end_all_scenes_ready() {
    let orchestrator = StoryboardOrchestrator::new(MockGateway::succeeding(4).strategy(full_strategy()));
    let board = board();

    let report = orchestrator.run(&board).await.unwrap();

    assert_eq!(*report.ready(), 4);
    assert_eq!(*report.failed(), 0);
    assert_eq!(statuses(&board), vec![SceneStatus::Ready; 4]);
    assert_eq!(report.strategy().source(), &StrategySource::Generated);
    assert_eq!(board.read(|sb| sb.strategy().clone()), Some(report.strategy().clone()));

    let calls = orchestrator.gateway().synthesis_calls();
    assert_eq!(calls.len(), 4);
    assert!(calls[0].anchor().is_none());
    for call in &calls {
        assert_eq!(call.identity(), &Some(png(0)));
    }
    for call in &calls[1..] {
        assert_eq!(call.anchor(), &Some(png(1)));
    }
    assert_eq!(board.read(|sb| sb.anchor().clone()), Some(png(1)));
}

#[tokio::test]
async fn test_prompts_never_carry_dialogue() {
    let orchestrator = StoryboardOrchestrator::new(MockGateway::succeeding(4));
    let board = board();
    orchestrator.run(&board).await.unwrap();

    let first = &orchestrator.gateway().synthesis_calls()[0];
    assert!(first.prompt().contains("The character arrives."));
    assert!(!first.prompt().contains("Hola"));
    assert!(!first.prompt().contains("Ana:"));
    assert!(!first.prompt().contains("Protagonist"));

    let stored = board.read(|sb| sb.scene(0).unwrap().prompt().map(str::to_string));
    assert_eq!(stored.as_deref(), Some(first.prompt().as_str()));
}

#[tokio::test]
async fn test_anchor_generates_before_any_child_composes() {
    let (observer, mut events) = ChannelObserver::new();
    let orchestrator =
        StoryboardOrchestrator::new(MockGateway::succeeding(4)).with_observer(Arc::new(observer));
    orchestrator.run(&board()).await.unwrap();

    let events = drain(&mut events);
    let anchor_generating = events
        .iter()
        .position(|e| {
            matches!(
                e.kind(),
                ProgressKind::SceneTransition { index: 0, to: SceneStatus::Generating, .. }
            )
        })
        .unwrap();
    let first_child = events
        .iter()
        .position(|e| {
            matches!(
                e.kind(),
                ProgressKind::SceneTransition { index, to: SceneStatus::Composing, .. } if *index > 0
            )
        })
        .unwrap();
    assert!(anchor_generating < first_child);

    // Three transitions per scene
    let transitions = events
        .iter()
        .filter(|e| matches!(e.kind(), ProgressKind::SceneTransition { .. }))
        .count();
    assert_eq!(transitions, 12);
    assert!(matches!(events.first().map(|e| e.kind()), Some(ProgressKind::RunStarted { scenes: 4 })));
    assert!(matches!(
        events.last().map(|e| e.kind()),
        Some(ProgressKind::StrategyReady { .. })
    ));
}

#[tokio::test]
async fn test_anchor_failure_aborts_run() {
    let (observer, mut events) = ChannelObserver::new();
    let orchestrator = StoryboardOrchestrator::new(MockGateway::with_images([MockImage::Fail]))
        .with_observer(Arc::new(observer));
    let board = board();

    let err = orchestrator.run(&board).await.unwrap_err();

    assert!(matches!(err.kind(), StoryforgeErrorKind::Synthesis(_)));
    assert_eq!(
        statuses(&board),
        vec![
            SceneStatus::Failed,
            SceneStatus::Pending,
            SceneStatus::Pending,
            SceneStatus::Pending
        ]
    );
    assert_eq!(orchestrator.gateway().synthesis_count(), 1);
    assert_eq!(orchestrator.gateway().strategy_count(), 0);
    assert!(board.read(|sb| sb.anchor().is_none()));
    assert!(
        drain(&mut events)
            .iter()
            .any(|e| matches!(e.kind(), ProgressKind::RunAborted))
    );
}

#[tokio::test]
async fn test_child_failure_is_isolated() {
    let gateway = MockGateway::with_images([
        MockImage::Image(png(1)),
        MockImage::Image(png(2)),
        MockImage::Fail,
        MockImage::Image(png(4)),
    ]);
    let orchestrator = StoryboardOrchestrator::new(gateway);
    let board = board();

    let report = orchestrator.run(&board).await.unwrap();

    assert_eq!(*report.ready(), 3);
    assert_eq!(*report.failed(), 1);
    assert_eq!(
        statuses(&board),
        vec![
            SceneStatus::Ready,
            SceneStatus::Ready,
            SceneStatus::Failed,
            SceneStatus::Ready
        ]
    );
    // The failed scene keeps its prompt so it can be regenerated
    assert!(board.read(|sb| sb.scene(2).unwrap().prompt().is_some()));
    assert_eq!(board.read(|sb| sb.scene(3).unwrap().image().cloned()), Some(png(4)));
}

#[tokio::test]
async fn test_strategy_failure_falls_back() {
    // No strategy configured: the mock answers with a parse error
    let orchestrator = StoryboardOrchestrator::new(MockGateway::succeeding(4));
    let report = orchestrator.run(&board()).await.unwrap();

    let strategy = report.strategy();
    assert_eq!(strategy.source(), &StrategySource::Fallback);
    assert!(!strategy.hashtags().is_empty());
    assert_eq!(strategy.platform_tips(), &PlatformTips::default());
    assert!(!strategy.platform_tips().short_form_video().is_empty());
    assert!(!strategy.platform_tips().photo_reel().is_empty());
    assert!(!strategy.platform_tips().general_feed().is_empty());
}

#[test]
fn test_prepare_rejects_missing_scenes() {
    let err = StoryboardOrchestrator::<MockGateway>::prepare(
        identity(),
        StoryParameters::default(),
        Vec::new(),
    )
    .unwrap_err();
    assert_eq!(precondition_kind(&err), Some(PreconditionErrorKind::NoScenes));
}

#[tokio::test]
async fn test_run_twice_is_rejected() {
    let orchestrator = StoryboardOrchestrator::new(MockGateway::succeeding(4));
    let board = board();
    orchestrator.run(&board).await.unwrap();

    let err = orchestrator.run(&board).await.unwrap_err();
    assert_eq!(precondition_kind(&err), Some(PreconditionErrorKind::AlreadyStarted));
    assert_eq!(orchestrator.gateway().synthesis_count(), 4);
}

#[tokio::test]
async fn test_regenerated_anchor_feeds_later_child_regeneration() {
    let orchestrator = StoryboardOrchestrator::new(MockGateway::succeeding(4));
    let board = board();
    orchestrator.run(&board).await.unwrap();

    orchestrator.gateway().push(MockImage::Image(png(10)));
    orchestrator.gateway().push(MockImage::Image(png(11)));
    orchestrator.regenerate(&board, 0).await.unwrap();
    orchestrator.regenerate(&board, 2).await.unwrap();

    let calls = orchestrator.gateway().synthesis_calls();
    assert!(calls[4].anchor().is_none());
    assert_eq!(calls[5].anchor(), &Some(png(10)));

    // The original prompt is reused
    assert_eq!(calls[5].prompt(), calls[2].prompt());

    board.read(|sb| {
        assert_eq!(sb.anchor(), &Some(png(10)));
        assert_eq!(sb.scene(0).unwrap().image(), Some(&png(10)));
        assert_eq!(sb.scene(2).unwrap().image(), Some(&png(11)));
        // No cascade to untouched children
        assert_eq!(sb.scene(1).unwrap().image(), Some(&png(2)));
    });
}

#[tokio::test]
async fn test_concurrent_regeneration_is_busy() {
    let orchestrator = StoryboardOrchestrator::new(MockGateway::succeeding(4));
    let board = board();
    orchestrator.run(&board).await.unwrap();

    let release = Arc::new(Notify::new());
    orchestrator
        .gateway()
        .push(MockImage::Hold(Arc::clone(&release), png(20)));

    let first = {
        let orchestrator = orchestrator.clone();
        let board = board.clone();
        tokio::spawn(async move { orchestrator.regenerate(&board, 1).await })
    };

    while orchestrator.gateway().synthesis_count() < 5 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let err = orchestrator.regenerate(&board, 2).await.unwrap_err();
    assert!(err.is_busy());
    assert_eq!(orchestrator.gateway().synthesis_count(), 5);

    release.notify_one();
    let image = first.await.unwrap().unwrap();
    assert_eq!(image, png(20));

    // The slot is free again
    orchestrator.gateway().push(MockImage::Image(png(21)));
    assert!(orchestrator.regenerate(&board, 2).await.is_ok());
}

#[tokio::test]
async fn test_regeneration_slot_belongs_to_the_storyboard() {
    let first = StoryboardOrchestrator::new(MockGateway::succeeding(4));
    let second = StoryboardOrchestrator::new(MockGateway::default());
    let board = board();
    first.run(&board).await.unwrap();

    let release = Arc::new(Notify::new());
    first
        .gateway()
        .push(MockImage::Hold(Arc::clone(&release), png(20)));
    let held = {
        let first = first.clone();
        let board = board.clone();
        tokio::spawn(async move { first.regenerate(&board, 1).await })
    };
    while first.gateway().synthesis_count() < 5 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    second.gateway().push(MockImage::Image(png(21)));
    let err = second.regenerate(&board, 2).await.unwrap_err();
    assert!(err.is_busy());
    assert_eq!(second.gateway().synthesis_count(), 0);

    release.notify_one();
    assert_eq!(held.await.unwrap().unwrap(), png(20));
    assert_eq!(second.regenerate(&board, 2).await.unwrap(), png(21));
}

#[tokio::test]
async fn test_children_read_the_anchor_current_at_their_start() {
    let release = Arc::new(Notify::new());
    let producer = StoryboardOrchestrator::new(MockGateway::with_images([
        MockImage::Image(png(1)),
        MockImage::Hold(Arc::clone(&release), png(2)),
        MockImage::Image(png(3)),
        MockImage::Image(png(4)),
    ]));
    let editor = StoryboardOrchestrator::new(MockGateway::with_images([MockImage::Image(png(10))]));
    let board = board();

    let run = {
        let producer = producer.clone();
        let board = board.clone();
        tokio::spawn(async move { producer.run(&board).await })
    };
    while producer.gateway().synthesis_count() < 2 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // Scene 1 is mid-flight; replace the anchor underneath it
    assert_eq!(editor.regenerate(&board, 0).await.unwrap(), png(10));
    release.notify_one();
    let report = run.await.unwrap().unwrap();
    assert_eq!(*report.ready(), 4);

    let calls = producer.gateway().synthesis_calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[1].anchor(), &Some(png(1)));
    assert_eq!(calls[2].anchor(), &Some(png(10)));
    assert_eq!(calls[3].anchor(), &Some(png(10)));
    board.read(|sb| {
        assert_eq!(sb.anchor(), &Some(png(10)));
        assert_eq!(sb.scene(1).unwrap().image(), Some(&png(2)));
    });
}

#[tokio::test]
async fn test_regeneration_failure_keeps_previous_result() {
    let (observer, mut events) = ChannelObserver::new();
    let orchestrator =
        StoryboardOrchestrator::new(MockGateway::succeeding(4)).with_observer(Arc::new(observer));
    let board = board();
    orchestrator.run(&board).await.unwrap();
    drain(&mut events);

    orchestrator.gateway().push(MockImage::Fail);
    let err = orchestrator.regenerate(&board, 1).await.unwrap_err();

    assert!(matches!(err.kind(), StoryforgeErrorKind::Synthesis(_)));
    board.read(|sb| {
        let scene = sb.scene(1).unwrap();
        assert_eq!(scene.status(), SceneStatus::Ready);
        assert_eq!(scene.image(), Some(&png(2)));
    });
    assert!(
        drain(&mut events)
            .iter()
            .any(|e| matches!(e.kind(), ProgressKind::RegenerationFailed { index: 1 }))
    );
}

#[tokio::test]
async fn test_regeneration_recovers_failed_scene() {
    let gateway = MockGateway::with_images([
        MockImage::Image(png(1)),
        MockImage::Fail,
        MockImage::Image(png(3)),
        MockImage::Image(png(4)),
    ]);
    let orchestrator = StoryboardOrchestrator::new(gateway);
    let board = board();
    orchestrator.run(&board).await.unwrap();
    assert_eq!(board.read(|sb| sb.scene(1).unwrap().status()), SceneStatus::Failed);

    orchestrator.gateway().push(MockImage::Image(png(7)));
    orchestrator.regenerate(&board, 1).await.unwrap();

    board.read(|sb| {
        let scene = sb.scene(1).unwrap();
        assert_eq!(scene.status(), SceneStatus::Ready);
        assert_eq!(scene.image(), Some(&png(7)));
    });
}

#[tokio::test]
async fn test_regeneration_without_prompt_is_rejected() {
    let orchestrator = StoryboardOrchestrator::new(MockGateway::succeeding(4));
    let board = board();

    let err = orchestrator.regenerate(&board, 0).await.unwrap_err();

    assert_eq!(precondition_kind(&err), Some(PreconditionErrorKind::MissingPrompt(0)));
    assert_eq!(orchestrator.gateway().synthesis_count(), 0);
}

#[tokio::test]
async fn test_regeneration_out_of_range_is_rejected() {
    let orchestrator = StoryboardOrchestrator::new(MockGateway::succeeding(4));
    let board = board();
    orchestrator.run(&board).await.unwrap();

    let err = orchestrator.regenerate(&board, 9).await.unwrap_err();
    assert_eq!(
        precondition_kind(&err),
        Some(PreconditionErrorKind::SceneOutOfRange { index: 9, len: 4 })
    );
}

#[tokio::test]
async fn test_abandoned_run_leaves_no_scene_generating() {
    let never = Arc::new(Notify::new());
    let (observer, mut events) = ChannelObserver::new();
    let orchestrator =
        StoryboardOrchestrator::new(MockGateway::with_images([MockImage::Hold(never, png(1))]))
            .with_observer(Arc::new(observer));
    let board = board();

    let outcome = tokio::time::timeout(Duration::from_millis(50), orchestrator.run(&board)).await;
    assert!(outcome.is_err());

    board.read(|sb| {
        assert_eq!(sb.count(SceneStatus::Generating), 0);
        assert_eq!(sb.count(SceneStatus::Composing), 0);
        let anchor = sb.scene(0).unwrap();
        assert_eq!(anchor.status(), SceneStatus::Failed);
        assert_eq!(anchor.failure(), Some("abandoned"));
    });
    assert!(drain(&mut events).iter().any(|e| matches!(
        e.kind(),
        ProgressKind::SceneTransition { index: 0, from: SceneStatus::Generating, to: SceneStatus::Failed }
    )));
}
