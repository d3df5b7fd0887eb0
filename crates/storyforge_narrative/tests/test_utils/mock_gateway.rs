//! Scripted capability gateway.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use storyforge_core::MediaPayload;
use storyforge_error::{GenerationError, StoryforgeResult, StrategyError, SynthesisError, SynthesisErrorKind};
use storyforge_interface::{
    CapabilityGateway, DescribeRequest, ScriptRequest, StrategyDraft, StrategyRequest,
    SynthesisRequest,
};
use tokio::sync::Notify;

/// PNG-typed payload filled with `marker`.
pub fn png(marker: u8) -> MediaPayload {
    MediaPayload::new("image/png", vec![marker; 4])
}

/// Outcome of one queued synthesis call.
#[derive(Debug, Clone)]
pub enum MockImage {
    /// Return this image
    Image(MediaPayload),
    /// Fail with a synthesis error
    Fail,
    /// Wait for the notification, then return the image
    Hold(Arc<Notify>, MediaPayload),
}

/// Gateway that replays queued outcomes and records every request.
///
/// Synthesis calls beyond the queue fail.
#[derive(Default)]
pub struct MockGateway {
    images: Mutex<VecDeque<MockImage>>,
    synthesis_calls: Arc<Mutex<Vec<SynthesisRequest>>>,
    scenes: Option<Vec<String>>,
    description: Option<String>,
    strategy: Option<StrategyDraft>,
    strategy_calls: Arc<Mutex<usize>>,
}

#[allow(dead_code)]
impl MockGateway {
    /// Gateway whose synthesis calls return `images` in order.
    pub fn with_images(images: impl IntoIterator<Item = MockImage>) -> Self {
        Self {
            images: Mutex::new(images.into_iter().collect()),
            ..Default::default()
        }
    }

    /// Gateway whose synthesis calls succeed with `png(1)`, `png(2)`, ...
    pub fn succeeding(count: u8) -> Self {
        Self::with_images((1..=count).map(|n| MockImage::Image(png(n))))
    }

    /// Scene texts returned by `write_scenes`.
    pub fn scenes(mut self, scenes: Vec<String>) -> Self {
        self.scenes = Some(scenes);
        self
    }

    /// Text returned by `describe_subject`.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Draft returned by `craft_strategy`.
    pub fn strategy(mut self, draft: StrategyDraft) -> Self {
        self.strategy = Some(draft);
        self
    }

    /// Queue another synthesis outcome.
    pub fn push(&self, image: MockImage) {
        self.images.lock().unwrap().push_back(image);
    }

    /// Every synthesis request received so far.
    pub fn synthesis_calls(&self) -> Vec<SynthesisRequest> {
        self.synthesis_calls.lock().unwrap().clone()
    }

    /// Number of synthesis requests received so far.
    pub fn synthesis_count(&self) -> usize {
        self.synthesis_calls.lock().unwrap().len()
    }

    /// Number of strategy requests received so far.
    pub fn strategy_count(&self) -> usize {
        *self.strategy_calls.lock().unwrap()
    }
}

#[async_trait]
impl CapabilityGateway for MockGateway {
    async fn describe_subject(&self, _req: &DescribeRequest) -> StoryforgeResult<String> {
        self.description
            .clone()
            .ok_or_else(|| GenerationError::new("mock has no description").into())
    }

    async fn write_scenes(&self, req: &ScriptRequest) -> StoryforgeResult<Vec<String>> {
        match &self.scenes {
            Some(scenes) if scenes.len() == *req.expected_scenes() => Ok(scenes.clone()),
            Some(scenes) => Err(GenerationError::new(format!(
                "expected {} scenes, got {}",
                req.expected_scenes(),
                scenes.len()
            ))
            .into()),
            None => Err(GenerationError::new("mock has no scenes").into()),
        }
    }

    async fn synthesize_image(&self, req: &SynthesisRequest) -> StoryforgeResult<MediaPayload> {
        self.synthesis_calls.lock().unwrap().push(req.clone());
        let next = self.images.lock().unwrap().pop_front();
        match next {
            Some(MockImage::Image(image)) => Ok(image),
            Some(MockImage::Hold(release, image)) => {
                release.notified().await;
                Ok(image)
            }
            Some(MockImage::Fail) | None => {
                Err(SynthesisError::new(SynthesisErrorKind::NoImagePayload).into())
            }
        }
    }

    async fn craft_strategy(&self, _req: &StrategyRequest) -> StoryforgeResult<StrategyDraft> {
        *self.strategy_calls.lock().unwrap() += 1;
        self.strategy
            .clone()
            .ok_or_else(|| StrategyError::new("expected value at line 1 column 1").into())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
