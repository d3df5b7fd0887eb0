//! The two-phase anchor protocol.
//!
//! Scene 0 (the anchor) is synthesized from the identity reference alone. Its
//! image then travels with every later scene so the whole storyboard shares
//! one look. A failed anchor stops the run; a failed child only fails itself.

use crate::guard::InFlightGuard;
use crate::{
    PromptCompositor, Script, ScriptWriter, SharedStoryboard, StrategySynthesizer,
    SubjectProfiler, TracingObserver,
};
use std::sync::Arc;
use storyforge_core::{
    IdentityReference, MediaPayload, ProgressEvent, ProgressKind, SceneRole, SceneStatus,
    StoryParameters, Storyboard, StrategyRecord,
};
use storyforge_error::{
    PreconditionError, PreconditionErrorKind, StoryforgeResult, SynthesisError,
    SynthesisErrorKind,
};
use storyforge_interface::{CapabilityGateway, ProgressObserver, SynthesisRequest};
use uuid::Uuid;

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct RunReport {
    /// Scenes that ended Ready
    ready: usize,
    /// Scenes that ended Failed
    failed: usize,
    /// Strategy attached to the storyboard
    strategy: StrategyRecord,
}

/// A scene that has entered Composing.
struct Started {
    index: usize,
    description: String,
    anchor: Option<MediaPayload>,
    guard: InFlightGuard,
}

/// Drives storyboard production and single-scene regeneration.
///
/// The orchestrator persists nothing; callers hand the finished storyboard to a
/// session store.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use storyforge_core::{IdentityReference, MediaPayload, StoryParameters};
/// use storyforge_interface::CapabilityGateway;
/// use storyforge_narrative::{StoryboardOrchestrator, TracingObserver};
///
/// async fn produce<G: CapabilityGateway>(gateway: G, png: Vec<u8>) -> storyforge_error::StoryforgeResult<()> {
///     let orchestrator = StoryboardOrchestrator::new(gateway).with_observer(Arc::new(TracingObserver));
///     let params = StoryParameters::default();
///     let script = orchestrator.write_script(&params).await;
///     let identity = IdentityReference::new(MediaPayload::new("image/png", png));
///     let board = StoryboardOrchestrator::<G>::prepare(identity, params, script.into_scenes())?;
///     let report = orchestrator.run(&board).await?;
///     println!("{} ready, {} failed", report.ready(), report.failed());
///     Ok(())
/// }
/// ```
pub struct StoryboardOrchestrator<G> {
    gateway: Arc<G>,
    observer: Arc<dyn ProgressObserver>,
}

impl<G> Clone for StoryboardOrchestrator<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            observer: Arc::clone(&self.observer),
        }
    }
}

impl<G: CapabilityGateway> StoryboardOrchestrator<G> {
    /// Create an orchestrator that logs progress through `tracing`.
    pub fn new(gateway: G) -> Self {
        Self::from_shared(Arc::new(gateway))
    }

    /// Create an orchestrator over an already shared gateway.
    pub fn from_shared(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the progress observer.
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The underlying gateway.
    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Validate the inputs and wrap them in a shareable storyboard.
    ///
    /// # Errors
    ///
    /// Fails with a `PreconditionError` when the identity has no image or the
    /// scene list is empty or contains a blank scene.
    pub fn prepare(
        identity: IdentityReference,
        parameters: StoryParameters,
        scenes: Vec<String>,
    ) -> StoryforgeResult<SharedStoryboard> {
        Ok(Storyboard::new(identity, parameters, scenes)?.into())
    }

    /// Ask the gateway for a four-scene script, falling back to the fixed one.
    pub async fn write_script(&self, parameters: &StoryParameters) -> Script {
        ScriptWriter::new(Arc::clone(&self.gateway))
            .write(parameters)
            .await
    }

    /// Describe the subject of `identity`, falling back to a generic profile.
    pub async fn profile_identity(&self, identity: IdentityReference) -> IdentityReference {
        SubjectProfiler::new(Arc::clone(&self.gateway))
            .profile(identity)
            .await
    }

    /// Produce every scene, then attach a strategy.
    ///
    /// Scenes run strictly in index order, one synthesis call at a time. Every
    /// scene transition is reported to the observer. Dropping the returned
    /// future fails the scene that was in flight.
    ///
    /// # Errors
    ///
    /// - `PreconditionError` before any external call when the storyboard has no
    ///   usable identity or no scenes, or has already been run
    /// - `SynthesisError` when the anchor scene fails; no child is attempted
    #[tracing::instrument(skip(self, board), fields(storyboard_id = %board.id()))]
    pub async fn run(&self, board: &SharedStoryboard) -> StoryforgeResult<RunReport> {
        let (identity, parameters, count) = board.read(|sb| {
            if !sb.identity().is_usable() {
                return Err(PreconditionError::new(PreconditionErrorKind::MissingIdentity));
            }
            if sb.is_empty() {
                return Err(PreconditionError::new(PreconditionErrorKind::NoScenes));
            }
            if !sb.is_untouched() {
                return Err(PreconditionError::new(PreconditionErrorKind::AlreadyStarted));
            }
            Ok((sb.identity().image().clone(), sb.parameters().clone(), sb.len()))
        })?;

        let compositor = PromptCompositor::new(&parameters);
        self.emit(
            board.id(),
            ProgressKind::RunStarted { scenes: count },
            format!("Producing {} scenes", count),
        );

        // Phase 1: the anchor
        let anchor = self.begin_scene(board, 0)?;
        if let Err(e) = self.produce_scene(board, anchor, &compositor, &identity).await {
            self.emit(
                board.id(),
                ProgressKind::RunAborted,
                "Anchor scene failed, no further scenes will be produced",
            );
            return Err(SynthesisError::new(SynthesisErrorKind::Anchor(e.to_string())).into());
        }

        // Phase 2: children, each against the anchor current at its start
        for index in 1..count {
            let started = match self.begin_scene(board, index) {
                Ok(started) => started,
                Err(e) => {
                    tracing::error!(index, error = %e, "Could not start scene, continuing");
                    continue;
                }
            };
            if let Err(e) = self.produce_scene(board, started, &compositor, &identity).await {
                tracing::error!(index, error = %e, "Scene failed, continuing");
            }
        }

        let (ready, failed, scenes) = board.read(|sb| {
            (
                sb.count(SceneStatus::Ready),
                sb.count(SceneStatus::Failed),
                sb.descriptions()
                    .into_iter()
                    .map(str::to_string)
                    .collect::<Vec<_>>(),
            )
        });
        self.emit(
            board.id(),
            ProgressKind::RunCompleted { ready, failed },
            format!("Scenes done: {} ready, {} failed", ready, failed),
        );

        let strategy = StrategySynthesizer::new(Arc::clone(&self.gateway))
            .synthesize(&scenes, &parameters)
            .await;
        board.update(|sb| sb.set_strategy(strategy.clone()));
        self.emit(
            board.id(),
            ProgressKind::StrategyReady {
                source: *strategy.source(),
            },
            format!("Strategy ready ({})", strategy.source()),
        );

        Ok(RunReport {
            ready,
            failed,
            strategy,
        })
    }

    /// Re-synthesize one scene from its stored prompt.
    ///
    /// Scene 0 uses the identity reference only and, on success, becomes the
    /// anchor for later regenerations. Child scenes use the current anchor.
    /// Existing child images are left as they are.
    ///
    /// # Errors
    ///
    /// - `BusyError` when another regeneration of this storyboard is in flight;
    ///   no external call is made
    /// - `PreconditionError` when the scene is out of range, in flight, has no
    ///   prompt, or is a child while no anchor exists
    /// - `SynthesisError` when the call fails; the scene keeps its previous
    ///   status and image
    #[tracing::instrument(skip(self, board), fields(storyboard_id = %board.id()))]
    pub async fn regenerate(
        &self,
        board: &SharedStoryboard,
        index: usize,
    ) -> StoryforgeResult<MediaPayload> {
        let _slot = board.claim_regeneration()?;

        let (prompt, identity, anchor) = board.read(|sb| -> StoryforgeResult<_> {
            let scene = sb.scene(index)?;
            if scene.status().is_in_flight() {
                return Err(PreconditionError::new(PreconditionErrorKind::SceneInFlight(index)).into());
            }
            let prompt = scene
                .prompt()
                .ok_or_else(|| PreconditionError::new(PreconditionErrorKind::MissingPrompt(index)))?
                .to_string();
            let anchor = match SceneRole::for_index(index) {
                SceneRole::Anchor => None,
                SceneRole::Child => Some(sb.anchor().clone().ok_or_else(|| {
                    PreconditionError::new(PreconditionErrorKind::AnchorUnavailable(index))
                })?),
            };
            Ok((prompt, sb.identity().image().clone(), anchor))
        })?;

        self.emit(
            board.id(),
            ProgressKind::RegenerationStarted { index },
            format!("{}: regenerating", label(index)),
        );

        let request = SynthesisRequest::new(prompt, Some(identity), anchor);
        let image = match self.gateway.synthesize_image(&request).await {
            Ok(image) => image,
            Err(e) => {
                self.emit(
                    board.id(),
                    ProgressKind::RegenerationFailed { index },
                    format!("{}: regeneration failed, previous result kept: {}", label(index), e),
                );
                return Err(SynthesisError::new(SynthesisErrorKind::Scene {
                    index,
                    reason: e.to_string(),
                })
                .into());
            }
        };

        let from = board.update(|sb| -> StoryforgeResult<SceneStatus> {
            let scene = sb.scene_mut(index)?;
            let from = scene.status();
            scene.regenerated(image.clone())?;
            if index == 0 {
                sb.set_anchor(image.clone());
            }
            Ok(from)
        })?;

        if from != SceneStatus::Ready {
            self.transition(board.id(), index, from, SceneStatus::Ready, None);
        }
        self.emit(
            board.id(),
            ProgressKind::RegenerationSucceeded { index },
            format!("{}: regenerated", label(index)),
        );
        if index == 0 {
            self.emit(board.id(), ProgressKind::AnchorReady, "New anchor image in place");
        }
        Ok(image)
    }

    /// Move a scene to Composing and capture its inputs.
    fn begin_scene(&self, board: &SharedStoryboard, index: usize) -> StoryforgeResult<Started> {
        let (description, anchor) = board.update(|sb| -> StoryforgeResult<_> {
            let anchor = match SceneRole::for_index(index) {
                SceneRole::Anchor => None,
                SceneRole::Child => Some(sb.anchor().clone().ok_or_else(|| {
                    PreconditionError::new(PreconditionErrorKind::AnchorUnavailable(index))
                })?),
            };
            let scene = sb.scene_mut(index)?;
            scene.begin_composing()?;
            Ok((scene.description().clone(), anchor))
        })?;

        let guard = InFlightGuard::new(board.clone(), Arc::clone(&self.observer), index);
        self.transition(board.id(), index, SceneStatus::Pending, SceneStatus::Composing, None);

        Ok(Started {
            index,
            description,
            anchor,
            guard,
        })
    }

    /// Compose, synthesize and record one started scene.
    #[tracing::instrument(skip_all, fields(index = started.index))]
    async fn produce_scene(
        &self,
        board: &SharedStoryboard,
        started: Started,
        compositor: &PromptCompositor,
        identity: &MediaPayload,
    ) -> StoryforgeResult<()> {
        let Started {
            index,
            description,
            anchor,
            mut guard,
        } = started;

        let prompt = compositor.compose(&description, SceneRole::for_index(index));
        board.update(|sb| -> StoryforgeResult<()> {
            sb.scene_mut(index)?.begin_generating(prompt.clone())?;
            Ok(())
        })?;
        self.transition(board.id(), index, SceneStatus::Composing, SceneStatus::Generating, None);

        tracing::debug!(
            prompt_len = prompt.len(),
            with_anchor = anchor.is_some(),
            "Synthesizing scene"
        );
        let request = SynthesisRequest::new(prompt, Some(identity.clone()), anchor);
        let outcome = self.gateway.synthesize_image(&request).await;

        match outcome {
            Ok(image) => {
                board.update(|sb| -> StoryforgeResult<()> {
                    sb.scene_mut(index)?.complete(image.clone())?;
                    if index == 0 {
                        sb.set_anchor(image);
                    }
                    Ok(())
                })?;
                guard.disarm();
                self.transition(board.id(), index, SceneStatus::Generating, SceneStatus::Ready, None);
                if index == 0 {
                    self.emit(board.id(), ProgressKind::AnchorReady, "Anchor image in place");
                }
                Ok(())
            }
            Err(e) => {
                let reason = e.to_string();
                board.update(|sb| -> StoryforgeResult<()> {
                    sb.scene_mut(index)?.fail(reason.clone())?;
                    Ok(())
                })?;
                guard.disarm();
                self.transition(
                    board.id(),
                    index,
                    SceneStatus::Generating,
                    SceneStatus::Failed,
                    Some(&reason),
                );
                Err(e)
            }
        }
    }

    fn transition(
        &self,
        id: Uuid,
        index: usize,
        from: SceneStatus,
        to: SceneStatus,
        reason: Option<&str>,
    ) {
        let message = match (to, reason) {
            (SceneStatus::Composing, _) => format!("{}: composing prompt", label(index)),
            (SceneStatus::Generating, _) => format!("{}: generating image", label(index)),
            (SceneStatus::Ready, _) => format!("{}: ready", label(index)),
            (SceneStatus::Failed, Some(reason)) => format!("{} failed: {}", label(index), reason),
            (status, _) => format!("{}: {}", label(index), status),
        };
        self.emit(id, ProgressKind::SceneTransition { index, from, to }, message);
    }

    fn emit(&self, id: Uuid, kind: ProgressKind, message: impl Into<String>) {
        self.observer
            .on_event(&ProgressEvent::new(id, kind, message));
    }
}

fn label(index: usize) -> String {
    match SceneRole::for_index(index) {
        SceneRole::Anchor => "Scene 1 (anchor)".to_string(),
        SceneRole::Child => format!("Scene {}", index + 1),
    }
}
