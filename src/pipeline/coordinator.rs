//! Pipeline coordinator that wires the sensor workers to the orchestrator.
//!
//! A small fixed set of background workers (camera poll, voice listen)
//! runs alongside one orchestrator event loop plus an on-demand synthesis
//! queue. Cross-boundary communication is strictly message-passing: the
//! workers deliver [`PipelineEvent`]s over a channel, and only the
//! orchestrator loop touches the chat log and the smoothed state.

use crate::backend::ConversationBackend;
use crate::capture::CaptureLifecycle;
use crate::config::{AssistantConfig, EmotionConfig};
use crate::emotion::{EmotionLabel, RawEmotionSample};
use crate::error::Result;
use crate::pipeline::messages::{PipelineEvent, UiEvent};
use crate::pipeline::orchestrator::Orchestrator;
use crate::vision::{EmotionClassifier, FrameSource};
use crate::voice::{SpeechSynthesizer, SpeechToText};
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Channel buffer sizes.
const EVENT_CHANNEL_SIZE: usize = 64;
const SPEAK_CHANNEL_SIZE: usize = 16;

/// Delay before retrying after a recognizer error, so a broken microphone
/// doesn't spin the listen loop.
const STT_ERROR_BACKOFF: Duration = Duration::from_millis(500);

/// Orchestrates the sensor workers, the conversation loop, and synthesis.
pub struct PipelineCoordinator {
    config: AssistantConfig,
    cancel: CancellationToken,
    backend: Arc<dyn ConversationBackend>,
    frame_source: Option<Arc<dyn FrameSource>>,
    classifier: Option<Arc<dyn EmotionClassifier>>,
    stt: Option<Arc<dyn SpeechToText>>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    ui_tx: Option<mpsc::UnboundedSender<UiEvent>>,
    event_tx: mpsc::Sender<PipelineEvent>,
    event_rx: mpsc::Receiver<PipelineEvent>,
    rng: Option<StdRng>,
}

impl PipelineCoordinator {
    /// Create a coordinator with the given configuration and backend.
    ///
    /// Sensors, synthesis, and presentation are attached with the
    /// `with_*` builders; anything left unattached degrades to inert.
    pub fn new(config: AssistantConfig, backend: Arc<dyn ConversationBackend>) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_SIZE);
        Self {
            config,
            cancel: CancellationToken::new(),
            backend,
            frame_source: None,
            classifier: None,
            stt: None,
            synthesizer: None,
            ui_tx: None,
            event_tx,
            event_rx,
            rng: None,
        }
    }

    /// Attach the camera frame source and emotion classifier.
    pub fn with_camera(
        mut self,
        source: Arc<dyn FrameSource>,
        classifier: Arc<dyn EmotionClassifier>,
    ) -> Self {
        self.frame_source = Some(source);
        self.classifier = Some(classifier);
        self
    }

    /// Attach the speech-to-text engine for continuous listening.
    pub fn with_voice(mut self, stt: Arc<dyn SpeechToText>) -> Self {
        self.stt = Some(stt);
        self
    }

    /// Attach the speech synthesizer for spoken replies.
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Attach the presentation channel. The surface drains [`UiEvent`]s
    /// on its own thread; the pipeline never calls into it directly.
    pub fn with_presentation(mut self, ui_tx: mpsc::UnboundedSender<UiEvent>) -> Self {
        self.ui_tx = Some(ui_tx);
        self
    }

    /// Use an explicit throttle RNG (seeded in tests).
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Sender for injecting events: typed input from the UI, or synthetic
    /// events in tests.
    pub fn event_sender(&self) -> mpsc::Sender<PipelineEvent> {
        self.event_tx.clone()
    }

    /// Token that shuts the whole pipeline down when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the pipeline until cancelled.
    ///
    /// Spawns the attached sensor workers, seeds the greeting, then drives
    /// the orchestrator loop. On cancellation both sensor lifecycles are
    /// stopped and joined before this returns.
    ///
    /// # Errors
    ///
    /// Currently infallible at runtime; the `Result` covers future stage
    /// initialization failures.
    pub async fn run(mut self) -> Result<()> {
        info!("initializing assistant pipeline");

        // Synthesis queue: a dedicated task serializes speak calls.
        let speak_tx = self.synthesizer.take().map(|synthesizer| {
            let (speak_tx, speak_rx) = mpsc::channel::<String>(SPEAK_CHANNEL_SIZE);
            let cancel = self.cancel.clone();
            tokio::spawn(async move {
                run_speak_stage(synthesizer, speak_rx, cancel).await;
            });
            speak_tx
        });

        // Camera worker: polls frames, classifies off-thread, emits raw samples.
        let mut camera = CaptureLifecycle::new("camera worker");
        match (self.frame_source.take(), self.classifier.take()) {
            (Some(source), Some(classifier)) => {
                let config = self.config.emotion.clone();
                let tx = self.event_tx.clone();
                camera.start(move |token| {
                    tokio::spawn(async move {
                        run_camera_stage(config, source, classifier, tx, token).await;
                    })
                });
            }
            _ => warn!("no camera attached; emotion sensing disabled"),
        }

        // Voice worker: blocks on utterance boundaries, emits transcripts.
        let mut voice = CaptureLifecycle::new("voice worker");
        match self.stt.take() {
            Some(stt) => {
                let tx = self.event_tx.clone();
                voice.start(move |token| {
                    tokio::spawn(async move {
                        run_voice_stage(stt, tx, token).await;
                    })
                });
            }
            None => warn!("no microphone attached; voice input disabled"),
        }

        let mut orchestrator = match self.rng.take() {
            Some(rng) => Orchestrator::with_rng(
                &self.config,
                Arc::clone(&self.backend),
                self.ui_tx.clone(),
                speak_tx,
                rng,
            ),
            None => Orchestrator::new(
                &self.config,
                Arc::clone(&self.backend),
                self.ui_tx.clone(),
                speak_tx,
            ),
        };
        orchestrator.on_startup();

        info!("assistant pipeline running");
        loop {
            tokio::select! {
                () = self.cancel.cancelled() => break,
                event = self.event_rx.recv() => match event {
                    Some(event) => orchestrator.handle_event(event).await,
                    None => break,
                },
            }
        }

        // Shutdown: join both sensor workers so no late event can arrive
        // into a torn-down orchestrator.
        camera.stop().await;
        voice.stop().await;
        info!("assistant pipeline stopped");
        Ok(())
    }
}

/// Camera stage: one classification per polling tick.
///
/// Frame acquisition and the (synchronous, possibly slow) classifier run
/// on the blocking pool. Low-confidence readings are demoted to `unknown`
/// before smoothing. Samples are supersedable, so a full event channel
/// drops them rather than blocking the tick.
async fn run_camera_stage(
    config: EmotionConfig,
    source: Arc<dyn FrameSource>,
    classifier: Arc<dyn EmotionClassifier>,
    tx: mpsc::Sender<PipelineEvent>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(Duration::from_millis(config.poll_interval_ms.max(1)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let floor = config.smoothing_threshold;
    info!(
        "camera stage started: polling every {}ms, confidence floor {floor}",
        config.poll_interval_ms
    );

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let source = Arc::clone(&source);
                let classifier = Arc::clone(&classifier);
                let joined = tokio::task::spawn_blocking(move || {
                    let frame = source.next_frame()?;
                    let (label, confidence) = classifier.classify(&frame)?;
                    Ok::<RawEmotionSample, crate::error::AssistantError>(RawEmotionSample {
                        label,
                        confidence,
                        frame,
                    })
                })
                .await;

                match joined {
                    Ok(Ok(mut sample)) => {
                        if sample.confidence < floor {
                            sample.label = EmotionLabel::Unknown;
                        }
                        if tx.try_send(PipelineEvent::RawSample(sample)).is_err() {
                            debug!("event channel full, dropping emotion sample");
                        }
                    }
                    Ok(Err(e)) => warn!("emotion capture failed: {e}"),
                    // A panicking classifier costs this tick, not the stage.
                    Err(e) => error!("emotion capture task panicked: {e}"),
                }
            }
        }
    }
    info!("camera stage stopped");
}

/// Voice stage: delivers each recognized utterance to the orchestrator.
///
/// Recognizer errors are logged and listening continues after a short
/// backoff; only cancellation ends the loop. Unlike emotion samples,
/// transcripts are user input and are never dropped on backpressure.
async fn run_voice_stage(
    stt: Arc<dyn SpeechToText>,
    tx: mpsc::Sender<PipelineEvent>,
    cancel: CancellationToken,
) {
    info!("voice stage started");
    loop {
        if cancel.is_cancelled() {
            break;
        }
        let stt_call = Arc::clone(&stt);
        let listen = tokio::task::spawn_blocking(move || stt_call.next_utterance());
        tokio::select! {
            () = cancel.cancelled() => break,
            joined = listen => match joined {
                Ok(Ok(Some(text))) if !text.trim().is_empty() => {
                    if tx.send(PipelineEvent::Transcript(text)).await.is_err() {
                        break;
                    }
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    warn!("speech recognition failed: {e}");
                    tokio::time::sleep(STT_ERROR_BACKOFF).await;
                }
                Err(e) => {
                    error!("speech recognition task panicked: {e}");
                    tokio::time::sleep(STT_ERROR_BACKOFF).await;
                }
            },
        }
    }
    info!("voice stage stopped");
}

/// Synthesis stage: speaks queued utterances one at a time.
///
/// The blocking `speak` call runs on the blocking pool and is awaited
/// before the next utterance is dequeued, so overlapping requests are
/// serialized. Synthesis failures are logged and skipped.
async fn run_speak_stage(
    synthesizer: Arc<dyn SpeechSynthesizer>,
    mut rx: mpsc::Receiver<String>,
    cancel: CancellationToken,
) {
    info!("synthesis stage started");
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            text = rx.recv() => match text {
                Some(text) => {
                    let synthesizer = Arc::clone(&synthesizer);
                    match tokio::task::spawn_blocking(move || synthesizer.speak(&text)).await {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => warn!("speech synthesis failed: {e}"),
                        Err(e) => error!("synthesis task panicked: {e}"),
                    }
                }
                None => break,
            },
        }
    }
    info!("synthesis stage stopped");
}
