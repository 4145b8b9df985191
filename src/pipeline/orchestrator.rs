//! The conversation orchestrator: single authority over the chat log.
//!
//! All three input origins (gated emotion events, typed text, and
//! transcribed voice) funnel through [`Orchestrator::handle_event`] on
//! one task, so log appends are serialized and causal order per origin
//! (a user message before its reply) holds by construction.

use crate::backend::{ConversationBackend, FALLBACK_REPLY};
use crate::chat::{ChatLog, ChatMessage, Role};
use crate::config::AssistantConfig;
use crate::emotion::{EmotionLabel, EmotionSmoother, ResponseGate, SmoothedEmotionState};
use crate::pipeline::messages::{InputOrigin, PipelineEvent, UiEvent};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Owns the chat log, smoothing window, response gate, and current
/// stabilized emotion. Mutated only by the coordinator's event loop.
pub struct Orchestrator {
    backend: Arc<dyn ConversationBackend>,
    log: ChatLog,
    smoother: EmotionSmoother,
    gate: ResponseGate,
    current: Option<SmoothedEmotionState>,
    greeting: String,
    ui_tx: Option<mpsc::UnboundedSender<UiEvent>>,
    speak_tx: Option<mpsc::Sender<String>>,
    rng: StdRng,
}

impl Orchestrator {
    /// Create an orchestrator with an entropy-seeded throttle RNG.
    pub fn new(
        config: &AssistantConfig,
        backend: Arc<dyn ConversationBackend>,
        ui_tx: Option<mpsc::UnboundedSender<UiEvent>>,
        speak_tx: Option<mpsc::Sender<String>>,
    ) -> Self {
        Self::with_rng(config, backend, ui_tx, speak_tx, StdRng::from_entropy())
    }

    /// Create an orchestrator with an explicit RNG (seeded in tests).
    pub fn with_rng(
        config: &AssistantConfig,
        backend: Arc<dyn ConversationBackend>,
        ui_tx: Option<mpsc::UnboundedSender<UiEvent>>,
        speak_tx: Option<mpsc::Sender<String>>,
        rng: StdRng,
    ) -> Self {
        Self {
            backend,
            log: ChatLog::new(config.chat.history_limit),
            smoother: EmotionSmoother::new(config.emotion.smoothing_window),
            gate: ResponseGate::new(&config.gate),
            current: None,
            greeting: config.chat.greeting.clone(),
            ui_tx,
            speak_tx,
            rng,
        }
    }

    /// Seed the log with the fixed assistant greeting.
    pub fn on_startup(&mut self) {
        let greeting = self.greeting.clone();
        let message = self.append(Role::Assistant, greeting);
        self.speak(&message.text);
    }

    /// Dispatch one pipeline event.
    pub async fn handle_event(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::RawSample(sample) => self.on_raw_sample(&sample).await,
            PipelineEvent::Transcript(text) => self.on_user_input(&text, InputOrigin::Voice).await,
            PipelineEvent::UserText(text) => self.on_user_input(&text, InputOrigin::Typed).await,
        }
    }

    /// Handle user input from either origin: append the user message,
    /// fetch a contextual reply, append it, and queue it for synthesis.
    ///
    /// Backend failures degrade to [`FALLBACK_REPLY`]; exactly one user
    /// message and one assistant message are appended either way.
    pub async fn on_user_input(&mut self, text: &str, origin: InputOrigin) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let role = match origin {
            InputOrigin::Typed => Role::UserText,
            InputOrigin::Voice => Role::UserVoice,
        };
        self.append(role, text);

        let emotion = self.current_emotion_label();
        let reply = match self.backend.generate_reply(text, emotion).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("conversation backend failed, using fallback: {e}");
                FALLBACK_REPLY.to_owned()
            }
        };
        let message = self.append(Role::Assistant, reply);
        self.speak(&message.text);
    }

    /// Handle an emotion the response gate approved: fetch an unprompted
    /// check-in, append it, and queue it for synthesis.
    pub async fn on_emotion_trigger(&mut self, label: EmotionLabel, confidence: f32) {
        info!("responding to detected emotion: {label} ({confidence:.2})");
        let reply = match self.backend.generate_emotion_reply(label, confidence).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("conversation backend failed, using fallback: {e}");
                FALLBACK_REPLY.to_owned()
            }
        };
        let message = self.append(Role::Assistant, reply);
        self.speak(&message.text);
    }

    /// The stabilized emotion label used as conversation context.
    ///
    /// Neutral before the first sample arrives.
    pub fn current_emotion_label(&self) -> EmotionLabel {
        self.current
            .map(|state| state.label)
            .unwrap_or(EmotionLabel::Neutral)
    }

    /// Read access to the chat log.
    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    async fn on_raw_sample(&mut self, sample: &crate::emotion::RawEmotionSample) {
        let Some(state) = self.smoother.ingest(sample) else {
            return;
        };
        self.current = Some(state);
        self.send_ui(UiEvent::EmotionIndicator {
            label: state.label,
            confidence: state.confidence,
        });

        let decision = self.gate.evaluate(&state, &mut self.rng);
        if decision.should_respond {
            self.on_emotion_trigger(state.label, state.confidence).await;
        } else {
            debug!(
                "emotion {} ({:.2}) not acted on: {:?}",
                state.label, state.confidence, decision.reason
            );
        }
    }

    /// Append to the log and mirror the message to the presentation surface.
    fn append(&mut self, sender: Role, text: impl Into<String>) -> ChatMessage {
        let message = self.log.push(sender, text);
        self.send_ui(UiEvent::Message(message.clone()));
        message
    }

    fn send_ui(&self, event: UiEvent) {
        if let Some(ref tx) = self.ui_tx {
            let _ = tx.send(event);
        }
    }

    /// Fire-and-forget hand-off to the synthesis queue. The queue
    /// serializes overlapping requests; a full queue drops the utterance.
    fn speak(&self, text: &str) {
        if let Some(ref tx) = self.speak_tx
            && tx.try_send(text.to_owned()).is_err()
        {
            debug!("synthesis queue full, dropping utterance");
        }
    }
}
