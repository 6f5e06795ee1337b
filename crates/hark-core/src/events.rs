use serde::{Deserialize, Serialize};

/// Session lifecycle events published on the lifecycle sink.
///
/// Exactly one event is emitted per externally observable state transition.
/// The wire shape is a single-field object `{"event": "<name>"}`, matching
/// what host bridges expect from the state stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum LifecycleEvent {
    /// The decoder was constructed and the session is ready.
    Initialized,
    /// Search definitions are registered; the session is idle and loaded.
    Loaded,
    /// A recognition pass started.
    Listening,
    /// The session moved to the failed state.
    Error { reason: String },
}

impl LifecycleEvent {
    /// Symbolic name used on the wire and in logs.
    pub fn event_name(&self) -> &'static str {
        match self {
            LifecycleEvent::Initialized => "initialized",
            LifecycleEvent::Loaded => "loaded",
            LifecycleEvent::Listening => "listening",
            LifecycleEvent::Error { .. } => "error",
        }
    }

    /// The single-field event object sent to the host bridge.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({ "event": self.event_name() })
    }
}

/// Recognition events relayed verbatim from the recognizer callback channel.
///
/// One event per callback, in delivery order. Hypothesis text is `None` when
/// the underlying callback carried no text; downstream consumers expect every
/// partial update, so these are never coalesced or deduplicated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RecognitionEvent {
    /// In-progress best-guess transcription.
    PartialHypothesis { text: Option<String> },
    /// End-of-utterance transcription.
    FinalHypothesis { text: Option<String> },
    /// The engine detected the start of speech.
    BeginningOfSpeech,
    /// The engine detected the end of speech.
    EndOfSpeech,
    /// The recognition pass timed out. The pass is not restarted
    /// automatically; that is a caller decision.
    Timeout,
    /// Opaque failure surfaced by the engine's error callback.
    EngineError { reason: String },
}

impl RecognitionEvent {
    /// Hypothesis text carried by this event, if any.
    pub fn hypothesis(&self) -> Option<&str> {
        match self {
            RecognitionEvent::PartialHypothesis { text }
            | RecognitionEvent::FinalHypothesis { text } => text.as_deref(),
            _ => None,
        }
    }
}
