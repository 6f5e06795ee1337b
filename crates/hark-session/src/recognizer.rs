//! Capability contract for the wrapped recognition engine.
//!
//! The session core never talks to a decoder directly; it drives whatever
//! implements [`Recognizer`] and receives engine callbacks as tagged values
//! over an mpsc channel handed out at construction time. The channel replaces
//! listener-override dispatch: the controller subscribes once and
//! demultiplexes by variant.

use std::path::Path;

use tokio::sync::mpsc;

use hark_core::error::Result;
use hark_core::types::SearchDefinition;

/// Asynchronous callback emitted by the engine on its own processing thread.
///
/// Delivery order is significant and must be preserved by whoever relays
/// these. Hypothesis text is `None` when the engine fired the callback with
/// no transcription attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerCallback {
    PartialHypothesis(Option<String>),
    FinalHypothesis(Option<String>),
    BeginningOfSpeech,
    EndOfSpeech,
    Timeout,
    Error(String),
}

/// Receiving half of a recognizer callback channel.
pub type CallbackReceiver = mpsc::Receiver<RecognizerCallback>;

/// Sending half of a recognizer callback channel, held by the engine.
pub type CallbackSender = mpsc::Sender<RecognizerCallback>;

/// Create a callback channel with the conventional depth.
pub fn callback_channel() -> (CallbackSender, CallbackReceiver) {
    mpsc::channel(64)
}

/// A constructed decoder the session controller can drive.
///
/// Engines of this class cannot mutate searches while a pass is active;
/// callers must `cancel()` and `stop()` before registering or starting a
/// different search.
pub trait Recognizer: Send {
    /// Register (or refresh) a named search configuration.
    fn register_search(&mut self, name: &str, definition: &SearchDefinition) -> Result<()>;

    /// Begin a recognition pass using the named search.
    fn start_listening(&mut self, name: &str) -> Result<()>;

    /// Release the active pass and flush the final buffered hypothesis.
    fn stop(&mut self);

    /// Discard the active pass without producing a final hypothesis.
    fn cancel(&mut self);
}

/// Constructs decoders from a resource bundle path.
///
/// Returns the decoder together with the receiving half of its callback
/// channel. Fails with [`hark_core::HarkError::Init`] when the model or
/// dictionary files under `assets_path` are missing or unreadable.
pub trait RecognizerFactory: Send + Sync {
    fn construct(&self, assets_path: &Path) -> Result<(Box<dyn Recognizer>, CallbackReceiver)>;
}
