//! Scripted demo recognizer.
//!
//! Stands in for the real decoder so the binary runs without model files or
//! a microphone: each pass emits canned utterances word by word as partial
//! hypotheses, then the full phrase as the final hypothesis. Honors the same
//! contract as a real engine: searches cannot change mid-pass, `cancel`
//! discards the pass, callbacks are delivered in order on the channel.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hark_core::error::{HarkError, Result};
use hark_core::types::SearchDefinition;
use hark_session::{
    callback_channel, CallbackReceiver, CallbackSender, Recognizer, RecognizerCallback,
    RecognizerFactory,
};

const SCRIPT: &[&str] = &["turn on the light", "what is the weather"];

/// Factory for [`ScriptedRecognizer`] instances.
///
/// Timing is configurable so tests can run the script at full speed.
pub struct ScriptedRecognizerFactory {
    /// Pause before each utterance begins.
    pub utterance_gap: Duration,
    /// Pause between successive partial hypotheses.
    pub word_gap: Duration,
}

impl Default for ScriptedRecognizerFactory {
    fn default() -> Self {
        Self {
            utterance_gap: Duration::from_millis(800),
            word_gap: Duration::from_millis(250),
        }
    }
}

impl RecognizerFactory for ScriptedRecognizerFactory {
    fn construct(&self, assets_path: &Path) -> Result<(Box<dyn Recognizer>, CallbackReceiver)> {
        if !assets_path.exists() {
            return Err(HarkError::Init(format!(
                "assets directory not found: {}",
                assets_path.display()
            )));
        }
        let (callbacks, rx) = callback_channel();
        let recognizer = ScriptedRecognizer {
            callbacks,
            pass: None,
            utterance_gap: self.utterance_gap,
            word_gap: self.word_gap,
        };
        Ok((Box::new(recognizer), rx))
    }
}

pub struct ScriptedRecognizer {
    callbacks: CallbackSender,
    /// Liveness flag of the current pass; a fresh flag per pass so a stale
    /// emission task can never outlive its own pass.
    pass: Option<Arc<AtomicBool>>,
    utterance_gap: Duration,
    word_gap: Duration,
}

impl Recognizer for ScriptedRecognizer {
    fn register_search(&mut self, name: &str, definition: &SearchDefinition) -> Result<()> {
        match definition {
            SearchDefinition::KeywordList(path) => {
                tracing::debug!(search = name, list = %path.display(), "Search registered");
            }
            SearchDefinition::Phrase(phrase) => {
                tracing::debug!(search = name, phrase, "Search registered");
            }
        }
        Ok(())
    }

    fn start_listening(&mut self, name: &str) -> Result<()> {
        let live = Arc::new(AtomicBool::new(true));
        self.pass = Some(Arc::clone(&live));
        tracing::debug!(search = name, "Scripted pass started");

        let callbacks = self.callbacks.clone();
        let utterance_gap = self.utterance_gap;
        let word_gap = self.word_gap;
        tokio::spawn(async move {
            run_script(callbacks, live, utterance_gap, word_gap).await;
        });
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(live) = self.pass.take() {
            live.store(false, Ordering::SeqCst);
        }
    }

    fn cancel(&mut self) {
        if let Some(live) = self.pass.take() {
            live.store(false, Ordering::SeqCst);
        }
    }
}

async fn run_script(
    callbacks: CallbackSender,
    live: Arc<AtomicBool>,
    utterance_gap: Duration,
    word_gap: Duration,
) {
    for phrase in SCRIPT.iter().cycle() {
        tokio::time::sleep(utterance_gap).await;
        if !live.load(Ordering::SeqCst) {
            return;
        }
        if callbacks
            .send(RecognizerCallback::BeginningOfSpeech)
            .await
            .is_err()
        {
            return;
        }

        let mut partial = String::new();
        for word in phrase.split(' ') {
            tokio::time::sleep(word_gap).await;
            if !live.load(Ordering::SeqCst) {
                return;
            }
            if !partial.is_empty() {
                partial.push(' ');
            }
            partial.push_str(word);
            if callbacks
                .send(RecognizerCallback::PartialHypothesis(Some(partial.clone())))
                .await
                .is_err()
            {
                return;
            }
        }

        if callbacks
            .send(RecognizerCallback::FinalHypothesis(Some(phrase.to_string())))
            .await
            .is_err()
        {
            return;
        }
        if callbacks
            .send(RecognizerCallback::EndOfSpeech)
            .await
            .is_err()
        {
            return;
        }
    }
}
