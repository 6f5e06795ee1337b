//! Session controller: command validation, state transitions, event relay.
//!
//! The controller owns the recognizer lifecycle. Commands arrive from one
//! control path and are processed strictly sequentially; a command issued
//! while another is in flight is rejected with `Busy` rather than queued.
//! Engine callbacks arrive on their own channel and are relayed to the
//! recognition sink by a background task, concurrent with command handling.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, TryLockError};

use tokio::task::JoinHandle;

use hark_core::config::{ModelConfig, SessionConfig};
use hark_core::error::{HarkError, Result};
use hark_core::events::{LifecycleEvent, RecognitionEvent};
use hark_core::types::{SearchDefinition, SearchMode};

use crate::recognizer::{CallbackReceiver, Recognizer, RecognizerCallback, RecognizerFactory};
use crate::sink::EventSinks;
use crate::state::{SessionCell, SessionState};

/// Command-side resources: the decoder and the searches registered on it.
///
/// Locked only while a command executes, so the containing mutex doubles as
/// the in-flight command gate.
struct CommandSide {
    recognizer: Option<Box<dyn Recognizer>>,
    registered: HashSet<String>,
}

/// Owns recognizer session state, validates commands against it, and fans
/// recognition events out to the sink pair.
pub struct SessionController {
    factory: Box<dyn RecognizerFactory>,
    session_cfg: SessionConfig,
    model_cfg: ModelConfig,
    cell: SessionCell,
    command: Mutex<CommandSide>,
    sinks: EventSinks,
    relay: Mutex<Option<JoinHandle<()>>>,
}

impl SessionController {
    /// Create a controller around a recognizer factory.
    ///
    /// No decoder exists until `init` succeeds; until then only `init` and
    /// `current_state` are accepted.
    pub fn new(
        factory: Box<dyn RecognizerFactory>,
        session_cfg: SessionConfig,
        model_cfg: ModelConfig,
    ) -> Self {
        let sinks = EventSinks::new(session_cfg.sink_capacity);
        Self {
            factory,
            session_cfg,
            model_cfg,
            cell: SessionCell::new(),
            command: Mutex::new(CommandSide {
                recognizer: None,
                registered: HashSet::new(),
            }),
            sinks,
            relay: Mutex::new(None),
        }
    }

    /// The sink pair this controller publishes on.
    pub fn sinks(&self) -> &EventSinks {
        &self.sinks
    }

    /// Report the current session state. Never fails and bypasses the
    /// command gate; it is a read, not a queued command.
    pub fn current_state(&self) -> SessionState {
        self.cell.state()
    }

    /// Construct the decoder from a resource bundle path.
    ///
    /// Valid from any state; a live pass is cancelled and the previous
    /// decoder released before the new one is constructed. On success the
    /// session is `Ready` and an `initialized` lifecycle event is emitted; on
    /// failure the session is `Failed` with an `error` event.
    pub fn init(&self, assets_path: impl AsRef<Path>) -> Result<()> {
        let mut command = self.lock_command()?;
        let path = assets_path.as_ref().to_path_buf();

        if self.cell.state().is_listening() {
            if let Some(recognizer) = command.recognizer.as_mut() {
                recognizer.cancel();
                recognizer.stop();
            }
        }
        self.abort_relay();
        command.recognizer = None;
        command.registered.clear();
        self.cell.clear_session();

        self.cell.transition(SessionState::Initializing)?;
        self.cell.set_assets_path(path.clone());

        match self.factory.construct(&path) {
            Ok((recognizer, callbacks)) => {
                command.recognizer = Some(recognizer);
                self.spawn_relay(callbacks);
                self.cell.transition(SessionState::Ready)?;
                tracing::info!(assets = %path.display(), "Recognizer initialized");
                self.sinks.publish_lifecycle(LifecycleEvent::Initialized);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Register the keyword-spotting search definitions on the decoder.
    ///
    /// Valid from `Ready` or `Listening`; the state is unchanged and a
    /// `loaded` lifecycle event is emitted on success.
    pub fn load(&self) -> Result<()> {
        let mut command = self.lock_command()?;
        let assets = self.require_session()?;
        let recognizer = command
            .recognizer
            .as_mut()
            .ok_or(HarkError::RecognizerUnavailable)?;

        let name = self.session_cfg.keyword_search_name.clone();
        let definition =
            SearchDefinition::KeywordList(assets.join(&self.model_cfg.keyword_list_file));
        match recognizer.register_search(&name, &definition) {
            Ok(()) => {
                command.registered.insert(name);
                self.sinks.publish_lifecycle(LifecycleEvent::Loaded);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Begin a keyword-spotting pass.
    ///
    /// Valid from `Ready` or `Listening`. The keyword search is registered
    /// first if absent. A pass that is already active is cancelled and
    /// stopped before the new one starts: the engine cannot switch searches
    /// while listening.
    pub fn start(&self) -> Result<()> {
        let mut command = self.lock_command()?;
        let assets = self.require_session()?;
        let CommandSide {
            recognizer,
            registered,
        } = &mut *command;
        let recognizer = recognizer
            .as_mut()
            .ok_or(HarkError::RecognizerUnavailable)?;

        if self.cell.state().is_listening() {
            recognizer.cancel();
            recognizer.stop();
        }

        let name = self.session_cfg.keyword_search_name.clone();
        if !registered.contains(&name) {
            let definition =
                SearchDefinition::KeywordList(assets.join(&self.model_cfg.keyword_list_file));
            if let Err(e) = recognizer.register_search(&name, &definition) {
                return Err(self.fail(e));
            }
            registered.insert(name.clone());
        }

        if let Err(e) = recognizer.start_listening(&name) {
            return Err(self.fail(e));
        }

        self.cell
            .transition(SessionState::Listening(SearchMode::KeywordSpotting))?;
        let session = self.cell.begin_session(SearchMode::KeywordSpotting);
        tracing::info!(session_id = %session.id, search = %name, "Keyword pass started");
        self.sinks.publish_lifecycle(LifecycleEvent::Listening);
        Ok(())
    }

    /// Switch to (or begin) a single-word search pass.
    ///
    /// Valid from `Ready` or `Listening`. An active pass is always cancelled
    /// and then stopped, in that order, before the word search is registered
    /// and started; skipping either step corrupts engine state.
    pub fn start_word(&self, name: &str) -> Result<()> {
        let mut command = self.lock_command()?;
        let _assets = self.require_session()?;
        let CommandSide {
            recognizer,
            registered,
        } = &mut *command;
        let recognizer = recognizer
            .as_mut()
            .ok_or(HarkError::RecognizerUnavailable)?;

        if self.cell.state().is_listening() {
            recognizer.cancel();
            recognizer.stop();
        }

        // Refresh the search every time; the phrase under a name may change.
        let definition = SearchDefinition::Phrase(name.to_string());
        if let Err(e) = recognizer.register_search(name, &definition) {
            return Err(self.fail(e));
        }
        registered.insert(name.to_string());

        if let Err(e) = recognizer.start_listening(name) {
            return Err(self.fail(e));
        }

        let mode = SearchMode::Word(name.to_string());
        self.cell.transition(SessionState::Listening(mode.clone()))?;
        let session = self.cell.begin_session(mode);
        tracing::info!(session_id = %session.id, search = %name, "Word pass started");
        self.sinks.publish_lifecycle(LifecycleEvent::Listening);
        Ok(())
    }

    /// End the active pass, if any.
    ///
    /// From `Listening`: cancel, then stop, then return to `Ready` with a
    /// `loaded` lifecycle event. From `Ready`: success with no effect and no
    /// event. Anything earlier in the lifecycle is rejected.
    pub fn stop(&self) -> Result<()> {
        let mut command = self.lock_command()?;
        match self.cell.state() {
            SessionState::Listening(_) => {
                let recognizer = command
                    .recognizer
                    .as_mut()
                    .ok_or(HarkError::RecognizerUnavailable)?;
                self.cell.transition(SessionState::Stopping)?;
                recognizer.cancel();
                recognizer.stop();
                self.cell.transition(SessionState::Ready)?;
                if let Some(id) = self.cell.clear_session() {
                    tracing::info!(session_id = %id, "Pass stopped");
                }
                self.sinks.publish_lifecycle(LifecycleEvent::Loaded);
                Ok(())
            }
            SessionState::Ready => Ok(()),
            _ => Err(HarkError::RecognizerUnavailable),
        }
    }

    /// Tear the session down: end any pass, release the decoder, stop the
    /// relay, and clear all state. Used on host detach.
    pub fn shutdown(&self) {
        if let Ok(mut command) = self.command.lock() {
            if self.cell.state().is_listening() {
                if let Some(recognizer) = command.recognizer.as_mut() {
                    recognizer.cancel();
                    recognizer.stop();
                }
            }
            command.recognizer = None;
            command.registered.clear();
        }
        self.abort_relay();
        self.cell.reset();
        tracing::info!("Session torn down");
    }

    /// Acquire the command gate, rejecting with `Busy` if another command is
    /// in flight.
    fn lock_command(&self) -> Result<MutexGuard<'_, CommandSide>> {
        match self.command.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::WouldBlock) => Err(HarkError::Busy),
            Err(TryLockError::Poisoned(_)) => {
                Err(HarkError::Session("command mutex poisoned".to_string()))
            }
        }
    }

    /// A decoder-dependent command requires `Ready` or `Listening` and a
    /// stored assets path.
    fn require_session(&self) -> Result<PathBuf> {
        match self.cell.state() {
            SessionState::Ready | SessionState::Listening(_) => self
                .cell
                .assets_path()
                .ok_or(HarkError::RecognizerUnavailable),
            _ => Err(HarkError::RecognizerUnavailable),
        }
    }

    /// Move the session to `Failed`, emit the lifecycle `error` event, and
    /// hand the error back to the caller.
    fn fail(&self, err: HarkError) -> HarkError {
        let reason = err.to_string();
        self.cell.fail(&reason);
        self.sinks.publish_lifecycle(LifecycleEvent::Error { reason });
        err
    }

    /// Start the callback relay task for a freshly constructed decoder.
    ///
    /// Each callback becomes exactly one recognition event, in delivery
    /// order. Engine errors are additionally mirrored onto the lifecycle sink
    /// and move the session to `Failed`; they never panic the host.
    fn spawn_relay(&self, mut callbacks: CallbackReceiver) {
        let cell = self.cell.clone();
        let sinks = self.sinks.clone();
        let handle = tokio::spawn(async move {
            while let Some(callback) = callbacks.recv().await {
                match callback {
                    RecognizerCallback::PartialHypothesis(text) => {
                        sinks.publish_recognition(RecognitionEvent::PartialHypothesis { text });
                    }
                    RecognizerCallback::FinalHypothesis(text) => {
                        sinks.publish_recognition(RecognitionEvent::FinalHypothesis { text });
                    }
                    RecognizerCallback::BeginningOfSpeech => {
                        sinks.publish_recognition(RecognitionEvent::BeginningOfSpeech);
                    }
                    RecognizerCallback::EndOfSpeech => {
                        sinks.publish_recognition(RecognitionEvent::EndOfSpeech);
                    }
                    RecognizerCallback::Timeout => {
                        tracing::debug!("Recognition pass timed out");
                        sinks.publish_recognition(RecognitionEvent::Timeout);
                    }
                    RecognizerCallback::Error(reason) => {
                        tracing::warn!(%reason, "Engine error callback");
                        sinks.publish_recognition(RecognitionEvent::EngineError {
                            reason: reason.clone(),
                        });
                        cell.fail(&reason);
                        sinks.publish_lifecycle(LifecycleEvent::Error { reason });
                    }
                }
            }
            tracing::debug!("Recognizer callback channel closed");
        });

        if let Ok(mut relay) = self.relay.lock() {
            if let Some(previous) = relay.replace(handle) {
                previous.abort();
            }
        }
    }

    fn abort_relay(&self) {
        if let Ok(mut relay) = self.relay.lock() {
            if let Some(handle) = relay.take() {
                handle.abort();
            }
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.abort_relay();
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.cell.state())
            .finish()
    }
}
