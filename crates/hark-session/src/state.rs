//! Session state machine with thread-safe transitions.
//!
//! Enforces valid state transitions for the recognizer session lifecycle:
//! - any state -> Initializing (re-init replaces the decoder)
//! - Initializing -> Ready (decoder constructed)
//! - Initializing -> Failed (model files missing or corrupt)
//! - Ready -> Listening (pass started)
//! - Listening -> Listening (search switch)
//! - Listening -> Stopping -> Ready (pass ended)
//! - Ready/Listening -> Failed (search rejected, engine error)

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use hark_core::error::{HarkError, Result};
use hark_core::types::SearchMode;

/// Operational state of a recognizer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No decoder yet. Only init and state queries are accepted.
    Uninitialized,
    /// Decoder construction in progress.
    Initializing,
    /// Decoder constructed, no pass active.
    Ready,
    /// A recognition pass is active with the given search mode.
    Listening(SearchMode),
    /// An active pass is being cancelled and released.
    Stopping,
    /// The session failed; only a re-init can recover it.
    Failed(String),
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Uninitialized => write!(f, "Uninitialized"),
            SessionState::Initializing => write!(f, "Initializing"),
            SessionState::Ready => write!(f, "Ready"),
            SessionState::Listening(mode) => write!(f, "Listening({mode})"),
            SessionState::Stopping => write!(f, "Stopping"),
            SessionState::Failed(reason) => write!(f, "Failed({reason})"),
        }
    }
}

impl SessionState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &SessionState) -> bool {
        matches!(
            (self, target),
            // Re-init is allowed from anywhere, including Failed.
            (_, SessionState::Initializing)
                | (SessionState::Initializing, SessionState::Ready)
                | (SessionState::Initializing, SessionState::Failed(_))
                | (SessionState::Ready, SessionState::Listening(_))
                // Search switch while a pass is active.
                | (SessionState::Listening(_), SessionState::Listening(_))
                | (SessionState::Listening(_), SessionState::Stopping)
                | (SessionState::Stopping, SessionState::Ready)
                | (SessionState::Ready, SessionState::Failed(_))
                | (SessionState::Listening(_), SessionState::Failed(_))
        )
    }

    /// Returns whether a pass is currently active.
    pub fn is_listening(&self) -> bool {
        matches!(self, SessionState::Listening(_))
    }
}

/// Record of an active recognition pass.
#[derive(Debug, Clone)]
pub struct ListeningSession {
    /// Unique identifier for this pass.
    pub id: Uuid,
    /// When the pass was started.
    pub started_at: DateTime<Utc>,
    /// The search mode active for this pass.
    pub mode: SearchMode,
}

impl ListeningSession {
    pub fn new(mode: SearchMode) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            mode,
        }
    }

    /// Returns the elapsed duration of this pass in seconds.
    pub fn elapsed_secs(&self) -> f32 {
        let elapsed = Utc::now() - self.started_at;
        elapsed.num_milliseconds() as f32 / 1000.0
    }
}

#[derive(Debug)]
struct SessionShared {
    state: SessionState,
    assets_path: Option<PathBuf>,
    session: Option<ListeningSession>,
}

/// Thread-safe cell holding the session state, assets path, and active pass.
///
/// One mutex guards all three fields: the command path mutates them while the
/// callback relay reads them concurrently, and they must never be observed
/// out of sync. All transitions are validated before being applied.
#[derive(Debug, Clone)]
pub struct SessionCell {
    shared: Arc<Mutex<SessionShared>>,
}

impl Default for SessionCell {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionCell {
    /// Create a new cell initialized to `Uninitialized`.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(SessionShared {
                state: SessionState::Uninitialized,
                assets_path: None,
                session: None,
            })),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> SessionState {
        self.shared.lock().expect("session mutex poisoned").state.clone()
    }

    /// Returns the assets path set by the last init, if any.
    pub fn assets_path(&self) -> Option<PathBuf> {
        self.shared
            .lock()
            .expect("session mutex poisoned")
            .assets_path
            .clone()
    }

    /// Returns a clone of the active pass record, if one exists.
    pub fn session(&self) -> Option<ListeningSession> {
        self.shared
            .lock()
            .expect("session mutex poisoned")
            .session
            .clone()
    }

    /// Store the assets path supplied at init. Immutable until the next init.
    pub fn set_assets_path(&self, path: PathBuf) {
        self.shared.lock().expect("session mutex poisoned").assets_path = Some(path);
    }

    /// Attempt to transition to the target state.
    ///
    /// Returns an error if the transition is not permitted from the current
    /// state; the state is left unchanged in that case.
    pub fn transition(&self, target: SessionState) -> Result<()> {
        let mut shared = self.shared.lock().expect("session mutex poisoned");
        if shared.state.can_transition_to(&target) {
            tracing::debug!("Session state: {} -> {}", shared.state, target);
            shared.state = target;
            Ok(())
        } else {
            Err(HarkError::Session(format!(
                "Invalid state transition: {} -> {}",
                shared.state, target
            )))
        }
    }

    /// Force the session into `Failed` (used on error paths where the
    /// failure must win regardless of the current state).
    pub fn fail(&self, reason: &str) {
        let mut shared = self.shared.lock().expect("session mutex poisoned");
        tracing::warn!("Session forced to Failed from {}: {}", shared.state, reason);
        shared.state = SessionState::Failed(reason.to_string());
        shared.session = None;
    }

    /// Record a new active pass and return a clone of it.
    pub fn begin_session(&self, mode: SearchMode) -> ListeningSession {
        let session = ListeningSession::new(mode);
        self.shared.lock().expect("session mutex poisoned").session = Some(session.clone());
        session
    }

    /// Clear the active pass record, returning its id if one existed.
    pub fn clear_session(&self) -> Option<Uuid> {
        self.shared
            .lock()
            .expect("session mutex poisoned")
            .session
            .take()
            .map(|s| s.id)
    }

    /// Tear the cell down to its initial state (session detach).
    pub fn reset(&self) {
        let mut shared = self.shared.lock().expect("session mutex poisoned");
        tracing::debug!("Session cell reset from {}", shared.state);
        shared.state = SessionState::Uninitialized;
        shared.assets_path = None;
        shared.session = None;
    }
}
