//! Hark session crate - recognizer lifecycle state machine, command
//! handling, and event relay.
//!
//! The [`SessionController`] validates commands against the session state
//! machine, drives the recognizer collaborator through its capability trait,
//! and relays engine callbacks onto the lifecycle/recognition sink pair.
//! Thread-safe state management is handled via `Arc<Mutex<>>`.

pub mod controller;
pub mod recognizer;
pub mod sink;
pub mod state;

pub use controller::SessionController;
pub use recognizer::{
    callback_channel, CallbackReceiver, CallbackSender, Recognizer, RecognizerCallback,
    RecognizerFactory,
};
pub use sink::EventSinks;
pub use state::{ListeningSession, SessionCell, SessionState};
