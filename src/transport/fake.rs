//! In-process scripted transport for session unit and integration tests
//!
//! This module provides [`ScriptedTransport`], a [`Transport`] that yields
//! pre-scripted delta sequences instead of touching the network. Tests wire
//! it into a `ChatSession`, script one event sequence per expected turn,
//! and afterwards inspect the recorded calls to assert on what the session
//! sent.
//!
//! # Usage
//!
//! ```
//! use fitsage::transport::fake::ScriptedTransport;
//! use fitsage::transport::DeltaEvent;
//!
//! let transport = ScriptedTransport::new().with_turn(vec![
//!     DeltaEvent::TextDelta("Hel".to_string()),
//!     DeltaEvent::TextDelta("lo".to_string()),
//!     DeltaEvent::Done,
//! ]);
//! ```
//!
//! For cancellation tests, [`ScriptedTransport::endless`] builds a spy whose
//! stream repeats the same delta forever; the session must stop folding the
//! moment it is cancelled even though the stream never ends.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{FitsageError, Result};
use crate::session::message::{Message, UserInput};
use crate::transport::{DeltaEvent, DeltaStream, Transport};

/// One recorded `open` call, for post-hoc assertions
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub history_len: usize,
    pub input_text: String,
    pub attachment_names: Vec<String>,
}

/// Transport double that replays scripted delta sequences
pub struct ScriptedTransport {
    turns: Mutex<VecDeque<Vec<DeltaEvent>>>,
    calls: Mutex<Vec<RecordedCall>>,
    endless_delta: Option<String>,
}

impl ScriptedTransport {
    /// Create a transport with no scripted turns.
    ///
    /// An unscripted `open` call yields a bare `Done`, which folds into an
    /// empty but successful turn.
    pub fn new() -> Self {
        Self {
            turns: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            endless_delta: None,
        }
    }

    /// Append one scripted turn; turns are consumed in order
    pub fn with_turn(self, events: Vec<DeltaEvent>) -> Self {
        self.turns
            .lock()
            .expect("ScriptedTransport turns lock poisoned")
            .push_back(events);
        self
    }

    /// Build a spy whose stream yields `delta` forever.
    ///
    /// Used to prove the session folds nothing after `stop()` even when the
    /// provider keeps sending.
    pub fn endless(delta: impl Into<String>) -> Self {
        Self {
            turns: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            endless_delta: Some(delta.into()),
        }
    }

    /// All calls made so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .expect("ScriptedTransport calls lock poisoned")
            .clone()
    }
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    /// Record the call and return the next scripted turn as a stream.
    ///
    /// # Errors
    ///
    /// Never fails; an exhausted script yields a bare `Done`.
    async fn open(&self, history: &[Message], input: &UserInput) -> Result<DeltaStream> {
        self.calls
            .lock()
            .map_err(|_| FitsageError::Transport("ScriptedTransport lock poisoned".to_string()))?
            .push(RecordedCall {
                history_len: history.len(),
                input_text: input.text.clone(),
                attachment_names: input
                    .attachments
                    .iter()
                    .map(|a| a.filename.clone())
                    .collect(),
            });

        if let Some(ref delta) = self.endless_delta {
            let delta = delta.clone();
            // Yield between items so consumers driving this stream can still
            // be timed out or cancelled from the same task.
            return Ok(Box::pin(futures::stream::unfold(delta, |delta| async {
                tokio::task::yield_now().await;
                let event = DeltaEvent::TextDelta(delta.clone());
                Some((event, delta))
            })));
        }

        let events = self
            .turns
            .lock()
            .map_err(|_| FitsageError::Transport("ScriptedTransport lock poisoned".to_string()))?
            .pop_front()
            .unwrap_or_else(|| vec![DeltaEvent::Done]);

        Ok(Box::pin(futures::stream::iter(events)))
    }
}
