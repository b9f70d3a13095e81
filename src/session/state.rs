//! Conversation state machine
//!
//! `ChatSession` owns the ordered message list and the session status, and
//! routes every mutation through its operations: send, stop, edit and
//! resend, regenerate. One outstanding response per session; concurrent
//! sends are rejected at this boundary rather than trusted to the caller.
//!
//! Status lifecycle per turn:
//!
//! ```text
//! Ready --send--> Submitted --first delta--> Streaming --Done--> Ready
//!                     |                          |
//!                     +-------- Error -----------+--> Error (partial kept)
//!                     +-------- stop() ----------+--> Ready (partial kept)
//! ```

use std::sync::Arc;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{FitsageError, Result};
use crate::session::message::{Message, MessageId, UserInput};
use crate::transport::{DeltaEvent, Transport};

/// Where the session is in its turn lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Idle; a new turn may start
    Ready,
    /// A turn was sent; no delta received yet
    Submitted,
    /// Deltas are being folded into the assistant message
    Streaming,
    /// The last turn ended with a provider error; partial content retained
    Error,
}

/// How a turn ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The stream finished normally
    Completed,
    /// The user stopped the stream; partial content was kept
    Stopped,
    /// The provider reported an error; partial content was kept
    Failed(String),
}

/// Cloneable handle that cancels the in-flight turn
///
/// Stopping is cooperative: the fold loop checks the token before applying
/// each delta, so a delta in flight at cancellation time is discarded.
/// Stopping when no turn is in flight is a no-op.
#[derive(Debug, Clone)]
pub struct StopHandle(CancellationToken);

impl StopHandle {
    pub fn stop(&self) {
        self.0.cancel();
    }
}

/// A single conversation backed by one transport
pub struct ChatSession {
    transport: Arc<dyn Transport>,
    messages: Vec<Message>,
    status: SessionStatus,
    cancel: CancellationToken,
}

impl ChatSession {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            messages: Vec::new(),
            status: SessionStatus::Ready,
            cancel: CancellationToken::new(),
        }
    }

    /// Where the session is in its turn lifecycle.
    ///
    /// Every operation takes `&mut self`, so an in-flight status observed
    /// from outside means the turn future was dropped before it settled.
    /// Once `stop()` has been requested such a turn counts as stopped.
    pub fn status(&self) -> SessionStatus {
        if self.turn_was_abandoned() {
            SessionStatus::Ready
        } else {
            self.status
        }
    }

    fn turn_was_abandoned(&self) -> bool {
        matches!(
            self.status,
            SessionStatus::Submitted | SessionStatus::Streaming
        ) && self.cancel.is_cancelled()
    }

    /// Finalize a stopped turn whose future was dropped mid-stream:
    /// partial content is kept, an empty placeholder is removed, and the
    /// token is re-armed, exactly as if the fold loop had seen the stop.
    fn settle_abandoned_turn(&mut self) {
        if !self.turn_was_abandoned() {
            return;
        }
        if self
            .messages
            .last()
            .is_some_and(|m| m.is_assistant() && m.parts.is_empty())
        {
            self.messages.pop();
        }
        self.status = SessionStatus::Ready;
        self.cancel = CancellationToken::new();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Handle that stops the current (or next) turn.
    ///
    /// Handles are per-turn: after a stopped turn the session re-arms, so a
    /// stale handle does not pre-cancel later turns. Requesting a handle
    /// also settles a previously stopped-and-abandoned turn, so the handle
    /// always controls the turn that comes next.
    pub fn stop_handle(&mut self) -> StopHandle {
        self.settle_abandoned_turn();
        StopHandle(self.cancel.clone())
    }

    /// Text content of a message, for copying. Read-only.
    pub fn message_text(&self, id: MessageId) -> Option<String> {
        self.messages.iter().find(|m| m.id == id).map(Message::text)
    }

    /// Drop the whole conversation.
    ///
    /// # Errors
    ///
    /// Rejected while a turn is in flight.
    pub fn clear(&mut self) -> Result<()> {
        self.gate()?;
        self.messages.clear();
        self.status = SessionStatus::Ready;
        Ok(())
    }

    fn gate(&mut self) -> Result<()> {
        self.settle_abandoned_turn();
        match self.status {
            SessionStatus::Submitted | SessionStatus::Streaming => Err(FitsageError::Session(
                "a response is already in flight".to_string(),
            )
            .into()),
            SessionStatus::Ready | SessionStatus::Error => Ok(()),
        }
    }

    /// Send a user turn and fold the streamed response.
    ///
    /// Appends the user message and an assistant placeholder, opens one
    /// transport stream, and folds deltas in receipt order. The observer is
    /// invoked for every folded content event so callers can render
    /// incrementally.
    ///
    /// # Errors
    ///
    /// Returns an error for caller mistakes that leave the session
    /// untouched: a turn already in flight, or empty input with no files.
    /// Turn-level failures (request refused, provider error event) are
    /// reported as `TurnOutcome::Failed` with status `Error`.
    pub async fn send<F>(&mut self, input: UserInput, observer: F) -> Result<TurnOutcome>
    where
        F: FnMut(&DeltaEvent),
    {
        self.gate()?;
        if input.is_empty() {
            return Err(FitsageError::Session(
                "nothing to send: empty message with no attachments".to_string(),
            )
            .into());
        }

        let history_len = self.messages.len();
        self.messages.push(Message::user(input.text.clone(), &input.attachments));
        self.messages.push(Message::assistant_placeholder());
        self.status = SessionStatus::Submitted;

        debug!(history_len, "turn submitted");

        let open_result = {
            let transport = Arc::clone(&self.transport);
            let history = &self.messages[..history_len];
            transport.open(history, &input).await
        };
        let stream = match open_result {
            Ok(stream) => stream,
            Err(err) => {
                warn!("transport open failed: {err:#}");
                self.status = SessionStatus::Error;
                return Ok(TurnOutcome::Failed(err.to_string()));
            }
        };

        Ok(self.fold(stream, observer).await)
    }

    /// Fold one delta stream into the trailing assistant message.
    async fn fold<F>(
        &mut self,
        mut stream: crate::transport::DeltaStream,
        mut observer: F,
    ) -> TurnOutcome
    where
        F: FnMut(&DeltaEvent),
    {
        let cancel = self.cancel.clone();
        let outcome = loop {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => break TurnOutcome::Stopped,
                event = stream.next() => event,
            };
            match event {
                Some(DeltaEvent::TextDelta(delta)) => {
                    self.status = SessionStatus::Streaming;
                    if let Some(last) = self.messages.last_mut() {
                        last.append_text_delta(&delta);
                    }
                    observer(&DeltaEvent::TextDelta(delta));
                }
                Some(DeltaEvent::File {
                    url,
                    filename,
                    media_type,
                }) => {
                    self.status = SessionStatus::Streaming;
                    if let Some(last) = self.messages.last_mut() {
                        last.parts.push(crate::session::message::Part::File {
                            url: url.clone(),
                            filename: filename.clone(),
                            media_type: media_type.clone(),
                        });
                    }
                    observer(&DeltaEvent::File {
                        url,
                        filename,
                        media_type,
                    });
                }
                Some(DeltaEvent::Error(text)) => break TurnOutcome::Failed(text),
                Some(DeltaEvent::Done) | None => break TurnOutcome::Completed,
            }
        };
        // Dropping the stream here is what closes the underlying connection.
        drop(stream);

        match &outcome {
            TurnOutcome::Completed => {
                self.status = SessionStatus::Ready;
            }
            TurnOutcome::Stopped => {
                // A stop before any content leaves a partless placeholder;
                // remove it instead of finalizing an empty message.
                if self
                    .messages
                    .last()
                    .is_some_and(|m| m.is_assistant() && m.parts.is_empty())
                {
                    self.messages.pop();
                }
                self.status = SessionStatus::Ready;
                // Re-arm so the consumed token does not pre-cancel the next turn.
                self.cancel = CancellationToken::new();
            }
            TurnOutcome::Failed(text) => {
                warn!("turn failed: {text}");
                self.status = SessionStatus::Error;
            }
        }
        debug!(?outcome, messages = self.messages.len(), "turn finished");
        outcome
    }

    /// Replace a prior user message and resend from that point.
    ///
    /// History is truncated at the edited message's position; its original
    /// attachments are kept with the new text.
    ///
    /// # Errors
    ///
    /// Rejected while a turn is in flight, when the id is unknown, or when
    /// the target is not a user message.
    pub async fn edit_and_resend<F>(
        &mut self,
        id: MessageId,
        new_text: impl Into<String>,
        observer: F,
    ) -> Result<TurnOutcome>
    where
        F: FnMut(&DeltaEvent),
    {
        self.gate()?;
        let index = self
            .messages
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| FitsageError::Session(format!("no message with id {id}")))?;
        if !self.messages[index].is_user() {
            return Err(
                FitsageError::Session("only user messages can be edited".to_string()).into(),
            );
        }

        let input = UserInput::from_message(&self.messages[index], Some(new_text.into()));
        self.messages.truncate(index);
        self.send(input, observer).await
    }

    /// Re-issue the user turn behind an assistant message.
    ///
    /// With no id the last assistant message is the target. The target and
    /// everything after it are replaced by the fresh response, so the
    /// message count does not grow. This is also the retry affordance after
    /// an `Error` turn.
    ///
    /// # Errors
    ///
    /// Rejected while a turn is in flight, when the id does not name an
    /// assistant message, or when no user turn precedes the target.
    pub async fn regenerate<F>(&mut self, id: Option<MessageId>, observer: F) -> Result<TurnOutcome>
    where
        F: FnMut(&DeltaEvent),
    {
        self.gate()?;
        let target = match id {
            Some(id) => self
                .messages
                .iter()
                .position(|m| m.id == id && m.is_assistant())
                .ok_or_else(|| {
                    FitsageError::Session(format!("no assistant message with id {id}"))
                })?,
            None => self
                .messages
                .iter()
                .rposition(Message::is_assistant)
                .ok_or_else(|| {
                    FitsageError::Session("no assistant message to regenerate".to_string())
                })?,
        };
        let user_index = self.messages[..target]
            .iter()
            .rposition(Message::is_user)
            .ok_or_else(|| {
                FitsageError::Session("no user turn precedes that message".to_string())
            })?;

        let input = UserInput::from_message(&self.messages[user_index], None);
        self.messages.truncate(user_index);
        self.send(input, observer).await
    }
}
