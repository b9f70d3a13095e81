//! Provider transport layer
//!
//! A transport turns a conversation history plus a new user input into a
//! single stream of delta events. One network call per `open`; the stream
//! is finite, terminated by `Done` or `Error`, and never restarted or
//! retried internally. Dropping the stream cancels the underlying call.

pub mod fake;
pub mod http;
pub mod sse;

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::error::Result;
use crate::session::message::{Message, UserInput};

/// Incremental event from a provider response stream
#[derive(Debug, Clone, PartialEq)]
pub enum DeltaEvent {
    /// A run of response text; deltas concatenate in receipt order
    TextDelta(String),
    /// A file emitted by the provider
    File {
        url: String,
        filename: String,
        media_type: String,
    },
    /// The response completed normally
    Done,
    /// The response failed; terminal, no retry
    Error(String),
}

/// Stream of delta events for one response
pub type DeltaStream = Pin<Box<dyn Stream<Item = DeltaEvent> + Send>>;

/// A conversation transport
///
/// Implementations send the full prior history plus the new input in a
/// single request and expose the incremental response as a `DeltaStream`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open one response stream for the given history and input
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be issued at all (bad
    /// endpoint, connection failure, non-success status). Failures after
    /// the stream opens surface as a terminal `DeltaEvent::Error` instead.
    async fn open(&self, history: &[Message], input: &UserInput) -> Result<DeltaStream>;
}
