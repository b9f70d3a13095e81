//! Conversation sessions: message model, attachment validation, and the
//! state machine that folds streamed responses into history.

pub mod attachments;
pub mod message;
pub mod state;

pub use attachments::{Attachment, MAX_ATTACHMENT_BYTES};
pub use message::{Message, MessageId, Part, Role, UserInput};
pub use state::{ChatSession, SessionStatus, StopHandle, TurnOutcome};
