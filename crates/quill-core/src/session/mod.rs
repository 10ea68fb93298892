//! Conversation state: messages, history, and session labels.

pub mod history;
pub mod label;
pub mod message;

pub use history::ConversationHistory;
pub use label::generate_session_label;
pub use message::{ConversationMessage, MessageRole};
