//! Conversation layer: the state machine and the pure helpers it drives.

pub mod bot;
pub mod format;
pub mod menu;
pub mod parse;
pub mod prompts;
pub mod state;
pub mod validate;

pub use bot::Chatbot;
pub use menu::{MenuAction, UpdateField, is_restart_command};
pub use state::{ConversationState, Session};
