//! Chat adapters binding the conversation to a terminal or HTTP.

pub mod cli;
pub mod http;

pub use cli::CliChannel;
pub use http::{ChatRouteState, chat_routes};
