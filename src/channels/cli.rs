//! CLI channel: stdin/stdout REPL for local use.
//!
//! A line without a `Key: Value` shape is sent on its own. A `Key: Value`
//! line starts a block that is sent when an empty line is entered, so the
//! multi-line forms can be typed naturally.

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::chat::{Chatbot, is_restart_command};

/// What the REPL should do after reading a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliInput {
    /// A complete message to hand to the bot.
    Message(String),
    /// Inside a block; keep reading.
    Pending,
    /// Blank line with nothing buffered.
    Empty,
    Quit,
}

/// Groups `Key: Value` lines into one message.
#[derive(Debug, Default)]
pub struct MessageBuffer {
    lines: Vec<String>,
}

impl MessageBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: &str) -> CliInput {
        let trimmed = line.trim();

        if !self.lines.is_empty() {
            if trimmed.is_empty() {
                return CliInput::Message(std::mem::take(&mut self.lines).join("\n"));
            }
            self.lines.push(trimmed.to_string());
            return CliInput::Pending;
        }

        if trimmed.is_empty() {
            return CliInput::Empty;
        }
        if trimmed.eq_ignore_ascii_case("/quit") || trimmed.eq_ignore_ascii_case("/exit") {
            return CliInput::Quit;
        }
        if opens_block(trimmed) {
            self.lines.push(trimmed.to_string());
            return CliInput::Pending;
        }
        CliInput::Message(trimmed.to_string())
    }

    /// Whatever is still buffered, e.g. at end of input.
    pub fn flush(&mut self) -> Option<String> {
        if self.lines.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.lines).join("\n"))
        }
    }
}

/// `First Name: John` opens a block; `09:00 AM - 11:00 AM` does not.
fn opens_block(line: &str) -> bool {
    line.split_once(':')
        .is_some_and(|(key, _)| key.chars().any(char::is_alphabetic))
}

/// A single local conversation over stdin/stdout.
pub struct CliChannel {
    bot: Chatbot,
}

impl CliChannel {
    pub fn new(bot: Chatbot) -> Self {
        Self { bot }
    }

    /// Run until `/quit` or end of input.
    pub async fn run(mut self) -> std::io::Result<()> {
        let greeting = self.bot.process("start").await;
        println!("\n{greeting}\n");
        eprint!("> ");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut buffer = MessageBuffer::new();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Error reading stdin: {}", e);
                    break;
                }
            };

            match buffer.push(&line) {
                CliInput::Message(message) => {
                    let reply = self.turn(&message).await;
                    println!("\n{reply}\n");
                    eprint!("> ");
                }
                CliInput::Pending => eprint!(".. "),
                CliInput::Empty => eprint!("> "),
                CliInput::Quit => break,
            }
        }

        if let Some(message) = buffer.flush() {
            let reply = self.turn(&message).await;
            println!("\n{reply}\n");
        }
        Ok(())
    }

    async fn turn(&mut self, message: &str) -> String {
        if is_restart_command(message) {
            return self.bot.restart();
        }
        self.bot.process(message).await
    }
}
