//! Chat session service.
//!
//! Owns the transcript and the active model for one conversation and
//! forwards each message to the dispatcher.

use crate::domain::{AppError, ChatMessage, ModelSelector, Reply, Result, Transcript};

use super::dispatcher::Dispatcher;

/// Service for one interactive conversation.
pub struct ChatSession {
    dispatcher: Dispatcher,
    model: ModelSelector,
    max_message_chars: usize,
    transcript: Transcript,
}

impl ChatSession {
    /// Create a new session.
    #[must_use]
    pub fn new(dispatcher: Dispatcher, model: ModelSelector, max_message_chars: usize) -> Self {
        Self {
            dispatcher,
            model,
            max_message_chars,
            transcript: Transcript::new(),
        }
    }

    #[must_use]
    pub const fn model(&self) -> ModelSelector {
        self.model
    }

    pub fn set_model(&mut self, model: ModelSelector) {
        tracing::info!(%model, "Switching model");
        self.model = model;
    }

    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Send a user message and record both sides of the exchange.
    ///
    /// # Errors
    /// Returns error if the message is blank or too long. Nothing is recorded
    /// in that case.
    pub async fn send(&mut self, text: &str) -> Result<Reply> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::InvalidInput {
                message: "Message is empty".into(),
            });
        }

        let length = text.chars().count();
        if length > self.max_message_chars {
            return Err(AppError::InvalidInput {
                message: format!(
                    "Please keep your message under {} characters (got {length}).",
                    self.max_message_chars
                ),
            });
        }

        self.transcript.push(ChatMessage::user(text));
        let reply = self.dispatcher.respond(text, self.model).await;
        self.transcript
            .push(ChatMessage::assistant(reply.text(), self.model));

        Ok(reply)
    }
}
