//! Domain layer - core types shared by every other layer.
//!
//! This layer contains pure models, settings and error types
//! without any I/O.

pub mod error;
pub mod models;
pub mod settings;

pub use error::{AppError, MathError, RemoteFailure, Result};
pub use models::{
    generate_title, ChatMessage, EvalOutcome, ModelSelector, Reply, ResponsePayload,
    ResponseSource, Role, Transcript,
};
pub use settings::{AppConfig, ChatConfig, RemoteConfig};
