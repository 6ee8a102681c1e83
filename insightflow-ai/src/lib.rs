//! AI collaborator boundary
//!
//! The two AI operations (form generation from a free-text goal, and
//! feedback analysis over a form plus its responses) are external
//! collaborators behind the `AiClient` trait. The HTTP implementation
//! talks to an OpenAI-compatible JSON-mode chat-completions endpoint.
//! Responses are validated strictly: anything that does not match the
//! expected shape is a hard failure, and nothing is committed from a
//! failed call.

pub mod client;
pub mod error;
pub mod prompts;
pub mod types;

pub use client::{AiClient, HttpAiClient, MockAiClient};
pub use error::{AiError, AiResult};
pub use types::{GeneratedField, GeneratedForm};
