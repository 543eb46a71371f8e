//! OpenAI provider implementation
//!
//! Translates chatwire's conversation types to the OpenAI chat-completions
//! format and back. Any backend that speaks this format reuses the client.

mod client;
pub mod converter;
mod streaming;
pub mod types;

pub use client::{OpenAIClient, OPENAI_BASE_URL};
pub use types::{OpenAIRequest, OpenAIResponse, OpenAIStreamChunk};
