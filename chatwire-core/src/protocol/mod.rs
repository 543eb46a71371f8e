//! Protocol module for conversation and result structures
//!
//! This module defines the canonical data models shared by every backend.
//! These structures are designed to be:
//! - Provider-agnostic
//! - Cheap to read from the conversion layer
//! - Serializable, so callers can persist their own history

pub mod events;
pub mod types;

pub use events::{ProviderEvent, ProviderResponse, TokenUsage};
pub use types::{
    clean_messages, BinaryContent, ContentPart, FinishReason, Message, MessageRole, ToolCall,
    ToolResult,
};
