//! Streaming chat client for the Proof of Concept assistant.
//!
//! Consumes the chat endpoint's server-sent-event stream and reveals the
//! reply at a steady typing pace:
//! - `lines`: byte stream to complete text lines
//! - `sse`: line classification and payload decoding
//! - `typing`: fixed-pace character reveal with a drain barrier
//! - `session`: the per-conversation turn state machine
//! - `transport` / `leads`: HTTP clients for the chat and lead endpoints

pub mod leads;
pub mod lines;
pub mod session;
pub mod sse;
pub mod transport;
pub mod typing;

#[cfg(test)]
pub(crate) mod test_support;

pub use leads::{HttpLeadSink, Lead, LeadSink};
pub use lines::LineReader;
pub use session::{ChatSession, TurnState};
pub use sse::{parse_line, ChatChunk, SseLine};
pub use transport::{ByteStream, ChatRequest, ChatTransport, EndpointConfig, HttpTransport};

/// One finalized turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Lead rejected: {0}")]
    Lead(String),
    #[error("Turn cancelled")]
    Cancelled,
}

impl ChatError {
    /// Failures of the request or the response body, as opposed to local
    /// validation or cancellation.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ChatError::Api(_) | ChatError::RateLimited | ChatError::Network(_)
        )
    }
}
