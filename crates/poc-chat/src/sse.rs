//! Classification of chat stream lines.
//!
//! The chat endpoint sends one JSON record per `data: ` line. Blank lines,
//! `:` comments, other SSE fields and the `[DONE]` sentinel carry nothing
//! the client needs.

use serde::Deserialize;

pub const DATA_PREFIX: &str = "data: ";
pub const DONE_SENTINEL: &str = "[DONE]";

/// Payload of a `data: ` record. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatChunk {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, rename = "conversationId")]
    pub conversation_id: Option<String>,
}

/// What a single complete line means to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine {
    /// Blank line, comment, keep-alive or non-data field.
    Ignored,
    /// Explicit end marker. The reader's own end of stream is authoritative.
    Done,
    Chunk(ChatChunk),
    /// A data record whose payload did not decode. Skip it and carry on.
    Malformed { payload: String, reason: String },
}

pub fn parse_line(line: &str) -> SseLine {
    if line.is_empty() || line.starts_with(':') {
        return SseLine::Ignored;
    }
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return SseLine::Ignored;
    };

    let payload = payload.trim();
    if payload == DONE_SENTINEL {
        return SseLine::Done;
    }

    match serde_json::from_str::<ChatChunk>(payload) {
        Ok(chunk) => SseLine::Chunk(chunk),
        Err(e) => SseLine::Malformed {
            payload: payload.to_string(),
            reason: e.to_string(),
        },
    }
}
