//! Running a single turn: request, stream, reveal, commit.

use std::sync::Arc;
use std::time::Duration;

use poc_common::{new_request_id, ConversationId};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::lines::LineReader;
use crate::sse::{parse_line, SseLine};
use crate::transport::{ChatRequest, ChatTransport};
use crate::typing;
use crate::{ChatError, Message};

use super::manager::ChatSession;
use super::types::{TurnGuard, TurnState};

impl ChatSession {
    /// Send a user message and wait for the assistant's reply.
    ///
    /// The user message is recorded immediately. The reply is recorded only
    /// once the stream has ended and every character has been revealed; on
    /// failure nothing but the user message remains. Dropping the returned
    /// future abandons the turn and resets the session to `Idle`.
    pub async fn submit(
        &mut self,
        transport: &dyn ChatTransport,
        text: impl Into<String>,
    ) -> Result<Message, ChatError> {
        let text = text.into();
        let request_id = new_request_id();

        self.transcript.push(Message::user(text.clone()));
        let _guard = TurnGuard::begin(&self.state, &self.display);

        let request = ChatRequest {
            message: text,
            conversation_id: self.conversation_id.clone(),
        };
        info!(
            request_id = %request_id,
            conversation_id = ?request.conversation_id.as_ref().map(ConversationId::as_str),
            "chat turn started"
        );

        let outcome = stream_reply(
            transport,
            &request,
            &mut self.conversation_id,
            &self.state,
            Arc::clone(&self.display),
            self.typing_interval,
            &request_id,
        )
        .await;

        match outcome {
            Ok(content) => {
                self.state.send_replace(TurnState::Committing);
                let reply = Message::assistant(content);
                self.transcript.push(reply.clone());
                info!(request_id = %request_id, chars = reply.content.chars().count(), "chat turn committed");
                Ok(reply)
            }
            Err(e) => {
                warn!(request_id = %request_id, error = %e, "chat turn failed");
                Err(e)
            }
        }
    }
}

/// Read the response stream to the end and wait for the reveal to finish.
/// Returns the full reply text.
async fn stream_reply(
    transport: &dyn ChatTransport,
    request: &ChatRequest,
    conversation_id: &mut Option<ConversationId>,
    state: &watch::Sender<TurnState>,
    display: Arc<watch::Sender<String>>,
    interval: Duration,
    request_id: &str,
) -> Result<String, ChatError> {
    let body = transport.open_stream(request).await?;
    let (chars, typing) = typing::spawn(interval, display);

    let mut lines = LineReader::from_byte_stream(body);
    let mut content = String::new();
    let mut streaming = false;

    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            SseLine::Ignored | SseLine::Done => {}
            SseLine::Malformed { payload, reason } => {
                warn!(request_id, %reason, %payload, "skipping malformed stream record");
            }
            SseLine::Chunk(chunk) => {
                if let Some(id) = chunk.conversation_id {
                    if !ChatSession::adopt_conversation_id(conversation_id, id) {
                        debug!(request_id, "ignoring repeated conversation id");
                    }
                }
                if let Some(text) = chunk.content.filter(|t| !t.is_empty()) {
                    if !streaming {
                        streaming = true;
                        state.send_replace(TurnState::Streaming);
                        debug!(request_id, "first content received");
                    }
                    chars.push_str(&text)?;
                    content.push_str(&text);
                }
            }
        }
    }

    chars.close();
    let revealed = typing.drained().await?;
    debug!(request_id, revealed, "stream ended and reveal finished");

    if content.is_empty() {
        return Err(ChatError::Parse("stream ended without any content".into()));
    }
    Ok(content)
}
