//! ChatSession struct and conversation accessors.

use std::sync::Arc;
use std::time::Duration;

use poc_common::ConversationId;
use tokio::sync::watch;
use tracing::debug;

use crate::typing::DEFAULT_INTERVAL;
use crate::Message;

use super::types::TurnState;

/// One visitor's conversation with the assistant.
pub struct ChatSession {
    /// Finalized messages, append-only while the session lives.
    pub(super) transcript: Vec<Message>,
    /// Backend conversation id. Written once, then echoed on every request.
    pub(super) conversation_id: Option<ConversationId>,
    /// Delay between revealed characters.
    pub(super) typing_interval: Duration,
    pub(super) state: watch::Sender<TurnState>,
    /// The in-flight reply as revealed so far.
    pub(super) display: Arc<watch::Sender<String>>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            transcript: Vec::new(),
            conversation_id: None,
            typing_interval: DEFAULT_INTERVAL,
            state: watch::channel(TurnState::Idle).0,
            display: Arc::new(watch::channel(String::new()).0),
        }
    }

    pub fn with_typing_interval(mut self, interval: Duration) -> Self {
        self.typing_interval = interval;
        self
    }

    /// Adopt `id` unless an id is already set. Returns whether it was adopted.
    pub(super) fn adopt_conversation_id(slot: &mut Option<ConversationId>, id: String) -> bool {
        if slot.is_some() {
            return false;
        }
        debug!(conversation_id = %id, "conversation id assigned");
        *slot = Some(ConversationId::from(id));
        true
    }

    /// Get the full conversation transcript.
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn conversation_id(&self) -> Option<&ConversationId> {
        self.conversation_id.as_ref()
    }

    pub fn state(&self) -> TurnState {
        *self.state.borrow()
    }

    /// Watch turn state changes (for typing indicators and input enabling).
    pub fn subscribe_state(&self) -> watch::Receiver<TurnState> {
        self.state.subscribe()
    }

    /// Watch the in-flight reply grow one character at a time.
    pub fn subscribe_display(&self) -> watch::Receiver<String> {
        self.display.subscribe()
    }

    /// Start a new conversation: forget the transcript and the backend id.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.conversation_id = None;
        self.display.send_replace(String::new());
    }

    /// Number of messages in the transcript.
    pub fn message_count(&self) -> usize {
        self.transcript.len()
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
