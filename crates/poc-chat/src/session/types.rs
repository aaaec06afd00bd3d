//! Turn state and the guard that restores it.

use tokio::sync::watch;

/// Where the session is within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    /// Ready for input.
    #[default]
    Idle,
    /// Request sent, no content yet. The UI shows a typing indicator.
    WaitingForFirstToken,
    /// Content is arriving and being revealed.
    Streaming,
    /// Stream finished and fully revealed; the reply is being recorded.
    Committing,
}

impl TurnState {
    /// Whether the input should be accepting a new message.
    pub fn accepts_input(self) -> bool {
        self == TurnState::Idle
    }
}

/// Returns the session to `Idle` with an empty display buffer when the turn
/// ends, including when the turn future is dropped part way through.
pub(super) struct TurnGuard<'a> {
    state: &'a watch::Sender<TurnState>,
    display: &'a watch::Sender<String>,
}

impl<'a> TurnGuard<'a> {
    pub(super) fn begin(
        state: &'a watch::Sender<TurnState>,
        display: &'a watch::Sender<String>,
    ) -> Self {
        display.send_replace(String::new());
        state.send_replace(TurnState::WaitingForFirstToken);
        Self { state, display }
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        self.display.send_replace(String::new());
        self.state.send_replace(TurnState::Idle);
    }
}
