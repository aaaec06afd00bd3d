//! Fixed-pace reveal of streamed text.
//!
//! The network side pushes characters as fast as they arrive; a single
//! task pops them no faster than one per interval and appends each to the
//! shared display buffer. Closing the sender ends production, and
//! [`TypingHandle::drained`] resolves once every queued character has been
//! shown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::ChatError;

/// Default delay between revealed characters.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(20);

/// Shortest delay the reveal task will use; `tokio::time::interval` rejects zero.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Producer side of the character queue.
pub struct CharSender {
    tx: mpsc::UnboundedSender<char>,
}

impl CharSender {
    /// Queue every character of `text` in order. Returns how many were queued.
    pub fn push_str(&self, text: &str) -> Result<usize, ChatError> {
        let mut queued = 0;
        for ch in text.chars() {
            self.tx.send(ch).map_err(|_| ChatError::Cancelled)?;
            queued += 1;
        }
        Ok(queued)
    }

    /// End production. Already queued characters are still revealed.
    pub fn close(self) {}
}

/// Consumer side: owns the reveal task. Dropping it cancels the task.
pub struct TypingHandle {
    task: Option<JoinHandle<usize>>,
}

impl TypingHandle {
    /// Wait until production has ended and the queue is empty.
    /// Returns the number of characters revealed.
    pub async fn drained(mut self) -> Result<usize, ChatError> {
        let Some(task) = self.task.take() else {
            return Err(ChatError::Cancelled);
        };
        task.await.map_err(|e| {
            if !e.is_cancelled() {
                warn!(error = %e, "typing task failed");
            }
            ChatError::Cancelled
        })
    }

    pub fn abort(&self) {
        if let Some(ref task) = self.task {
            task.abort();
        }
    }
}

impl Drop for TypingHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Start a reveal task writing into `display`.
///
/// The display buffer is emptied first, so a turn never starts with
/// characters left over from a previous one. Intervals below
/// [`MIN_INTERVAL`] are raised to it.
pub fn spawn(interval: Duration, display: Arc<watch::Sender<String>>) -> (CharSender, TypingHandle) {
    let interval = interval.max(MIN_INTERVAL);
    let (tx, rx) = mpsc::unbounded_channel();
    display.send_replace(String::new());
    let task = tokio::spawn(reveal(rx, display, interval));
    (CharSender { tx }, TypingHandle { task: Some(task) })
}

async fn reveal(
    mut rx: mpsc::UnboundedReceiver<char>,
    display: Arc<watch::Sender<String>>,
    interval: Duration,
) -> usize {
    let mut ticker = tokio::time::interval(interval);
    // After an idle gap, resume one interval at a time instead of bursting.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut revealed = 0;
    while let Some(ch) = rx.recv().await {
        ticker.tick().await;
        display.send_modify(|buf| buf.push(ch));
        revealed += 1;
    }

    debug!(revealed, "typing queue drained");
    revealed
}
