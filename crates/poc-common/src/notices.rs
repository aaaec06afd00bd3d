use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A short message shown to the visitor outside the transcript, such as
/// "the assistant is unavailable, please try again".
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl Notice {
    /// Informational notice, visible for 5 seconds.
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            body: body.into(),
            created_at: Instant::now(),
            ttl: Duration::from_secs(5),
        }
    }

    /// Error notice, visible for 10 seconds.
    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            body: body.into(),
            created_at: Instant::now(),
            ttl: Duration::from_secs(10),
        }
    }

    /// The generic notice for a failed chat turn. The underlying cause is
    /// logged, not shown.
    pub fn turn_failed() -> Self {
        Self::error(
            "Message not sent",
            "The assistant is unavailable right now. Please try again.",
        )
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }
}

/// Bounded list of live notices. Expired entries are dropped lazily.
#[derive(Debug)]
pub struct NoticeBoard {
    items: VecDeque<Notice>,
    capacity: usize,
}

impl NoticeBoard {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Post a notice. When full, the oldest one is dropped.
    pub fn post(&mut self, notice: Notice) {
        self.evict_expired();
        if self.items.len() >= self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(notice);
    }

    /// Remove and return all live notices, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.evict_expired();
        self.items.drain(..).collect()
    }

    fn evict_expired(&mut self) {
        self.items.retain(|n| !n.is_expired());
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(8)
    }
}
