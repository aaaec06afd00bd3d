//! Conversation session management.
//!
//! A `ChatSession` owns the transcript and the backend conversation id,
//! and drives each turn from submit to commit.

mod manager;
mod turn;
mod types;

#[cfg(test)]
mod tests;

pub use manager::ChatSession;
pub use types::TurnState;
