pub mod errors;
pub mod id;
pub mod notices;

pub use errors::{ConfigError, PocError};
pub use id::{new_request_id, ConversationId};
pub use notices::{Notice, NoticeBoard, NoticeLevel};

pub type Result<T> = std::result::Result<T, PocError>;
