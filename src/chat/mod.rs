mod controller;
pub mod log;

pub use controller::{ChatController, SendOutcome, ERROR_MESSAGE};
pub use log::{ConversationLog, LogEvent, MessageId};
