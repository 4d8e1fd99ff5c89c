pub mod chat;
pub mod config;
pub mod error;
pub mod observability;
pub mod protocol;
pub mod session;
pub mod stream;
pub mod transport;
pub mod widget;
