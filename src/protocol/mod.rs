pub mod agent_config;
pub mod chunk;
pub mod message;

pub use agent_config::AgentConfig;
pub use chunk::{ChatRequest, ChunkKind, StreamChunk};
pub use message::{Message, Role};
