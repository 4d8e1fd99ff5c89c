use serde::{Deserialize, Serialize};

/// Body of `POST {baseUrl}/chat`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest<'a> {
    pub agent_id: &'a str,
    pub session_id: &'a str,
    pub message: &'a str,
}

/// Classification of a decoded stream chunk by its `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Content,
    /// Tool invocation markers. Parsed, then dropped until the widget can
    /// render tool activity.
    ToolCall,
    Other,
}

/// One decoded `data: <json>` payload from the chat stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamChunk {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl StreamChunk {
    #[must_use]
    pub fn classify(&self) -> ChunkKind {
        match self.kind.as_str() {
            "content" => ChunkKind::Content,
            "tool_call" | "tool_calls" => ChunkKind::ToolCall,
            _ => ChunkKind::Other,
        }
    }

    /// The text delta carried by this chunk, if it should reach the UI.
    ///
    /// Only `content` chunks with non-empty text qualify.
    #[must_use]
    pub fn content_delta(&self) -> Option<&str> {
        if self.classify() != ChunkKind::Content {
            return None;
        }
        self.content.as_deref().filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(json: &str) -> StreamChunk {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_content_chunk_yields_delta() {
        let parsed = chunk(r#"{"type":"content","content":"Hel"}"#);
        assert_eq!(parsed.classify(), ChunkKind::Content);
        assert_eq!(parsed.content_delta(), Some("Hel"));
    }

    #[test]
    fn test_empty_or_missing_content_is_dropped() {
        assert_eq!(chunk(r#"{"type":"content","content":""}"#).content_delta(), None);
        assert_eq!(chunk(r#"{"type":"content"}"#).content_delta(), None);
    }

    #[test]
    fn test_tool_call_chunk_is_recognised_but_not_forwarded() {
        let parsed = chunk(r#"{"type":"tool_call","name":"lookup","content":"x"}"#);
        assert_eq!(parsed.classify(), ChunkKind::ToolCall);
        assert_eq!(parsed.content_delta(), None);
    }

    #[test]
    fn test_chat_request_wire_shape() {
        let body = serde_json::to_value(ChatRequest {
            agent_id: "agent-1",
            session_id: "s-1",
            message: "hello",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"agentId": "agent-1", "sessionId": "s-1", "message": "hello"})
        );
    }
}
