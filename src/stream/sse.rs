/// Line-oriented reader for the chat endpoint's `data: <json>` stream.
///
/// Text is split on `\n`; only complete lines are interpreted. The last,
/// possibly partial, fragment stays buffered until more text arrives.
use memchr::memchr_iter;

use crate::protocol::StreamChunk;

/// Prefix a line must start with to carry a payload.
pub const DATA_PREFIX: &str = "data: ";

/// Payload the server sends after the last chunk.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Interpretation of one complete stream line.
#[derive(Debug)]
pub enum LineEvent<'a> {
    /// Not a `data: ` line.
    Ignored,
    /// `data: [DONE]`. Recognised, but reading continues until end of input.
    Done,
    Chunk(StreamChunk),
    Malformed {
        payload: &'a str,
        error: serde_json::Error,
    },
}

/// Classify a complete line (without its line terminator).
#[must_use]
pub fn classify_line(line: &str) -> LineEvent<'_> {
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return LineEvent::Ignored;
    };
    if payload == DONE_SENTINEL {
        return LineEvent::Done;
    }
    match serde_json::from_str::<StreamChunk>(payload) {
        Ok(chunk) => LineEvent::Chunk(chunk),
        Err(error) => LineEvent::Malformed { payload, error },
    }
}

/// Accumulates decoded text and hands out complete lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: String,
}

impl LineBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` and call `on_line` for every line it completes, in order.
    ///
    /// A single trailing `\r` is stripped from each line.
    pub fn feed(&mut self, text: &str, mut on_line: impl FnMut(&str)) {
        let scan_start = self.buffer.len();
        self.buffer.push_str(text);

        let mut line_start = 0usize;
        for rel_pos in memchr_iter(b'\n', &self.buffer.as_bytes()[scan_start..]) {
            let line_end = scan_start + rel_pos;
            let mut line = &self.buffer[line_start..line_end];
            if let Some(stripped) = line.strip_suffix('\r') {
                line = stripped;
            }
            on_line(line);
            line_start = line_end + 1;
        }

        if line_start == self.buffer.len() {
            self.buffer.clear();
        } else if line_start > 0 {
            self.buffer.drain(..line_start);
        }
    }

    /// Text received after the last newline.
    #[must_use]
    pub fn pending(&self) -> &str {
        &self.buffer
    }
}
