pub mod sse;
pub mod utf8;

pub use sse::{classify_line, LineBuffer, LineEvent, DATA_PREFIX, DONE_SENTINEL};
pub use utf8::Utf8StreamDecoder;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};

use crate::error::WidgetError;
use crate::protocol::ChunkKind;

/// Counters describing one decoded chat stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Content deltas handed to the callback.
    pub content_chunks: usize,
    /// Tool-call chunks that were recognised and dropped.
    pub tool_call_chunks: usize,
    /// Well-formed chunks of any other type, or content chunks with no text.
    pub ignored_chunks: usize,
    /// `data: ` lines whose payload was not a valid chunk.
    pub malformed_lines: usize,
    pub saw_done: bool,
    /// Bytes left unterminated when the source ended; never delivered.
    pub discarded_tail_bytes: usize,
}

/// Turns raw response bytes into content deltas.
///
/// Owns the single UTF-8 decoder and line buffer for one response, so
/// characters and lines split across reads are reassembled.
#[derive(Debug, Default)]
pub struct ContentDecoder {
    utf8: Utf8StreamDecoder,
    lines: LineBuffer,
    scratch: String,
    summary: StreamSummary,
}

impl ContentDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one network read, invoking `on_delta` for each content
    /// fragment completed by it.
    pub fn push<F: FnMut(&str)>(&mut self, bytes: &[u8], on_delta: &mut F) {
        self.scratch.clear();
        self.utf8.decode_into(bytes, &mut self.scratch);

        let summary = &mut self.summary;
        self.lines
            .feed(&self.scratch, |line| apply_line(line, summary, on_delta));
    }

    /// Finish the stream. Unterminated text is dropped.
    #[must_use]
    pub fn finish(mut self) -> StreamSummary {
        let discarded = self.lines.pending().len() + self.utf8.pending_len();
        if discarded > 0 {
            tracing::debug!(
                discarded_bytes = discarded,
                "discarding unterminated tail of chat stream"
            );
        }
        self.summary.discarded_tail_bytes = discarded;
        self.summary
    }
}

fn apply_line<F: FnMut(&str)>(line: &str, summary: &mut StreamSummary, on_delta: &mut F) {
    match classify_line(line) {
        LineEvent::Ignored => {}
        LineEvent::Done => {
            summary.saw_done = true;
            tracing::debug!("chat stream sent [DONE]; reading until end of input");
        }
        LineEvent::Malformed { payload, error } => {
            summary.malformed_lines += 1;
            tracing::warn!(%error, payload, "skipping malformed chat stream chunk");
        }
        LineEvent::Chunk(chunk) => match chunk.classify() {
            ChunkKind::Content => match chunk.content_delta() {
                Some(delta) => {
                    summary.content_chunks += 1;
                    on_delta(delta);
                }
                None => summary.ignored_chunks += 1,
            },
            ChunkKind::ToolCall => {
                summary.tool_call_chunks += 1;
                tracing::debug!("tool call chunk received; tool activity is not rendered");
            }
            ChunkKind::Other => {
                summary.ignored_chunks += 1;
                tracing::debug!(kind = %chunk.kind, "ignoring chat stream chunk");
            }
        },
    }
}

/// Read `byte_stream` to completion, invoking `on_delta` for every content
/// fragment in arrival order.
///
/// `[DONE]` does not end the read; only the end of the byte stream does.
///
/// # Errors
///
/// Returns the source's error, converted to [`WidgetError`], when a read
/// fails. Deltas delivered before the failure stay delivered.
pub async fn read_content_stream<S, E, F>(
    byte_stream: S,
    mut on_delta: F,
) -> Result<StreamSummary, WidgetError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<WidgetError>,
    F: FnMut(&str),
{
    let mut byte_stream = std::pin::pin!(byte_stream);
    let mut decoder = ContentDecoder::new();

    while let Some(chunk) = byte_stream.next().await {
        let bytes = chunk.map_err(Into::into)?;
        decoder.push(&bytes, &mut on_delta);
    }

    Ok(decoder.finish())
}
