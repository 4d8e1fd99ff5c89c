/// Incremental UTF-8 decoder carried across network reads.
///
/// A multi-byte character split across two reads is held back until its
/// remaining bytes arrive. Invalid sequences decode to U+FFFD, and a
/// byte-order mark at the very start of the stream is dropped.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
    started: bool,
}

impl Utf8StreamDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes` and append the text that is complete so far to `out`.
    pub fn decode_into(&mut self, bytes: &[u8], out: &mut String) {
        let start = out.len();
        if self.pending.is_empty() {
            let rest = decode_complete_prefix(bytes, out);
            self.pending.extend_from_slice(rest);
        } else {
            self.pending.extend_from_slice(bytes);
            let remaining = decode_complete_prefix(&self.pending, out).len();
            let consumed = self.pending.len() - remaining;
            self.pending.drain(..consumed);
        }

        if !self.started && out.len() > start {
            self.started = true;
            if out[start..].starts_with(BOM) {
                out.replace_range(start..start + BOM.len_utf8(), "");
            }
        }
    }

    /// Bytes of an incomplete trailing character still waiting for input.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

const BOM: char = '\u{FEFF}';

/// Push every decodable character of `input` into `out`, returning the
/// incomplete tail that needs more bytes.
fn decode_complete_prefix<'a>(mut input: &'a [u8], out: &mut String) -> &'a [u8] {
    loop {
        match std::str::from_utf8(input) {
            Ok(text) => {
                out.push_str(text);
                return &[];
            }
            Err(err) => {
                let (valid, rest) = input.split_at(err.valid_up_to());
                if let Ok(text) = std::str::from_utf8(valid) {
                    out.push_str(text);
                }
                match err.error_len() {
                    Some(invalid_len) => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        input = &rest[invalid_len..];
                    }
                    None => return rest,
                }
            }
        }
    }
}
