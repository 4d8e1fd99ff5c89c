use std::io::{self, Write};

use crate::protocol::{Message, Role};

/// Incremental plain-text renderer for a conversation.
///
/// Each call to [`TranscriptPrinter::render`] writes only what changed since
/// the previous call: new messages get a role prefix, and a growing trailing
/// message gets just its new suffix.
#[derive(Debug, Default)]
pub struct TranscriptPrinter {
    rendered_messages: usize,
    rendered_bytes_of_last: usize,
}

impl TranscriptPrinter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the changes in `messages` to `out`.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    pub fn render(&mut self, messages: &[Message], out: &mut impl Write) -> io::Result<()> {
        if messages.len() < self.rendered_messages {
            self.rendered_messages = messages.len();
            self.rendered_bytes_of_last = messages.last().map_or(0, |last| last.content.len());
        }

        if let Some(index) = self.rendered_messages.checked_sub(1) {
            let content = &messages[index].content;
            if let Some(suffix) = content.get(self.rendered_bytes_of_last..) {
                out.write_all(suffix.as_bytes())?;
            }
            self.rendered_bytes_of_last = content.len();
        }

        for message in &messages[self.rendered_messages..] {
            if self.rendered_messages > 0 {
                out.write_all(b"\n")?;
            }
            write!(out, "{}> {}", role_label(message.role), message.content)?;
            self.rendered_messages += 1;
            self.rendered_bytes_of_last = message.content.len();
        }

        out.flush()
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Assistant => "agent",
        Role::System => "system",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(printer: &mut TranscriptPrinter, messages: &[Message]) -> String {
        let mut out = Vec::new();
        printer.render(messages, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_streams_only_new_text() {
        let mut printer = TranscriptPrinter::new();
        let mut messages = vec![Message::user("hi"), Message::assistant("")];
        assert_eq!(render(&mut printer, &messages), "you> hi\nagent> ");

        messages[1].content.push_str("Hel");
        assert_eq!(render(&mut printer, &messages), "Hel");
        messages[1].content.push_str("lo");
        assert_eq!(render(&mut printer, &messages), "lo");
        assert_eq!(render(&mut printer, &messages), "");
    }

    #[test]
    fn test_retracted_placeholder_slot_is_reused() {
        let mut printer = TranscriptPrinter::new();
        let mut messages = vec![Message::user("hi"), Message::assistant("")];
        render(&mut printer, &messages);

        messages.pop();
        messages.push(Message::assistant("Sorry"));
        // the placeholder prefix is already on screen
        assert_eq!(render(&mut printer, &messages), "Sorry");
    }
}
