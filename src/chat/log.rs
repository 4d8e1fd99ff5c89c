//! Append-only conversation log.
//!
//! Every change to the conversation is recorded as an immutable
//! [`LogEvent`]. The rendered message list is the fold of those events; the
//! log keeps that fold up to date incrementally and can rebuild it from
//! scratch with [`ConversationLog::replay`].

use crate::protocol::{Message, Role};

/// Stable identifier of one message within a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    Appended { id: MessageId, message: Message },
    /// Text appended to the content of an existing assistant message.
    Delta { id: MessageId, text: String },
    /// An unfilled placeholder removed after a failed exchange.
    Retracted { id: MessageId },
}

#[derive(Debug, Default)]
pub struct ConversationLog {
    events: Vec<LogEvent>,
    view: Vec<(MessageId, Message)>,
    next_id: u64,
}

impl ConversationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.record(LogEvent::Appended { id, message });
        id
    }

    /// Append `text` to assistant message `id`.
    ///
    /// Returns `false` (and records nothing) when `id` is not a live
    /// assistant message or `text` is empty.
    pub fn append_delta(&mut self, id: MessageId, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        match self.find(id) {
            Some(message) if message.role == Role::Assistant => {}
            _ => return false,
        }
        self.record(LogEvent::Delta {
            id,
            text: text.to_string(),
        });
        true
    }

    /// Remove message `id` if it is the trailing message and still empty.
    pub fn retract_if_empty(&mut self, id: MessageId) -> bool {
        let is_empty_tail = self
            .view
            .last()
            .is_some_and(|(last_id, message)| *last_id == id && message.content.is_empty());
        if !is_empty_tail {
            return false;
        }
        self.record(LogEvent::Retracted { id });
        true
    }

    #[must_use]
    pub fn content_of(&self, id: MessageId) -> Option<&str> {
        self.find(id).map(|message| message.content.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.view.iter().map(|(_, message)| message)
    }

    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.view.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    #[must_use]
    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    /// Fold `events` into the message list they describe.
    #[must_use]
    pub fn replay(events: &[LogEvent]) -> Vec<Message> {
        let mut view = Vec::new();
        for event in events {
            apply(&mut view, event);
        }
        view.into_iter().map(|(_, message)| message).collect()
    }

    fn record(&mut self, event: LogEvent) {
        apply(&mut self.view, &event);
        self.events.push(event);
    }

    fn find(&self, id: MessageId) -> Option<&Message> {
        self.view
            .iter()
            .rev()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, message)| message)
    }
}

fn apply(view: &mut Vec<(MessageId, Message)>, event: &LogEvent) {
    match event {
        LogEvent::Appended { id, message } => view.push((*id, message.clone())),
        LogEvent::Delta { id, text } => {
            if let Some((_, message)) = view.iter_mut().rev().find(|(candidate, _)| candidate == id)
            {
                message.content.push_str(text);
            }
        }
        LogEvent::Retracted { id } => {
            if let Some(pos) = view.iter().rposition(|(candidate, _)| candidate == id) {
                view.remove(pos);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deltas_fold_into_placeholder() {
        let mut log = ConversationLog::new();
        log.append(Message::user("hi"));
        let reply = log.append(Message::assistant(""));
        for part in ["Hel", "lo", " world"] {
            assert!(log.append_delta(reply, part));
        }
        assert_eq!(log.content_of(reply), Some("Hello world"));
        assert_eq!(
            log.messages(),
            vec![Message::user("hi"), Message::assistant("Hello world")]
        );
        assert_eq!(log.events().len(), 5);
    }

    #[test]
    fn test_replay_matches_incremental_view() {
        let mut log = ConversationLog::new();
        log.append(Message::assistant("Welcome"));
        log.append(Message::user("q1"));
        let first = log.append(Message::assistant(""));
        log.append_delta(first, "a1");
        log.append(Message::user("q2"));
        let second = log.append(Message::assistant(""));
        assert!(log.retract_if_empty(second));
        log.append(Message::assistant("error"));

        assert_eq!(ConversationLog::replay(log.events()), log.messages());
        assert_eq!(log.len(), 5);
    }

    #[test]
    fn test_retract_refuses_filled_or_non_trailing() {
        let mut log = ConversationLog::new();
        let reply = log.append(Message::assistant(""));
        log.append_delta(reply, "partial");
        assert!(!log.retract_if_empty(reply));

        let empty = log.append(Message::assistant(""));
        log.append(Message::user("later"));
        assert!(!log.retract_if_empty(empty));
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_delta_rejected_for_user_or_unknown_ids() {
        let mut log = ConversationLog::new();
        let user = log.append(Message::user("hi"));
        assert!(!log.append_delta(user, "x"));

        let reply = log.append(Message::assistant(""));
        assert!(!log.append_delta(reply, ""));
        assert!(log.retract_if_empty(reply));
        assert!(!log.append_delta(reply, "late"));
        assert_eq!(log.messages(), vec![Message::user("hi")]);
    }
}
