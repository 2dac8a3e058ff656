use std::collections::HashMap;

use crate::message::ChatMessage;

/// Reconciled conversation state: one entry per message key, merged from
/// snapshot and live deliveries in whatever order they arrive. Entries are
/// never removed.
#[derive(Debug, Default)]
pub struct ConversationStore {
    entries: HashMap<String, Entry>,
    next_seq: u64,
}

#[derive(Debug)]
struct Entry {
    message: ChatMessage,
    /// Tiebreak among equal timestamps: assigned on first insert and kept
    /// across updates, so a re-delivered key cannot drift in the view.
    seq: u64,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by key. Re-applying an identical delivery changes
    /// nothing; a changed re-delivery replaces every field but keeps the
    /// original ordering slot.
    pub fn upsert_one(&mut self, message: ChatMessage) {
        match self.entries.get_mut(&message.key) {
            Some(entry) => entry.message = message,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.entries
                    .insert(message.key.clone(), Entry { message, seq });
            },
        }
    }

    /// Apply a batch as individual upserts. Callers needing the batch to
    /// appear atomically hold their own write lock across this call.
    pub fn upsert_batch(&mut self, messages: impl IntoIterator<Item = ChatMessage>) {
        for message in messages {
            self.upsert_one(message);
        }
    }

    /// The transcript: displayable messages ordered by ascending timestamp,
    /// ties in first-insertion order. Recomputed from scratch on each call.
    pub fn view(&self) -> Vec<ChatMessage> {
        let mut entries: Vec<&Entry> = self
            .entries
            .values()
            .filter(|e| e.message.is_displayable())
            .collect();
        entries.sort_by_key(|e| (e.message.timestamp, e.seq));
        entries.into_iter().map(|e| e.message.clone()).collect()
    }

    /// Total records held, displayable or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
