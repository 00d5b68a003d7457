//! Insertion-ordered container of resident entries

use crate::queue::entry::Entry;
use std::collections::LinkedList;

/// Doubly-linked FIFO of entries with per-list sequence stamping
///
/// Entries are appended at the tail and removed from the head. Sequence
/// numbers start at 1 and never repeat for the lifetime of the list.
#[derive(Debug)]
pub(crate) struct EntryList {
    entries: LinkedList<Entry>,
    last_sequence: u64,
}

impl EntryList {
    pub(crate) fn new() -> Self {
        Self {
            entries: LinkedList::new(),
            last_sequence: 0,
        }
    }

    /// Append at the tail, returning the sequence stamped on the entry
    pub(crate) fn push_back(&mut self, mut entry: Entry) -> u64 {
        self.last_sequence += 1;
        entry.sequence = Some(self.last_sequence);
        self.entries.push_back(entry);
        self.last_sequence
    }

    pub(crate) fn pop_front(&mut self) -> Option<Entry> {
        self.entries.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Free every resident entry and its payload, returning how many there were
    pub(crate) fn drain(&mut self) -> usize {
        let drained = self.entries.len();
        self.entries.clear();
        drained
    }

    pub(crate) fn payload_bytes(&self) -> usize {
        self.entries.iter().map(Entry::len).sum()
    }
}
