//! Queue-internal representation of a resident message

use crate::queue::error::{EnqueueError, QueueError};
use crate::queue::message::Message;

/// A message payload while it sits in the queue
///
/// The sequence number is whatever the message carried until the entry is
/// pushed into an [`EntryList`](crate::queue::list::EntryList), which stamps
/// a fresh one.
#[derive(Debug)]
pub(crate) struct Entry {
    pub(crate) sequence: Option<u64>,
    data: Vec<u8>,
}

impl Entry {
    /// Absorb a message into an entry
    ///
    /// Rejects an empty payload or one above `max_bytes`. The message is
    /// handed back inside the error, untouched.
    pub(crate) fn from_message(
        message: Message,
        max_bytes: Option<usize>,
    ) -> Result<Self, EnqueueError> {
        if message.is_empty() {
            return Err(EnqueueError::new(
                message,
                QueueError::contract("message payload is empty"),
            ));
        }
        if let Some(limit) = max_bytes {
            if message.len() > limit {
                let violation = QueueError::contract(format!(
                    "message payload of {} bytes exceeds the {} byte limit",
                    message.len(),
                    limit
                ));
                return Err(EnqueueError::new(message, violation));
            }
        }

        let (data, sequence) = message.into_parts();
        Ok(Self { sequence, data })
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    /// Convert back into a message, carrying the current sequence
    pub(crate) fn into_message(self) -> Message {
        Message::from_parts(self.data, self.sequence)
    }
}
