//! Message type exchanged with the queue
//!
//! A Message owns its payload buffer outright. Handing a Message to
//! [`Queue::enqueue`](crate::queue::Queue::enqueue) moves the buffer into the
//! queue, and [`Queue::dequeue`](crate::queue::Queue::dequeue) moves it back out
//! to the caller, so a payload never has two owners.

use crate::queue::error::{QueueError, QueueResult};

/// What [`Message::destroy`] should do with the payload buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposal {
    /// Free the payload together with the message
    All,
    /// Discard only the message and hand the payload back
    ContainerOnly,
}

/// Owned data unit exchanged with a queue
///
/// # Example
///
/// ```rust
/// use smq::queue::Message;
///
/// let message = Message::new(b"sensor reading 42".to_vec()).unwrap();
/// assert_eq!(message.len(), 17);
/// assert_eq!(message.sequence(), None);
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct Message {
    data: Vec<u8>,
    sequence: Option<u64>,
}

impl Message {
    /// Wrap a caller buffer, rejecting an empty payload
    pub fn new(data: impl Into<Vec<u8>>) -> QueueResult<Self> {
        let data = data.into();
        if data.is_empty() {
            return Err(QueueError::contract("message payload is empty"));
        }
        Ok(Self {
            data,
            sequence: None,
        })
    }

    /// Copy a borrowed slice into a new message
    ///
    /// The copy is allocated fallibly, so an out-of-memory condition surfaces
    /// as [`QueueError::AllocationFailure`] instead of aborting.
    pub fn copy_from_slice(data: &[u8]) -> QueueResult<Self> {
        if data.is_empty() {
            return Err(QueueError::contract("message payload is empty"));
        }
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(data.len())
            .map_err(|_| QueueError::AllocationFailure {
                requested: data.len(),
            })?;
        buffer.extend_from_slice(data);
        Self::new(buffer)
    }

    pub(crate) fn from_parts(data: Vec<u8>, sequence: Option<u64>) -> Self {
        Self { data, sequence }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a message built through the public constructors
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sequence number stamped by the queue that delivered this message
    pub fn sequence(&self) -> Option<u64> {
        self.sequence
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub(crate) fn into_parts(self) -> (Vec<u8>, Option<u64>) {
        (self.data, self.sequence)
    }

    /// Dispose of the message, optionally keeping the payload
    ///
    /// Returns the payload for [`Disposal::ContainerOnly`] and `None` once
    /// the payload has been freed.
    pub fn destroy(self, disposal: Disposal) -> Option<Vec<u8>> {
        match disposal {
            Disposal::All => None,
            Disposal::ContainerOnly => Some(self.data),
        }
    }
}
