//! Queue Error Types

use crate::queue::handle::Queue;
use crate::queue::message::Message;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Contract violation: {message}")]
    ContractViolation { message: String },

    #[error("Timed out after {timeout:?} waiting for the queue lock")]
    LockTimeout { timeout: Duration },

    #[error("Allocation of {requested} bytes failed")]
    AllocationFailure { requested: usize },

    #[error("Synchronisation failure: {message}")]
    Synchronisation { message: String },

    #[error("Invalid configuration: {message}")]
    Configuration { message: String },
}

impl QueueError {
    pub(crate) fn contract(message: impl Into<String>) -> Self {
        QueueError::ContractViolation {
            message: message.into(),
        }
    }

    /// True when retrying the same call may succeed.
    ///
    /// Only a lock timeout is transient; every other failure is either a
    /// caller error or a broken queue and will fail again.
    pub fn is_transient(&self) -> bool {
        matches!(self, QueueError::LockTimeout { .. })
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

/// A failed enqueue, handing the message back to the caller
///
/// The queue never keeps a message it did not accept, so the caller stays
/// the sole owner of the payload and may retry with it.
#[derive(Debug, thiserror::Error)]
#[error("Enqueue rejected: {source}")]
pub struct EnqueueError {
    message: Message,
    source: QueueError,
}

impl EnqueueError {
    pub(crate) fn new(message: Message, source: QueueError) -> Self {
        Self { message, source }
    }

    pub fn error(&self) -> &QueueError {
        &self.source
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn into_message(self) -> Message {
        self.message
    }

    pub fn into_parts(self) -> (Message, QueueError) {
        (self.message, self.source)
    }
}

/// A failed destroy, handing the queue handle back to the caller
#[derive(Debug, thiserror::Error)]
#[error("Destroy failed: {source}")]
pub struct DestroyError {
    queue: Queue,
    source: QueueError,
}

impl DestroyError {
    pub(crate) fn new(queue: Queue, source: QueueError) -> Self {
        Self { queue, source }
    }

    pub fn error(&self) -> &QueueError {
        &self.source
    }

    pub fn into_queue(self) -> Queue {
        self.queue
    }
}
