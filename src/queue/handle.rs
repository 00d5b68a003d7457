//! Queue - the handle callers create, share and destroy
//!
//! A [`Queue`] is one reference to a shared FIFO. Further references come
//! from [`Queue::duplicate`], and every reference is given back exactly once,
//! either explicitly through [`Queue::destroy`] or implicitly on drop. The
//! reference that brings the count to zero frees whatever is still queued.
//! A handle dropped while the lock is busy defers its release to the next
//! holder of the lock.

use crate::queue::config::QueueConfig;
use crate::queue::entry::Entry;
use crate::queue::error::{DestroyError, EnqueueError, QueueResult};
use crate::queue::internal::{DestroyOutcome, SharedQueue};
use crate::queue::message::Message;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Handle to a thread-safe FIFO message queue
///
/// Every operation that touches the queue contents claims the queue lock
/// first, waiting at most the configured timeout. A timed-out claim is
/// reported as [`QueueError::LockTimeout`](crate::queue::QueueError) and
/// leaves the queue untouched; retrying is up to the caller.
///
/// # Example
///
/// ```rust
/// use smq::queue::{Message, Queue};
/// use std::thread;
///
/// let queue = Queue::new();
/// let producer = queue.duplicate().unwrap();
///
/// let worker = thread::spawn(move || {
///     let message = Message::new(b"hello".to_vec()).unwrap();
///     producer.enqueue(message).unwrap();
///     producer.destroy().unwrap();
/// });
/// worker.join().unwrap();
///
/// let message = queue.dequeue().unwrap().expect("message was enqueued");
/// assert_eq!(message.data(), b"hello");
/// queue.destroy().unwrap();
/// ```
pub struct Queue {
    shared: Arc<SharedQueue>,
    released: bool,
}

impl Queue {
    /// Create a queue with the default configuration
    pub fn new() -> Self {
        Self::from_shared(Arc::new(SharedQueue::new(&QueueConfig::default())))
    }

    /// Create a queue with an explicit configuration
    pub fn with_config(config: QueueConfig) -> QueueResult<Self> {
        config.validate()?;
        Ok(Self::from_shared(Arc::new(SharedQueue::new(&config))))
    }

    fn from_shared(shared: Arc<SharedQueue>) -> Self {
        log::debug!(
            "queue-{}: created (lock timeout {:?})",
            shared.id(),
            shared.timeout()
        );
        Self {
            shared,
            released: false,
        }
    }

    /// Process-unique identifier shared by all handles of this queue
    pub fn id(&self) -> u64 {
        self.shared.id()
    }

    /// Take out another handle to the same queue
    ///
    /// Nothing is copied; both handles see the same entries. Each must be
    /// destroyed (or dropped) on its own.
    pub fn duplicate(&self) -> QueueResult<Queue> {
        let handles = self.shared.add_handle()?;
        log::debug!("queue-{}: duplicated, {} handles", self.id(), handles);
        Ok(Queue {
            shared: Arc::clone(&self.shared),
            released: false,
        })
    }

    /// Number of live handles, read under the lock
    pub fn handle_count(&self) -> QueueResult<usize> {
        self.shared.handle_count()
    }

    /// Give this handle back
    ///
    /// If other handles remain nothing else happens. The last handle drains
    /// and frees every queued message. When the lock cannot be claimed the
    /// handle comes back inside the error and is still usable.
    pub fn destroy(mut self) -> Result<DestroyOutcome, DestroyError> {
        match self.shared.release_handle() {
            Ok(outcome) => {
                self.released = true;
                Ok(outcome)
            }
            Err(e) => Err(DestroyError::new(self, e)),
        }
    }

    /// Append a message at the tail
    ///
    /// On success the queue owns the payload and the assigned sequence
    /// number is returned. On any failure the message is handed back
    /// unchanged inside the error.
    pub fn enqueue(&self, message: Message) -> Result<u64, EnqueueError> {
        let entry = Entry::from_message(message, self.shared.max_message_bytes())?;

        let mut state = match self.shared.lock() {
            Ok(state) => state,
            Err(e) => return Err(EnqueueError::new(entry.into_message(), e)),
        };
        let sequence = state.push_back(entry);
        drop(state);

        log::trace!("queue-{}: enqueued #{}", self.id(), sequence);
        Ok(sequence)
    }

    /// Remove the message at the head
    ///
    /// `Ok(None)` means the queue was empty when the lock was held, which
    /// is distinct from failing to get the lock at all.
    pub fn dequeue(&self) -> QueueResult<Option<Message>> {
        let mut state = self.shared.lock()?;
        let entry = state.pop_front();
        drop(state);

        Ok(entry.map(|entry| {
            log::trace!("queue-{}: dequeued #{:?}", self.id(), entry.sequence);
            entry.into_message()
        }))
    }

    /// Approximate number of queued messages
    ///
    /// Read without the lock: concurrent producers and consumers may have
    /// changed the count by the time this returns. Exact only when nothing
    /// else is mutating the queue, so never use it to decide whether a
    /// dequeue will find something.
    pub fn len(&self) -> usize {
        self.shared.approximate_len()
    }

    /// Approximate emptiness check, with the same caveats as [`Queue::len`]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current bound on lock waits
    pub fn timeout(&self) -> Duration {
        self.shared.timeout()
    }

    /// Replace the bound on lock waits for all handles of this queue
    ///
    /// Acquisitions already waiting keep the bound they started with.
    pub fn set_timeout(&self, timeout: Duration) {
        self.shared.set_timeout(timeout);
        log::debug!("queue-{}: lock timeout set to {:?}", self.id(), timeout);
    }

    #[cfg(test)]
    pub(crate) fn shared(&self) -> &SharedQueue {
        &self.shared
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("id", &self.shared.id())
            .field("len", &self.len())
            .field("timeout", &self.timeout())
            .field("locked", &self.shared.is_locked())
            .finish()
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.shared.release_handle() {
            log::warn!(
                "queue-{}: dropped handle could not lock, deferring its release: {}",
                self.shared.id(),
                e
            );
            self.shared.defer_release();
        }
    }
}
