//! Retry utility for callers handling transient queue errors
//!
//! The queue never retries on its own; a lock timeout is handed straight back.
//! Callers that want to keep trying can wrap an operation with [`retry`], or
//! hand a message to [`retry_enqueue`], which feeds the rejected message back
//! into each attempt.

use crate::queue::{EnqueueError, Message, Queue, QueueError};
use std::thread::sleep;
use std::time::Duration;

/// Errors that can tell whether a second attempt might succeed
pub trait Transient {
    fn is_transient(&self) -> bool;
}

impl Transient for QueueError {
    fn is_transient(&self) -> bool {
        QueueError::is_transient(self)
    }
}

impl Transient for EnqueueError {
    fn is_transient(&self) -> bool {
        self.error().is_transient()
    }
}

/// Configurable retry policy for blocking operations
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(10),
        }
    }
}

/// Run an operation, retrying while it fails with a transient error
///
/// Permanent errors are returned at once. After `max_attempts` tries the
/// last transient error is returned. A policy of zero attempts still runs
/// the operation once.
///
/// # Examples
/// ```rust
/// use smq::core::retry::{retry, RetryPolicy};
/// use smq::queue::Queue;
///
/// let queue = Queue::new();
/// let next = retry("dequeue", &RetryPolicy::default(), || queue.dequeue()).unwrap();
/// assert!(next.is_none());
/// ```
pub fn retry<F, T, E>(operation_name: &str, policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: Transient + std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation() {
            Ok(result) => return Ok(result),
            Err(error) if error.is_transient() && attempt < max_attempts => {
                log::debug!(
                    "Operation '{}' failed on attempt {}/{}, retrying in {:?}: {}",
                    operation_name,
                    attempt,
                    max_attempts,
                    policy.delay,
                    error
                );
                sleep(policy.delay);
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

/// Enqueue a message, retrying lock timeouts with the message handed back
///
/// Follows the same policy rules as [`retry`]. On final failure the message
/// comes back inside the error.
///
/// # Examples
/// ```rust
/// use smq::core::retry::{retry_enqueue, RetryPolicy};
/// use smq::queue::{Message, Queue};
///
/// let queue = Queue::new();
/// let message = Message::new(b"ping".to_vec()).unwrap();
/// let sequence = retry_enqueue(&queue, message, &RetryPolicy::default()).unwrap();
/// assert_eq!(sequence, 1);
/// ```
pub fn retry_enqueue(
    queue: &Queue,
    message: Message,
    policy: &RetryPolicy,
) -> Result<u64, EnqueueError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut message = message;
    let mut attempt = 1;

    loop {
        match queue.enqueue(message) {
            Ok(sequence) => return Ok(sequence),
            Err(error) if error.is_transient() && attempt < max_attempts => {
                log::debug!(
                    "Enqueue on queue-{} failed on attempt {}/{}, retrying in {:?}: {}",
                    queue.id(),
                    attempt,
                    max_attempts,
                    policy.delay,
                    error
                );
                message = error.into_message();
                sleep(policy.delay);
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}
