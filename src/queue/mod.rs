//! Thread-safe FIFO Message Queue
//!
//! An in-process queue for handing owned byte buffers between threads in
//! arrival order, with reference-counted teardown.
//!
//! # Overview
//!
//! - **Ownership transfer**: enqueue moves a payload into the queue, dequeue
//!   moves it back out; a payload never has two owners
//! - **Bounded waits**: every operation waits for the queue lock at most the
//!   configured timeout and reports a distinct timeout error otherwise
//! - **Strict FIFO**: messages leave in the order they were accepted, each
//!   stamped with a monotonic sequence number
//! - **Shared handles**: [`Queue::duplicate`] hands out further references; the
//!   last one to be destroyed frees everything still queued
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐                            ┌──────────────┐
//! │   Producer   │                            │   Consumer   │
//! │  (Queue #1)  │                            │  (Queue #2)  │
//! └──────┬───────┘                            └──────▲───────┘
//!        │ enqueue(Message)                          │ dequeue() -> Message
//!        ▼                                           │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 SharedQueue (refcount = 2)                  │
//! │   QueueLock ── Unlocked / Locked, bounded-wait acquire      │
//! │  ┌───────┬───────┬───────┬───────┐                          │
//! │  │ #1    │ #2    │ #3    │ #4    │ ◄── tail                 │
//! │  └───────┴───────┴───────┴───────┘                          │
//! │    ▲ head                                                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use smq::queue::{DestroyOutcome, Message, Queue, QueueConfig};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = QueueConfig::default().with_lock_timeout(Duration::from_millis(100));
//! let queue = Queue::with_config(config)?;
//!
//! queue.enqueue(Message::new(b"first".to_vec())?)?;
//! queue.enqueue(Message::new(b"second".to_vec())?)?;
//!
//! while let Some(message) = queue.dequeue()? {
//!     println!("#{:?}: {} bytes", message.sequence(), message.len());
//! }
//!
//! assert!(matches!(queue.destroy(), Ok(DestroyOutcome::TornDown { drained: 0 })));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod api;
mod config;
mod entry;
mod error;
mod handle;
mod internal;
mod list;
mod lock;
mod message;

pub use config::{QueueConfig, DEFAULT_LOCK_TIMEOUT};
pub use error::{DestroyError, EnqueueError, QueueError, QueueResult};
pub use handle::Queue;
pub use internal::DestroyOutcome;
pub use message::{Disposal, Message};

#[cfg(test)]
mod tests;
