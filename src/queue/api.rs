//! Public API for the queue system
//!
//! External modules should import from here rather than directly from internal
//! modules. See the module documentation for usage examples.

// Queue handle and lifecycle
pub use crate::queue::handle::Queue;
pub use crate::queue::internal::DestroyOutcome;

// Message types
pub use crate::queue::message::{Disposal, Message};

// Configuration
pub use crate::queue::config::{QueueConfig, DEFAULT_LOCK_TIMEOUT};

// Error handling
pub use crate::queue::error::{DestroyError, EnqueueError, QueueError, QueueResult};
