//! Bounded-wait binary lock
//!
//! The queue lock is an explicit two-state machine (`Unlocked`/`Locked`)
//! rather than a plain mutex guard. A claim is not tied to the claiming
//! thread, callers never wait longer than their timeout, and releasing an
//! already unlocked lock is a no-op instead of a second signal.
//!
//! ```text
//!   acquire() ok            release()
//! Unlocked ───────► Locked ───────► Unlocked
//!     ▲                               │
//!     └───────── release() no-op ─────┘
//! ```

use crate::core::sync::handle_mutex_poison;
use crate::queue::error::{QueueError, QueueResult};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LockState {
    Unlocked,
    Locked,
}

#[derive(Debug)]
pub(crate) struct QueueLock {
    state: Mutex<LockState>,
    released: Condvar,
}

fn poisoned(message: String) -> QueueError {
    QueueError::Synchronisation { message }
}

impl QueueLock {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(LockState::Unlocked),
            released: Condvar::new(),
        }
    }

    /// Claim the lock, waiting at most `timeout`
    ///
    /// One immediate claim attempt, then a single bounded wait for a
    /// release, then exactly one more claim attempt. Never retries beyond
    /// that and never blocks past the deadline.
    pub(crate) fn acquire(&self, timeout: Duration) -> QueueResult<()> {
        let mut state = handle_mutex_poison(self.state.lock(), poisoned)?;
        if *state == LockState::Unlocked {
            *state = LockState::Locked;
            return Ok(());
        }
        if timeout.is_zero() {
            return Err(QueueError::LockTimeout { timeout });
        }

        let (mut state, _) = handle_mutex_poison(
            self.released
                .wait_timeout_while(state, timeout, |s| *s == LockState::Locked),
            poisoned,
        )?;
        match *state {
            LockState::Unlocked => {
                *state = LockState::Locked;
                Ok(())
            }
            LockState::Locked => Err(QueueError::LockTimeout { timeout }),
        }
    }

    /// Release the lock if it is held
    ///
    /// Returns whether a release actually happened. Releasing an unlocked
    /// lock leaves it unlocked and wakes nobody.
    pub(crate) fn release(&self) -> QueueResult<bool> {
        let mut state = handle_mutex_poison(self.state.lock(), poisoned)?;
        match *state {
            LockState::Locked => {
                *state = LockState::Unlocked;
                drop(state);
                self.released.notify_one();
                Ok(true)
            }
            LockState::Unlocked => Ok(false),
        }
    }

    pub(crate) fn state(&self) -> QueueResult<LockState> {
        Ok(*handle_mutex_poison(self.state.lock(), poisoned)?)
    }
}
