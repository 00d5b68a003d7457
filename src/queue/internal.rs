//! Shared queue state guarded by the bounded-wait lock
//!
//! This module holds everything the handles of one queue share:
//! - The entry list, refcount and sequence counter (only touched under the lock)
//! - The lock itself and the configured wait bound
//! - A lock-free mirror of the resident count for approximate reads
//! - A count of references given up by dropped handles that could not lock

use crate::queue::config::QueueConfig;
use crate::queue::entry::Entry;
use crate::queue::error::QueueResult;
use crate::queue::list::EntryList;
use crate::queue::lock::{LockState, QueueLock};
use std::cell::UnsafeCell;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

static NEXT_QUEUE_ID: AtomicU64 = AtomicU64::new(1);

/// What a handle release did to the shared queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyOutcome {
    /// Other handles remain, nothing was freed
    Released { remaining_handles: usize },
    /// This was the last handle, resident entries were freed
    TornDown { drained: usize },
}

/// Mutable queue state, only reachable through a [`LockedQueue`]
#[derive(Debug)]
pub(crate) struct QueueState {
    pub(crate) entries: EntryList,
    pub(crate) refcount: usize,
}

#[derive(Debug)]
pub(crate) struct SharedQueue {
    id: u64,
    lock: QueueLock,
    state: UnsafeCell<QueueState>,
    timeout_nanos: AtomicU64,
    resident: AtomicUsize,
    deferred_releases: AtomicUsize,
    max_message_bytes: Option<usize>,
}

// SAFETY: `state` is only dereferenced through a `LockedQueue`, which exists
// only while this queue's `QueueLock` is claimed. The claim is exclusive and
// its hand-off goes through the lock's internal mutex, so accesses to `state`
// never overlap and are ordered between threads.
unsafe impl Sync for SharedQueue {}

fn duration_to_nanos(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_nanos()).unwrap_or(u64::MAX)
}

impl SharedQueue {
    pub(crate) fn new(config: &QueueConfig) -> Self {
        Self {
            id: NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed),
            lock: QueueLock::new(),
            state: UnsafeCell::new(QueueState {
                entries: EntryList::new(),
                refcount: 1,
            }),
            timeout_nanos: AtomicU64::new(duration_to_nanos(config.lock_timeout)),
            resident: AtomicUsize::new(0),
            deferred_releases: AtomicUsize::new(0),
            max_message_bytes: config.max_message_bytes,
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn max_message_bytes(&self) -> Option<usize> {
        self.max_message_bytes
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_nanos(self.timeout_nanos.load(Ordering::Relaxed))
    }

    /// Affects lock attempts that start after the call, not ones already waiting
    pub(crate) fn set_timeout(&self, timeout: Duration) {
        self.timeout_nanos
            .store(duration_to_nanos(timeout), Ordering::Relaxed);
    }

    /// Resident count as of the last unlock
    ///
    /// Read without the lock, so it may already be stale when it returns.
    pub(crate) fn approximate_len(&self) -> usize {
        self.resident.load(Ordering::Acquire)
    }

    pub(crate) fn is_locked(&self) -> bool {
        matches!(self.lock.state(), Ok(LockState::Locked))
    }

    /// Claim the lock within the configured timeout
    ///
    /// References deferred by [`SharedQueue::defer_release`] are taken off
    /// the refcount before the guard is handed out.
    pub(crate) fn lock(&self) -> QueueResult<LockedQueue<'_>> {
        let timeout = self.timeout();
        if let Err(e) = self.lock.acquire(timeout) {
            log::debug!("queue-{}: lock not acquired: {}", self.id, e);
            return Err(e);
        }
        let mut guard = LockedQueue { shared: self };
        let deferred = self.deferred_releases.swap(0, Ordering::AcqRel);
        if deferred > 0 {
            guard.refcount = guard.refcount.saturating_sub(deferred);
            log::debug!(
                "queue-{}: applied {} deferred handle release(s)",
                self.id,
                deferred
            );
        }
        Ok(guard)
    }

    /// Give up one reference without holding the lock
    ///
    /// The next successful [`SharedQueue::lock`] applies it, so a later
    /// `release_handle` still sees the count reach zero.
    pub(crate) fn defer_release(&self) {
        self.deferred_releases.fetch_add(1, Ordering::AcqRel);
    }

    /// Register one more handle
    pub(crate) fn add_handle(&self) -> QueueResult<usize> {
        let mut state = self.lock()?;
        state.refcount += 1;
        Ok(state.refcount)
    }

    pub(crate) fn handle_count(&self) -> QueueResult<usize> {
        Ok(self.lock()?.refcount)
    }

    /// Drop one handle's reference, tearing down on the last one
    ///
    /// The decrement and the zero check happen under the same claim, so
    /// exactly one caller ever observes the transition to zero.
    pub(crate) fn release_handle(&self) -> QueueResult<DestroyOutcome> {
        let mut state = self.lock()?;
        state.refcount = state.refcount.saturating_sub(1);
        if state.refcount > 0 {
            log::debug!(
                "queue-{}: handle released, {} remaining",
                self.id,
                state.refcount
            );
            return Ok(DestroyOutcome::Released {
                remaining_handles: state.refcount,
            });
        }

        if state.entries.is_empty() {
            log::debug!("queue-{}: torn down", self.id);
            return Ok(DestroyOutcome::TornDown { drained: 0 });
        }

        let bytes = state.entries.payload_bytes();
        let drained = state.entries.drain();
        log::debug!(
            "queue-{}: torn down, freed {} resident entries ({} bytes)",
            self.id,
            drained,
            bytes
        );
        Ok(DestroyOutcome::TornDown { drained })
    }
}

/// Exclusive access to a queue's state for the duration of one lock claim
///
/// Dropping the guard publishes the resident count and releases the lock.
pub(crate) struct LockedQueue<'a> {
    shared: &'a SharedQueue,
}

impl LockedQueue<'_> {
    pub(crate) fn push_back(&mut self, entry: Entry) -> u64 {
        self.entries.push_back(entry)
    }

    pub(crate) fn pop_front(&mut self) -> Option<Entry> {
        self.entries.pop_front()
    }
}

impl Deref for LockedQueue<'_> {
    type Target = QueueState;

    fn deref(&self) -> &QueueState {
        // SAFETY: the guard holds the queue's lock claim; see `SharedQueue`.
        unsafe { &*self.shared.state.get() }
    }
}

impl DerefMut for LockedQueue<'_> {
    fn deref_mut(&mut self) -> &mut QueueState {
        // SAFETY: the guard holds the queue's lock claim and `&mut self`
        // rules out another reference through this guard.
        unsafe { &mut *self.shared.state.get() }
    }
}

impl Drop for LockedQueue<'_> {
    fn drop(&mut self) {
        let len = self.entries.len();
        self.shared.resident.store(len, Ordering::Release);
        if let Err(e) = self.shared.lock.release() {
            log::error!("queue-{}: failed to release lock: {}", self.shared.id, e);
        }
    }
}
