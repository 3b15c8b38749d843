//! Reader-priority core (first readers-writers problem).
//!
//! Readers share one resource gate: the first reader in takes it on behalf of
//! every reader, the last reader out gives it back. While any reader is
//! inside, new readers only touch the read count and never queue behind a
//! waiting writer. A steady stream of readers can therefore hold the gate
//! forever and starve writers.

use log::trace;
use parking_lot::Mutex;

use super::{CoreSnapshot, LockCore};
use crate::config::Policy;
use crate::deadline::Deadline;
use crate::gate::Gate;

/// Shared state for a [`ReaderPriorityLock`](crate::ReaderPriorityLock).
#[derive(Debug, Default)]
pub struct ReaderPriorityCore {
    /// Active reader count. Held by the first reader while it waits for
    /// `resource`, which queues later readers behind it.
    active_readers: Mutex<usize>,
    resource: Gate,
}

impl ReaderPriorityCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LockCore for ReaderPriorityCore {
    const POLICY: Policy = Policy::ReaderPriority;

    fn acquire_read(&self, deadline: Deadline) -> bool {
        let Some(mut readers) = deadline.lock(&self.active_readers) else {
            trace!("reader-priority: read count busy past deadline");
            return false;
        };
        *readers += 1;
        if *readers == 1 && !self.resource.acquire(deadline) {
            *readers -= 1;
            trace!("reader-priority: first reader timed out on resource, rolled back");
            return false;
        }
        true
    }

    fn release_read(&self) {
        let mut readers = self.active_readers.lock();
        assert!(*readers > 0, "reader-priority: read release with no active readers");
        *readers -= 1;
        if *readers == 0 {
            self.resource.release();
        }
    }

    fn acquire_write(&self, deadline: Deadline) -> bool {
        let acquired = self.resource.acquire(deadline);
        if !acquired {
            trace!("reader-priority: writer timed out on resource");
        }
        acquired
    }

    fn release_write(&self) {
        self.resource.release();
    }

    fn snapshot(&self) -> CoreSnapshot {
        let readers = self.active_readers.lock();
        CoreSnapshot {
            active_readers: *readers,
            writer_active: *readers == 0 && self.resource.is_held(),
            ..CoreSnapshot::default()
        }
    }
}
