//! Writer-priority core (second readers-writers problem).
//!
//! The first writer to show up closes the `no_new_readers` gate and the last
//! writer to leave reopens it. Readers must pass that gate to enter, so once a
//! writer is waiting no newly arriving reader gets ahead of it; readers that
//! are already inside finish normally and the writer takes the resource when
//! the last of them leaves. Under continuous write pressure readers starve.
//!
//! Readers queue on `reader_entry` before touching the gate, so a writer
//! trying to close it contends with at most one reader.

use log::trace;
use parking_lot::Mutex;

use super::{CoreSnapshot, LockCore};
use crate::config::Policy;
use crate::deadline::Deadline;
use crate::gate::Gate;

/// Shared state for a [`WriterPriorityLock`](crate::WriterPriorityLock).
#[derive(Debug, Default)]
pub struct WriterPriorityCore {
    reader_entry: Mutex<()>,
    active_readers: Mutex<usize>,
    /// Writers that are waiting or active.
    waiting_writers: Mutex<usize>,
    no_new_readers: Gate,
    resource: Gate,
}

impl WriterPriorityCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn enter_reader(&self, deadline: Deadline) -> bool {
        let Some(mut readers) = deadline.lock(&self.active_readers) else {
            return false;
        };
        *readers += 1;
        if *readers == 1 && !self.resource.acquire(deadline) {
            *readers -= 1;
            return false;
        }
        true
    }

    fn join_writer_queue(&self, deadline: Deadline) -> bool {
        let Some(mut writers) = deadline.lock(&self.waiting_writers) else {
            return false;
        };
        *writers += 1;
        if *writers == 1 && !self.no_new_readers.acquire(deadline) {
            *writers -= 1;
            return false;
        }
        true
    }

    fn leave_writer_queue(&self) {
        let mut writers = self.waiting_writers.lock();
        assert!(*writers > 0, "writer-priority: writer count underflow");
        *writers -= 1;
        if *writers == 0 {
            self.no_new_readers.release();
        }
    }
}

impl LockCore for WriterPriorityCore {
    const POLICY: Policy = Policy::WriterPriority;

    fn acquire_read(&self, deadline: Deadline) -> bool {
        let Some(_entry) = deadline.lock(&self.reader_entry) else {
            trace!("writer-priority: reader entry busy past deadline");
            return false;
        };
        if !self.no_new_readers.acquire(deadline) {
            trace!("writer-priority: reader held back by pending writer");
            return false;
        }
        let admitted = self.enter_reader(deadline);
        self.no_new_readers.release();
        if !admitted {
            trace!("writer-priority: reader timed out on resource, rolled back");
        }
        admitted
    }

    fn release_read(&self) {
        let mut readers = self.active_readers.lock();
        assert!(*readers > 0, "writer-priority: read release with no active readers");
        *readers -= 1;
        if *readers == 0 {
            self.resource.release();
        }
    }

    fn acquire_write(&self, deadline: Deadline) -> bool {
        if !self.join_writer_queue(deadline) {
            trace!("writer-priority: writer could not close the reader gate");
            return false;
        }
        if self.resource.acquire(deadline) {
            return true;
        }
        self.leave_writer_queue();
        trace!("writer-priority: writer timed out on resource, left the queue");
        false
    }

    fn release_write(&self) {
        self.resource.release();
        self.leave_writer_queue();
    }

    fn snapshot(&self) -> CoreSnapshot {
        // Never hold both counters at once: a writer holds `waiting_writers`
        // while waiting on a gate that a reader holds while it waits for
        // `active_readers`.
        let waiting_writers = *self.waiting_writers.lock();
        // Readers take and return the resource only under this guard, so with
        // no readers counted a held resource belongs to a writer.
        let readers = self.active_readers.lock();
        CoreSnapshot {
            active_readers: *readers,
            writer_active: *readers == 0 && self.resource.is_held(),
            waiting_writers,
            ..CoreSnapshot::default()
        }
    }
}
