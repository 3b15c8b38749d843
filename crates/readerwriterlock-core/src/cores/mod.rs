//! Per-policy lock cores.
//!
//! A core owns the shared synchronisation state for one protected resource
//! and implements the reader-side and writer-side protocol for one fairness
//! policy. Handles drive a core through [`LockCore`]; they never touch its
//! counters directly.
//!
//! | Core | Problem | Starvation |
//! |------|---------|------------|
//! | [`ReaderPriorityCore`] | first readers-writers | writers may starve |
//! | [`WriterPriorityCore`] | second readers-writers | readers may starve |
//! | [`FairCore`] | third readers-writers | none (strict FIFO) |

pub mod fair;
pub mod reader_priority;
pub mod writer_priority;

pub use fair::FairCore;
pub use reader_priority::ReaderPriorityCore;
pub use writer_priority::WriterPriorityCore;

use crate::config::Policy;
use crate::deadline::Deadline;

/// Reader/writer protocol implemented by every core.
///
/// `acquire_*` returns false when the deadline expires and must leave the
/// core exactly as it found it. `release_*` may only be called by a party
/// that previously acquired the same role; handles enforce that.
pub trait LockCore: Send + Sync + 'static {
    /// The fairness policy this core implements.
    const POLICY: Policy;

    /// Enter as a reader.
    fn acquire_read(&self, deadline: Deadline) -> bool;

    /// Leave as a reader.
    fn release_read(&self);

    /// Enter as the writer.
    fn acquire_write(&self, deadline: Deadline) -> bool;

    /// Leave as the writer.
    fn release_write(&self);

    /// Copy of the core's bookkeeping, for diagnostics and tests.
    fn snapshot(&self) -> CoreSnapshot;
}

/// Point-in-time view of a core's counters.
///
/// Fields a policy does not track stay at zero. Taken under the core's
/// internal lock(s); on the reader-priority core that lock is also held by a
/// first reader waiting out a writer, so a snapshot can block until that
/// reader gets in or times out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoreSnapshot {
    /// Readers currently inside the critical section.
    pub active_readers: usize,
    /// Whether a writer currently owns the resource.
    pub writer_active: bool,
    /// Writers queued or active (writer-priority only).
    pub waiting_writers: usize,
    /// Next ticket to hand out (fair only).
    pub next_ticket: u64,
    /// Ticket currently being served (fair only).
    pub next_to_serve: u64,
}

impl CoreSnapshot {
    /// Returns true when no reader or writer is inside.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.active_readers == 0 && !self.writer_active
    }

    /// Tickets handed out but not yet served or skipped.
    #[must_use]
    pub const fn pending_tickets(&self) -> u64 {
        self.next_ticket.saturating_sub(self.next_to_serve)
    }
}
