//! Fair core (third readers-writers problem).
//!
//! Every acquisition, reader or writer, draws a ticket under the core mutex
//! and is served strictly in ticket order. A reader at the head of the queue
//! enters as soon as no writer is inside and immediately passes the turn on,
//! so a run of consecutive readers shares the resource. A writer at the head
//! waits for the resource to drain completely. Nobody overtakes, so neither
//! role starves.
//!
//! A waiter whose budget runs out abandons its ticket. The serving position
//! is never moved on its behalf at that moment; abandoned tickets are skipped
//! whenever the head of the queue is recomputed, so a timed-out waiter never
//! blocks the tickets behind it.

use std::collections::BTreeSet;

use log::trace;
use parking_lot::{Condvar, Mutex};

use super::{CoreSnapshot, LockCore};
use crate::config::Policy;
use crate::deadline::Deadline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Reader,
    Writer,
}

#[derive(Debug, Default)]
struct TicketState {
    active_readers: usize,
    writer_active: bool,
    next_ticket: u64,
    next_to_serve: u64,
    abandoned: BTreeSet<u64>,
}

impl TicketState {
    fn take_ticket(&mut self) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    fn skip_abandoned(&mut self) {
        while self.abandoned.remove(&self.next_to_serve) {
            self.next_to_serve += 1;
        }
    }

    fn is_eligible(&mut self, ticket: u64, role: Role) -> bool {
        self.skip_abandoned();
        if ticket != self.next_to_serve {
            return false;
        }
        match role {
            Role::Reader => !self.writer_active,
            Role::Writer => self.active_readers == 0 && !self.writer_active,
        }
    }

    fn admit(&mut self, role: Role) {
        match role {
            Role::Reader => self.active_readers += 1,
            Role::Writer => self.writer_active = true,
        }
        self.next_to_serve += 1;
    }

    fn abandon(&mut self, ticket: u64) {
        debug_assert!(ticket >= self.next_to_serve, "abandoned a served ticket");
        self.abandoned.insert(ticket);
    }
}

/// Shared state for a [`FairLock`](crate::FairLock).
#[derive(Debug, Default)]
pub struct FairCore {
    state: Mutex<TicketState>,
    turn: Condvar,
}

impl FairCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn acquire(&self, role: Role, deadline: Deadline) -> bool {
        let mut state = self.state.lock();
        let ticket = state.take_ticket();
        let admitted = deadline.wait_for(&self.turn, &mut state, |state| {
            state.is_eligible(ticket, role)
        });
        if admitted {
            state.admit(role);
        } else {
            state.abandon(ticket);
            trace!("fair: {role:?} abandoned ticket {ticket} after timeout");
        }
        drop(state);
        // Admission hands the turn to the next ticket; abandonment may
        // uncover it. Either way every waiter re-checks.
        self.turn.notify_all();
        admitted
    }
}

impl LockCore for FairCore {
    const POLICY: Policy = Policy::Fair;

    fn acquire_read(&self, deadline: Deadline) -> bool {
        self.acquire(Role::Reader, deadline)
    }

    fn release_read(&self) {
        let mut state = self.state.lock();
        assert!(
            state.active_readers > 0,
            "fair: read release with no active readers"
        );
        state.active_readers -= 1;
        drop(state);
        self.turn.notify_all();
    }

    fn acquire_write(&self, deadline: Deadline) -> bool {
        self.acquire(Role::Writer, deadline)
    }

    fn release_write(&self) {
        let mut state = self.state.lock();
        assert!(state.writer_active, "fair: write release with no active writer");
        state.writer_active = false;
        drop(state);
        self.turn.notify_all();
    }

    fn snapshot(&self) -> CoreSnapshot {
        let mut state = self.state.lock();
        state.skip_abandoned();
        CoreSnapshot {
            active_readers: state.active_readers,
            writer_active: state.writer_active,
            waiting_writers: 0,
            next_ticket: state.next_ticket,
            next_to_serve: state.next_to_serve,
        }
    }
}
