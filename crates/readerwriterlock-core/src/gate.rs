//! Binary exclusion primitive for the semaphore-style cores.
//!
//! A [`Gate`] is a binary semaphore: at most one party holds it, and the
//! release may come from a different thread than the acquire. The reader- and
//! writer-priority cores depend on that: the first reader in takes the
//! resource gate and the last reader out (often another thread) gives it
//! back. A `parking_lot::Mutex` cannot be handed across threads like that,
//! so the gate keeps its own flag under a mutex and parks waiters on a
//! condition variable.

use parking_lot::{Condvar, Mutex};

use crate::deadline::Deadline;

/// Binary semaphore with deadline-bounded acquisition.
#[derive(Debug, Default)]
pub struct Gate {
    held: Mutex<bool>,
    opened: Condvar,
}

impl Gate {
    /// Create an open (unheld) gate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            held: Mutex::new(false),
            opened: Condvar::new(),
        }
    }

    /// Take the gate, waiting no longer than `deadline` allows.
    pub fn acquire(&self, deadline: Deadline) -> bool {
        let mut held = self.held.lock();
        if !deadline.wait_for(&self.opened, &mut held, |held| !*held) {
            return false;
        }
        *held = true;
        true
    }

    /// Take the gate only if it is open right now.
    pub fn try_acquire(&self) -> bool {
        self.acquire(Deadline::Immediate)
    }

    /// Give the gate back and wake one waiter.
    ///
    /// # Panics
    ///
    /// Panics if the gate is not held; that is a bug in the calling core.
    pub fn release(&self) {
        let mut held = self.held.lock();
        assert!(*held, "gate released while open");
        *held = false;
        drop(held);
        self.opened.notify_one();
    }

    /// Returns true if some party currently holds the gate.
    #[must_use]
    pub fn is_held(&self) -> bool {
        *self.held.lock()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use super::*;

    #[test]
    fn acquire_release_cycle() {
        let gate = Gate::new();
        assert!(!gate.is_held());
        assert!(gate.try_acquire());
        assert!(gate.is_held());
        assert!(!gate.try_acquire());
        gate.release();
        assert!(!gate.is_held());
        assert!(gate.try_acquire());
        gate.release();
    }

    #[test]
    fn bounded_acquire_times_out() {
        let gate = Gate::new();
        assert!(gate.try_acquire());
        let start = Instant::now();
        let deadline = Deadline::new(true, Some(Duration::from_millis(50)));
        assert!(!gate.acquire(deadline));
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert!(gate.is_held());
        gate.release();
    }

    #[test]
    fn release_from_another_thread_wakes_waiter() {
        let gate = Arc::new(Gate::new());
        assert!(gate.try_acquire());

        let releaser = Arc::clone(&gate);
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            releaser.release();
        });

        assert!(gate.acquire(Deadline::Never));
        handle.join().unwrap();
        gate.release();
    }

    #[test]
    #[should_panic(expected = "gate released while open")]
    fn release_while_open_panics() {
        Gate::new().release();
    }
}
