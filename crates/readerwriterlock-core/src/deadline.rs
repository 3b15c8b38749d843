//! Wait-budget bookkeeping shared by every core.
//!
//! An `acquire` call turns its `(blocking, timeout)` arguments into a single
//! [`Deadline`] up front. Every blocking step inside that call (taking an
//! internal mutex, waiting on a condition variable) then spends from the same
//! absolute budget, so a spurious wakeup or a multi-step protocol never waits
//! longer than the caller asked for.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};

/// Absolute wait budget for one acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    /// Non-blocking: succeed only if the step can complete without waiting.
    Immediate,
    /// Bounded: give up once this instant has passed.
    At(Instant),
    /// Unbounded: wait as long as it takes.
    Never,
}

impl Deadline {
    /// Build the budget for an `acquire(blocking, timeout)` call.
    ///
    /// `blocking = false` ignores `timeout`. A zero timeout behaves like a
    /// non-blocking attempt; a timeout too large to represent as an
    /// [`Instant`] is treated as unbounded.
    #[must_use]
    pub fn new(blocking: bool, timeout: Option<Duration>) -> Self {
        if !blocking {
            return Self::Immediate;
        }
        match timeout {
            None => Self::Never,
            Some(timeout) if timeout.is_zero() => Self::Immediate,
            Some(timeout) => Instant::now()
                .checked_add(timeout)
                .map_or(Self::Never, Self::At),
        }
    }

    /// Returns true if this budget never runs out.
    #[must_use]
    pub const fn is_unbounded(self) -> bool {
        matches!(self, Self::Never)
    }

    /// Time left before the budget runs out, `None` if unbounded.
    #[must_use]
    pub fn remaining(self) -> Option<Duration> {
        match self {
            Self::Immediate => Some(Duration::ZERO),
            Self::At(at) => Some(at.saturating_duration_since(Instant::now())),
            Self::Never => None,
        }
    }

    /// Returns true once no more waiting is allowed.
    #[must_use]
    pub fn has_expired(self) -> bool {
        match self {
            Self::Immediate => true,
            Self::At(at) => Instant::now() >= at,
            Self::Never => false,
        }
    }

    /// Lock `mutex` within the budget.
    pub fn lock<'a, T>(self, mutex: &'a Mutex<T>) -> Option<MutexGuard<'a, T>> {
        match self {
            Self::Immediate => mutex.try_lock(),
            Self::At(at) => mutex.try_lock_until(at),
            Self::Never => Some(mutex.lock()),
        }
    }

    /// Park on `condvar` once.
    ///
    /// Returns false if the budget is exhausted. A `true` return only means
    /// the thread woke up; the caller must re-check its condition.
    pub fn wait<T>(self, condvar: &Condvar, guard: &mut MutexGuard<'_, T>) -> bool {
        match self {
            Self::Immediate => false,
            Self::At(at) => !condvar.wait_until(guard, at).timed_out(),
            Self::Never => {
                condvar.wait(guard);
                true
            }
        }
    }

    /// Park on `condvar` until `ready` holds or the budget is exhausted.
    ///
    /// `ready` is evaluated under the mutex before the first wait and after
    /// every wakeup, spurious or not. The condition gets one last look after
    /// the budget expires so a notification racing the timeout is not lost.
    pub fn wait_for<T, F>(
        self,
        condvar: &Condvar,
        guard: &mut MutexGuard<'_, T>,
        mut ready: F,
    ) -> bool
    where
        F: FnMut(&mut T) -> bool,
    {
        loop {
            if ready(&mut **guard) {
                return true;
            }
            if !self.wait(condvar, guard) {
                return ready(&mut **guard);
            }
        }
    }
}

/// Convert a floating-point timeout in seconds into the `acquire` form.
///
/// Negative and NaN values mean "wait indefinitely" and map to `None`, as do
/// values too large for a [`Duration`].
#[must_use]
pub fn timeout_from_secs(secs: f64) -> Option<Duration> {
    if secs.is_nan() || secs < 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(secs).ok()
}
