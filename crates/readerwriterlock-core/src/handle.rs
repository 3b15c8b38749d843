//! Uniform lock interface and the per-role handles that implement it.
//!
//! Every handle speaks the same two-operation contract, [`Lock`]: `acquire`
//! with a blocking flag and optional timeout, and `release`. Scoped
//! acquisition ([`Lock::scoped`], [`Lock::with_lock`]) is layered on top of
//! that contract once, for every implementor.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use log::trace;

use crate::cores::LockCore;
use crate::deadline::Deadline;
use crate::error::LockError;

/// Blocking/timeout lock contract shared by read and write handles.
pub trait Lock {
    /// Try to enter.
    ///
    /// With `blocking = false` the call never waits and succeeds only if
    /// entry is possible right now. Otherwise it waits up to `timeout`, or
    /// indefinitely when `timeout` is `None`. Returns false if the wait ran
    /// out; the core is then exactly as it was before the call. A handle
    /// holds at most one acquisition: calling this while [`locked`] already
    /// returns true is refused with `false` and leaves the core untouched.
    ///
    /// [`locked`]: Lock::locked
    fn acquire(&mut self, blocking: bool, timeout: Option<Duration>) -> bool;

    /// Leave. Fails with [`LockError::IllegalRelease`] if this handle does
    /// not hold the lock.
    fn release(&mut self) -> Result<(), LockError>;

    /// Returns true if this handle currently holds the lock.
    fn locked(&self) -> bool;

    /// Acquire (blocking, no timeout) for the lifetime of the returned guard.
    fn scoped(&mut self) -> Result<ScopedLock<'_, Self>, LockError>
    where
        Self: Sized,
    {
        self.scoped_timeout(None)
    }

    /// Bounded form of [`scoped`](Lock::scoped).
    ///
    /// Returns [`LockError::LockNotAcquired`] if `timeout` elapses first.
    fn scoped_timeout(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<ScopedLock<'_, Self>, LockError>
    where
        Self: Sized,
    {
        if self.acquire(true, timeout) {
            Ok(ScopedLock { lock: self })
        } else {
            Err(LockError::LockNotAcquired)
        }
    }

    /// Run `f` under scoped acquisition. The lock is released on every exit
    /// path, including unwinding out of `f`.
    fn with_lock<R, F>(&mut self, f: F) -> Result<R, LockError>
    where
        Self: Sized,
        F: FnOnce() -> R,
    {
        let _scope = self.scoped()?;
        Ok(f())
    }
}

impl<L: Lock + ?Sized> Lock for Box<L> {
    fn acquire(&mut self, blocking: bool, timeout: Option<Duration>) -> bool {
        (**self).acquire(blocking, timeout)
    }

    fn release(&mut self) -> Result<(), LockError> {
        (**self).release()
    }

    fn locked(&self) -> bool {
        (**self).locked()
    }
}

/// Guard returned by [`Lock::scoped`]; releases the lock when dropped.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct ScopedLock<'a, L: Lock + ?Sized> {
    lock: &'a mut L,
}

impl<L: Lock + ?Sized> fmt::Debug for ScopedLock<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedLock")
            .field("locked", &self.lock.locked())
            .finish()
    }
}

impl<L: Lock + ?Sized> Drop for ScopedLock<'_, L> {
    fn drop(&mut self) {
        // The guard holds the only borrow of the handle, so the hold taken in
        // `scoped_timeout` is still in place.
        let released = self.lock.release();
        debug_assert!(released.is_ok(), "scoped lock lost its hold");
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Which side of a core a handle drives. Sealed; see [`Read`] and [`Write`].
pub trait Side: sealed::Sealed + 'static {
    /// Role name used in diagnostics.
    const NAME: &'static str;

    #[doc(hidden)]
    fn enter<C: LockCore>(core: &C, deadline: Deadline) -> bool;

    #[doc(hidden)]
    fn leave<C: LockCore>(core: &C);
}

/// Reader side marker.
#[derive(Debug)]
pub enum Read {}

/// Writer side marker.
#[derive(Debug)]
pub enum Write {}

impl sealed::Sealed for Read {}
impl sealed::Sealed for Write {}

impl Side for Read {
    const NAME: &'static str = "read";

    fn enter<C: LockCore>(core: &C, deadline: Deadline) -> bool {
        core.acquire_read(deadline)
    }

    fn leave<C: LockCore>(core: &C) {
        core.release_read();
    }
}

impl Side for Write {
    const NAME: &'static str = "write";

    fn enter<C: LockCore>(core: &C, deadline: Deadline) -> bool {
        core.acquire_write(deadline)
    }

    fn leave<C: LockCore>(core: &C) {
        core.release_write();
    }
}

/// A handle bound to one shared core, driving one side of its protocol.
///
/// Handles are cheap; a facade hands out as many as needed and they all share
/// the facade's core. A handle still holding the lock when dropped releases
/// it.
pub struct Handle<C: LockCore, S: Side> {
    core: Arc<C>,
    held: bool,
    _side: PhantomData<fn() -> S>,
}

/// Reader handle produced by `generate_read_lock`.
pub type ReadHandle<C> = Handle<C, Read>;
/// Writer handle produced by `generate_write_lock`.
pub type WriteHandle<C> = Handle<C, Write>;

impl<C: LockCore, S: Side> Handle<C, S> {
    pub(crate) fn new(core: Arc<C>) -> Self {
        Self {
            core,
            held: false,
            _side: PhantomData,
        }
    }
}

impl<C: LockCore, S: Side> Lock for Handle<C, S> {
    fn acquire(&mut self, blocking: bool, timeout: Option<Duration>) -> bool {
        if self.held {
            trace!("{} {} handle already holds the lock", C::POLICY, S::NAME);
            return false;
        }
        self.held = S::enter(&*self.core, Deadline::new(blocking, timeout));
        self.held
    }

    fn release(&mut self) -> Result<(), LockError> {
        if !self.held {
            return Err(LockError::IllegalRelease);
        }
        self.held = false;
        S::leave(&*self.core);
        Ok(())
    }

    fn locked(&self) -> bool {
        self.held
    }
}

impl<C: LockCore, S: Side> Drop for Handle<C, S> {
    fn drop(&mut self) {
        if self.held {
            trace!("{} {} handle dropped while held", C::POLICY, S::NAME);
            self.held = false;
            S::leave(&*self.core);
        }
    }
}

impl<C: LockCore, S: Side> fmt::Debug for Handle<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("policy", &C::POLICY)
            .field("side", &S::NAME)
            .field("held", &self.held)
            .finish()
    }
}
