//! Error taxonomy for lock handles.
//!
//! A timed-out acquisition is not an error: `acquire` reports it as `false`
//! and leaves the core untouched. Only misuse of a handle and a failed scoped
//! acquisition surface as [`LockError`].

use thiserror::Error;

/// Errors surfaced by [`Lock`](crate::Lock) handles.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockError {
    /// `release()` was called on a handle that does not hold the lock.
    #[error("cannot release un-acquired lock")]
    IllegalRelease,
    /// Scoped acquisition did not obtain the lock before its budget ran out.
    #[error("scoped acquisition did not obtain the lock")]
    LockNotAcquired,
}
