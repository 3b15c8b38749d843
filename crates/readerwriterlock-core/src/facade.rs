//! Top-level lock facades.
//!
//! A facade owns one core and hands out read and write handles that share it.
//! Facades never share state with each other, even when they use the same
//! policy.

use std::fmt;
use std::sync::Arc;

use crate::config::{Policy, configured_policy};
use crate::cores::{CoreSnapshot, FairCore, LockCore, ReaderPriorityCore, WriterPriorityCore};
use crate::handle::{Handle, Lock, ReadHandle, WriteHandle};

/// Reader-writer lock over core `C`.
pub struct RwLock<C: LockCore> {
    core: Arc<C>,
}

/// Reader-priority lock (first readers-writers problem).
pub type ReaderPriorityLock = RwLock<ReaderPriorityCore>;
/// Writer-priority lock (second readers-writers problem).
pub type WriterPriorityLock = RwLock<WriterPriorityCore>;
/// Fair, strict arrival-order lock (third readers-writers problem).
pub type FairLock = RwLock<FairCore>;

impl<C: LockCore + Default> RwLock<C> {
    /// Create a lock with a fresh core.
    #[must_use]
    pub fn new() -> Self {
        Self::from_core(C::default())
    }
}

impl<C: LockCore + Default> Default for RwLock<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: LockCore> RwLock<C> {
    /// Wrap a core built by the caller, for cores that need arguments or
    /// custom implementations of [`LockCore`].
    #[must_use]
    pub fn from_core(core: C) -> Self {
        Self {
            core: Arc::new(core),
        }
    }

    /// Hand out a new reader handle bound to this lock's core.
    #[must_use]
    pub fn generate_read_lock(&self) -> ReadHandle<C> {
        Handle::new(Arc::clone(&self.core))
    }

    /// Hand out a new writer handle bound to this lock's core.
    #[must_use]
    pub fn generate_write_lock(&self) -> WriteHandle<C> {
        Handle::new(Arc::clone(&self.core))
    }

    /// The fairness policy of this lock.
    #[must_use]
    pub const fn policy(&self) -> Policy {
        C::POLICY
    }

    /// Current bookkeeping of the shared core.
    #[must_use]
    pub fn snapshot(&self) -> CoreSnapshot {
        self.core.snapshot()
    }
}

impl<C: LockCore> fmt::Debug for RwLock<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RwLock")
            .field("policy", &C::POLICY)
            .field("handles", &(Arc::strong_count(&self.core) - 1))
            .finish()
    }
}

/// A lock whose policy is chosen at runtime.
#[derive(Debug)]
pub enum AnyRwLock {
    ReaderPriority(ReaderPriorityLock),
    WriterPriority(WriterPriorityLock),
    Fair(FairLock),
}

impl AnyRwLock {
    /// Create a lock using `policy`.
    #[must_use]
    pub fn new(policy: Policy) -> Self {
        match policy {
            Policy::ReaderPriority => Self::ReaderPriority(RwLock::new()),
            Policy::WriterPriority => Self::WriterPriority(RwLock::new()),
            Policy::Fair => Self::Fair(RwLock::new()),
        }
    }

    /// Create a lock using the policy configured in the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(configured_policy())
    }

    /// The policy this lock was created with.
    #[must_use]
    pub const fn policy(&self) -> Policy {
        match self {
            Self::ReaderPriority(_) => Policy::ReaderPriority,
            Self::WriterPriority(_) => Policy::WriterPriority,
            Self::Fair(_) => Policy::Fair,
        }
    }

    /// Hand out a new type-erased reader handle.
    #[must_use]
    pub fn generate_read_lock(&self) -> Box<dyn Lock + Send> {
        match self {
            Self::ReaderPriority(lock) => Box::new(lock.generate_read_lock()),
            Self::WriterPriority(lock) => Box::new(lock.generate_read_lock()),
            Self::Fair(lock) => Box::new(lock.generate_read_lock()),
        }
    }

    /// Hand out a new type-erased writer handle.
    #[must_use]
    pub fn generate_write_lock(&self) -> Box<dyn Lock + Send> {
        match self {
            Self::ReaderPriority(lock) => Box::new(lock.generate_write_lock()),
            Self::WriterPriority(lock) => Box::new(lock.generate_write_lock()),
            Self::Fair(lock) => Box::new(lock.generate_write_lock()),
        }
    }

    /// Current bookkeeping of the underlying core.
    #[must_use]
    pub fn snapshot(&self) -> CoreSnapshot {
        match self {
            Self::ReaderPriority(lock) => lock.snapshot(),
            Self::WriterPriority(lock) => lock.snapshot(),
            Self::Fair(lock) => lock.snapshot(),
        }
    }
}

impl From<Policy> for AnyRwLock {
    fn from(policy: Policy) -> Self {
        Self::new(policy)
    }
}
