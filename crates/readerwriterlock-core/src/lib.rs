//! # readerwriterlock-core
//!
//! Reader-writer locks under the three classical fairness policies, behind
//! one blocking/timeout interface.
//!
//! - [`ReaderPriorityLock`]: readers never queue behind a waiting writer once
//!   a reader is inside. Writers may starve.
//! - [`WriterPriorityLock`]: once a writer is waiting, newly arriving readers
//!   queue behind it. Readers may starve.
//! - [`FairLock`]: requests are served strictly in arrival order.
//!
//! A facade hands out any number of read and write handles sharing its core.
//! Handles implement [`Lock`]: `acquire(blocking, timeout) -> bool` and
//! `release() -> Result<(), LockError>`, plus scoped acquisition.
//!
//! ```
//! use std::time::Duration;
//!
//! use readerwriterlock_core::{FairLock, Lock};
//!
//! let lock = FairLock::new();
//! let mut reader = lock.generate_read_lock();
//! let mut writer = lock.generate_write_lock();
//!
//! assert!(reader.acquire(true, None));
//! assert!(!writer.acquire(true, Some(Duration::from_millis(10))));
//! reader.release().unwrap();
//!
//! writer.with_lock(|| { /* exclusive access */ }).unwrap();
//! ```
//!
//! The locks protect a resource the caller owns; they never touch it. The
//! caller accesses it only between a successful `acquire` and the matching
//! `release`. Acquisition is not reentrant: taking a write handle while the
//! same thread holds a read handle on the same lock may deadlock.

#![forbid(unsafe_code)]

pub mod config;
pub mod cores;
pub mod deadline;
pub mod error;
pub mod facade;
pub mod gate;
pub mod handle;

pub use config::{Policy, configured_policy};
pub use cores::{CoreSnapshot, FairCore, LockCore, ReaderPriorityCore, WriterPriorityCore};
pub use deadline::{Deadline, timeout_from_secs};
pub use error::LockError;
pub use facade::{AnyRwLock, FairLock, ReaderPriorityLock, RwLock, WriterPriorityLock};
pub use handle::{Handle, Lock, ReadHandle, ScopedLock, WriteHandle};
