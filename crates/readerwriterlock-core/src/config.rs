//! Fairness policy selection.
//!
//! Code that picks its policy at compile time uses the typed facades
//! ([`ReaderPriorityLock`](crate::ReaderPriorityLock) and friends) directly.
//! Code that wants the choice made by deployment uses
//! [`AnyRwLock::from_env`](crate::AnyRwLock::from_env), which consults the
//! `READERWRITERLOCK_POLICY` environment variable:
//! - `fair` (default): strict arrival order, no starvation.
//! - `reader`: reader priority, writers may starve.
//! - `writer`: writer priority, readers may starve.

use std::fmt;
use std::sync::OnceLock;

use log::{debug, warn};

/// Environment variable consulted by [`configured_policy`].
pub const POLICY_ENV_VAR: &str = "READERWRITERLOCK_POLICY";

/// The three classical readers-writers fairness policies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Readers never wait behind a writer once any reader is inside.
    ReaderPriority,
    /// Once a writer is waiting, no new reader is admitted ahead of it.
    WriterPriority,
    /// Requests are served in arrival order regardless of role.
    #[default]
    Fair,
}

impl Policy {
    /// All policies, in declaration order.
    pub const ALL: [Self; 3] = [Self::ReaderPriority, Self::WriterPriority, Self::Fair];

    /// Parse a policy name (case-insensitive, common aliases accepted).
    #[must_use]
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "reader" | "read" | "reader-priority" | "readers" | "first" => {
                Some(Self::ReaderPriority)
            }
            "writer" | "write" | "writer-priority" | "writers" | "second" => {
                Some(Self::WriterPriority)
            }
            "fair" | "fifo" | "ticket" | "third" => Some(Self::Fair),
            _ => None,
        }
    }

    /// Canonical name, accepted back by [`from_str_loose`](Self::from_str_loose).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReaderPriority => "reader-priority",
            Self::WriterPriority => "writer-priority",
            Self::Fair => "fair",
        }
    }

    /// Returns true if this policy can starve writers.
    #[must_use]
    pub const fn writers_may_starve(self) -> bool {
        matches!(self, Self::ReaderPriority)
    }

    /// Returns true if this policy can starve readers.
    #[must_use]
    pub const fn readers_may_starve(self) -> bool {
        matches!(self, Self::WriterPriority)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve an optional raw environment value to a policy.
///
/// Unset means the default; an unrecognised value falls back to the default
/// with a warning.
#[must_use]
pub fn parse_policy(raw: Option<&str>) -> Policy {
    match raw {
        None => Policy::default(),
        Some(value) => Policy::from_str_loose(value).unwrap_or_else(|| {
            warn!(
                "{POLICY_ENV_VAR}={value:?} is not a known policy, using {}",
                Policy::default()
            );
            Policy::default()
        }),
    }
}

static CONFIGURED: OnceLock<Policy> = OnceLock::new();

/// The process-wide default policy (reads the environment on first call,
/// caches thereafter).
#[must_use]
pub fn configured_policy() -> Policy {
    *CONFIGURED.get_or_init(|| {
        let raw = std::env::var(POLICY_ENV_VAR).ok();
        let policy = parse_policy(raw.as_deref());
        debug!("resolved default lock policy: {policy}");
        policy
    })
}
