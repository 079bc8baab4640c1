//! A reusable cyclic rendezvous point for a fixed set of threads.
//!
//! A [`Barrier`] is created for some number of participant threads, its
//! *threshold*. Each participant calls [`wait`](Barrier::wait), which
//! blocks until the threshold'th arrival. At that point every blocked
//! participant is released at once and the barrier re-arms itself for
//! the next cycle of the same threshold, so a single barrier can
//! coordinate an unbounded number of rounds.
//!
//! # Backends
//!
//! Two interchangeable backends implement the same contract:
//!
//! - `native`: delegates to the operating system's cyclic barrier
//!   (`pthread_barrier_t`) on targets that have one. Selected by
//!   default via the `os-barrier` feature.
//! - `generation`: a portable mutex + condition variable + generation
//!   counter implementation, used on targets without a native barrier,
//!   when the `os-barrier` feature is disabled, or under `cfg(loom)`.
//!
//! Backend selection happens at build time and is invisible to callers:
//! both backends have the same blocking semantics, the same
//! reusability, and the same error surface.
// Always compiled, so the algorithm is covered by tests on every
// target, but only reachable as `backend` where no native barrier is.
#[cfg_attr(
    all(
        feature = "os-barrier",
        not(loom),
        any(
            target_os = "linux",
            target_os = "android",
            target_os = "freebsd",
            target_os = "dragonfly",
            target_os = "netbsd",
            target_os = "openbsd",
        )
    ),
    allow(dead_code)
)]
pub(crate) mod generation;

#[cfg(all(
    not(loom),
    any(
        target_os = "linux",
        target_os = "android",
        target_os = "freebsd",
        target_os = "dragonfly",
        target_os = "netbsd",
        target_os = "openbsd",
    )
))]
#[cfg_attr(not(feature = "os-barrier"), allow(dead_code))]
pub(crate) mod native;


use core::fmt;
use std::{io, mem};

#[cfg(all(
    feature = "os-barrier",
    not(loom),
    any(
        target_os = "linux",
        target_os = "android",
        target_os = "freebsd",
        target_os = "dragonfly",
        target_os = "netbsd",
        target_os = "openbsd",
    )
))]
use self::native as backend;

#[cfg(not(all(
    feature = "os-barrier",
    not(loom),
    any(
        target_os = "linux",
        target_os = "android",
        target_os = "freebsd",
        target_os = "dragonfly",
        target_os = "netbsd",
        target_os = "openbsd",
    )
)))]
use self::generation as backend;

/// A reusable cyclic barrier synchronizing a fixed number of threads.
///
/// # Examples
///
/// ```
/// use monte_sync::Barrier;
/// use std::{sync::Arc, thread};
///
/// let barrier = Arc::new(Barrier::new(4).unwrap());
/// let threads = (0..4)
///     .map(|_| {
///         let barrier = barrier.clone();
///         thread::spawn(move || {
///             // everyone arrives before anyone proceeds...
///             barrier.wait().unwrap();
///             // ...and the barrier is immediately ready for reuse.
///             barrier.wait().unwrap();
///         })
///     })
///     .collect::<Vec<_>>();
///
/// for thread in threads {
///     thread.join().unwrap();
/// }
/// ```
pub struct Barrier {
    inner: backend::Barrier,
    threshold: usize,
}

/// Returned by [`Barrier::wait`] when a cycle completes.
///
/// Exactly one arrival per cycle is the *leader*, the one whose arrival
/// released everyone else. Most callers never need to distinguish the
/// leader from the other arrivals; both are equally successful waits.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct WaitResult {
    leader: bool,
}

/// An error allocating a [`Barrier`]'s backend resources.
///
/// Returned by [`Barrier::new`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ResourceError {
    /// The requested threshold was zero; a barrier must have at least
    /// one participant.
    #[error("barrier threshold must be at least one")]
    ZeroThreshold,

    /// The operating system could not create the underlying primitive.
    #[error("the OS could not allocate the barrier: {0}")]
    Os(#[from] io::Error),
}

/// An error from a [`Barrier`] synchronization operation.
///
/// Returned by [`Barrier::wait`] and [`Barrier::shutdown`]. These only
/// occur when the underlying primitive misbehaves or is misused; there
/// is no well-defined way for a participant to continue a rendezvous
/// after one, so callers typically treat them as fatal to the protocol.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SyncError {
    /// The barrier's internal lock was poisoned by a panicked thread.
    #[error("barrier lock was poisoned by a panicked thread")]
    Poisoned,

    /// The barrier still has threads blocked in [`Barrier::wait`].
    #[error("barrier still has threads waiting on it")]
    Busy,

    /// The operating system reported an error.
    #[error("barrier operation failed: {0}")]
    Os(#[source] io::Error),
}

// === impl Barrier ===

impl Barrier {
    /// Creates a barrier for exactly `threshold` participating threads.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::ZeroThreshold`] if `threshold` is zero.
    /// - [`ResourceError::Os`] if the backend primitive could not be
    ///   allocated.
    pub fn new(threshold: usize) -> Result<Self, ResourceError> {
        if threshold == 0 {
            return Err(ResourceError::ZeroThreshold);
        }

        Ok(Self {
            inner: backend::Barrier::new(threshold)?,
            threshold,
        })
    }

    /// Blocks the calling thread until all `threshold` participants
    /// have arrived, then releases every one of them and re-arms the
    /// barrier for the next cycle.
    ///
    /// Exactly one arrival per cycle observes
    /// [`WaitResult::is_leader`]` == true`; every arrival, leader
    /// included, returns success.
    ///
    /// Calling `wait` concurrently from *more* threads than the
    /// barrier's threshold is a protocol violation: the extra arrivals
    /// are counted toward the following cycle and may release it early.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncError`] if the underlying primitive fails. This
    /// indicates misuse (such as tearing the barrier down with a wait
    /// still pending) rather than anything a retry could fix.
    pub fn wait(&self) -> Result<WaitResult, SyncError> {
        self.inner.wait()
    }

    /// Returns the number of participating threads this barrier was
    /// created for.
    #[must_use]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Destroys the barrier's backend resources.
    ///
    /// Dropping a `Barrier` does this implicitly; `shutdown` exists for
    /// callers that want to observe a failure. Taking the barrier by
    /// value guarantees no thread can still be blocked in a borrowed
    /// [`wait`](Barrier::wait) call when the teardown runs.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Busy`] if the backend nevertheless refuses
    /// destruction because waiters exist. In that case the backend
    /// resources are leaked rather than destroyed out from under the
    /// waiting threads.
    pub fn shutdown(mut self) -> Result<(), SyncError> {
        match self.inner.shutdown() {
            Ok(()) => Ok(()),
            Err(error) => {
                // Never destroy a barrier that still has waiters; leak
                // it instead and let the caller decide what to do.
                mem::forget(self);
                Err(error)
            }
        }
    }
}

impl fmt::Debug for Barrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Barrier")
            .field("threshold", &self.threshold)
            .field("backend", &backend::NAME)
            .finish()
    }
}

// === impl WaitResult ===

impl WaitResult {
    pub(crate) const fn leader() -> Self {
        Self { leader: true }
    }

    pub(crate) const fn follower() -> Self {
        Self { leader: false }
    }

    /// Returns `true` if this thread's arrival is the one that released
    /// the current cycle.
    #[inline]
    #[must_use]
    pub fn is_leader(&self) -> bool {
        self.leader
    }
}
