//! Portable barrier backend: a mutex, a condition variable, and a
//! generation counter.
//!
//! A naive "count arrivals down to zero, then reset" barrier has a
//! race once it is reused: a fast thread arriving for the *next* cycle
//! can decrement the counter before a slow thread from the *current*
//! cycle has finished checking it. The classic fix is sense reversal:
//! each waiter captures the cycle's generation number before blocking
//! and waits for the *generation* to change, not for the counter to hit
//! any particular value. An arrival from a future cycle can never make
//! the captured generation compare equal again.
use super::{ResourceError, SyncError, WaitResult};
use crate::loom::sync::{Condvar, Mutex};
use core::fmt;

pub(crate) struct Barrier {
    threshold: usize,
    state: Mutex<State>,
    cvar: Condvar,
}

#[derive(Debug)]
struct State {
    /// Arrivals still expected before the current cycle releases.
    count: usize,
    /// Which cycle we are on. Wraps on overflow; equality with a
    /// captured value is all that matters.
    generation: u64,
}

pub(super) const NAME: &str = "generation";

// === impl Barrier ===

impl Barrier {
    /// `threshold` must be nonzero; the public `Barrier::new` checks.
    pub(crate) fn new(threshold: usize) -> Result<Self, ResourceError> {
        debug_assert!(threshold > 0);
        Ok(Self {
            threshold,
            state: Mutex::new(State {
                count: threshold,
                generation: 0,
            }),
            cvar: Condvar::new(),
        })
    }

    pub(crate) fn wait(&self) -> Result<WaitResult, SyncError> {
        let mut state = self.state.lock().map_err(|_| SyncError::Poisoned)?;
        let generation = state.generation;

        state.count -= 1;
        if state.count == 0 {
            // Last arrival: advance the generation, re-arm for the next
            // cycle, and release everyone parked on the condvar.
            state.generation = state.generation.wrapping_add(1);
            state.count = self.threshold;
            tracing::trace!(generation, threshold = self.threshold, "barrier released");
            self.cvar.notify_all();
            return Ok(WaitResult::leader());
        }

        tracing::trace!(generation, remaining = state.count, "waiting at barrier");
        // Re-check on every wakeup: condvars may wake spuriously, and a
        // wakeup may belong to a later cycle's release.
        while state.generation == generation {
            state = self.cvar.wait(state).map_err(|_| SyncError::Poisoned)?;
        }

        Ok(WaitResult::follower())
    }

    pub(crate) fn shutdown(&mut self) -> Result<(), SyncError> {
        let state = self.state.lock().map_err(|_| SyncError::Poisoned)?;
        if state.count != self.threshold {
            return Err(SyncError::Busy);
        }
        // Nothing to deallocate eagerly; the mutex and condvar are
        // reclaimed when the barrier is dropped.
        Ok(())
    }
}

impl fmt::Debug for Barrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("generation::Barrier")
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}
