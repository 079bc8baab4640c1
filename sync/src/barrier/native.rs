//! Native barrier backend: delegates to the operating system's cyclic
//! barrier, `pthread_barrier_t`.
//!
//! The OS primitive already implements the full contract, including
//! re-arming after each release, so this backend is a thin errno
//! translation layer. `pthread_barrier_wait` reports the releasing
//! thread with `PTHREAD_BARRIER_SERIAL_THREAD` rather than `0`; both
//! are success, mapped to the leader and follower [`WaitResult`]s.
use super::{ResourceError, SyncError, WaitResult};
use core::fmt;
use std::{cell::UnsafeCell, io, mem, ptr};

pub(crate) struct Barrier {
    // Boxed so the barrier has a stable address for its whole life:
    // waiters hold pointers into it (glibc parks them on a futex word
    // inside the struct), so it must never move once initialized.
    raw: Box<UnsafeCell<libc::pthread_barrier_t>>,
    initialized: bool,
}

pub(super) const NAME: &str = "pthread_barrier_t";

/// Safety: `pthread_barrier_t` is explicitly designed to be shared
/// across (and blocked on from) multiple threads.
unsafe impl Send for Barrier {}
unsafe impl Sync for Barrier {}

// === impl Barrier ===

impl Barrier {
    /// `threshold` must be nonzero; the public `Barrier::new` checks.
    pub(crate) fn new(threshold: usize) -> Result<Self, ResourceError> {
        debug_assert!(threshold > 0);
        let count = libc::c_uint::try_from(threshold)
            .map_err(|_| ResourceError::Os(io::Error::from_raw_os_error(libc::EINVAL)))?;

        let raw = Box::new(UnsafeCell::new(unsafe {
            mem::zeroed::<libc::pthread_barrier_t>()
        }));
        let errno = unsafe { libc::pthread_barrier_init(raw.get(), ptr::null(), count) };
        if errno != 0 {
            return Err(ResourceError::Os(io::Error::from_raw_os_error(errno)));
        }

        Ok(Self {
            raw,
            initialized: true,
        })
    }

    pub(crate) fn wait(&self) -> Result<WaitResult, SyncError> {
        match unsafe { libc::pthread_barrier_wait(self.raw.get()) } {
            0 => Ok(WaitResult::follower()),
            libc::PTHREAD_BARRIER_SERIAL_THREAD => Ok(WaitResult::leader()),
            errno => Err(SyncError::Os(io::Error::from_raw_os_error(errno))),
        }
    }

    pub(crate) fn shutdown(&mut self) -> Result<(), SyncError> {
        if !self.initialized {
            return Ok(());
        }

        match unsafe { libc::pthread_barrier_destroy(self.raw.get()) } {
            0 => {
                self.initialized = false;
                Ok(())
            }
            libc::EBUSY => Err(SyncError::Busy),
            errno => Err(SyncError::Os(io::Error::from_raw_os_error(errno))),
        }
    }
}

impl Drop for Barrier {
    fn drop(&mut self) {
        // Destruction failures cannot be reported from drop; `shutdown`
        // is the observable path.
        let _ = self.shutdown();
    }
}

impl fmt::Debug for Barrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("native::Barrier")
            .field("backend", &NAME)
            .finish_non_exhaustive()
    }
}
