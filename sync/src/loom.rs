//! Re-exports of either the real `std` synchronization types or their
//! [`loom`] mocks, depending on whether `cfg(loom)` is set.
//!
//! The portable barrier backend is written entirely against this module,
//! so the exact code that ships is what the loom models exercise.
#[allow(unused_imports)]
pub(crate) use self::inner::*;

#[cfg(loom)]
mod inner {
    #![allow(dead_code, unused_imports)]

    pub(crate) use loom::{model, thread};

    pub(crate) mod sync {
        pub(crate) use loom::sync::*;
    }
}

#[cfg(not(loom))]
mod inner {
    #![allow(dead_code, unused_imports)]

    pub(crate) mod sync {
        pub(crate) use std::sync::*;
    }

    #[cfg(test)]
    pub(crate) use std::thread;

    #[cfg(test)]
    pub(crate) fn model(f: impl FnOnce()) {
        f()
    }
}
