#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs, missing_debug_implementations)]

pub(crate) mod loom;

pub mod barrier;

#[doc(inline)]
pub use self::barrier::{Barrier, ResourceError, SyncError, WaitResult};
