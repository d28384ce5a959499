#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Thread-safe pools for recycling byte buffers and fixed-layout records.
//!
//! Allocating and freeing short-lived memory at a high rate is wasteful. This crate keeps
//! released memory in lock-free free-lists so that later requests can reuse it.
//!
//! # Byte buffers
//!
//! [`BytePool`] recycles `Vec<u8>` buffers of a single power-of-two size class. A
//! [`PoolRegistry`] holds one [`BytePool`] for every size class between [`MIN_SIZE`] and
//! [`MAX_SIZE`] and routes each request to the smallest class that fits it.
//!
//! ```rust
//! use recycle_pool::PoolRegistry;
//!
//! let registry = PoolRegistry::global();
//!
//! let mut buffer = registry.acquire_zeroed(100);
//! assert_eq!(buffer.len(), 128);
//! buffer[0] = 0xFF;
//!
//! registry.release(buffer);
//!
//! // Zeroed acquisitions never observe what the previous user left behind.
//! let buffer = registry.acquire_zeroed(100);
//! assert_eq!(buffer[0], 0);
//! ```
//!
//! # Records
//!
//! [`ObjectPool<T>`] recycles heap-allocated records of a [`Record`] type, handing them out as
//! exclusively owned [`Pooled<T>`] handles. Records can be cleared, initialized or copied from
//! another record on acquisition.
//!
//! A record acquired with `retain` set is returned to the pool automatically when its handle is
//! dropped. An explicit [`ObjectPool::release()`] is always honored and cancels the automatic
//! return, so every record enters the free-list at most once per acquisition.
//!
//! ```rust
//! use recycle_pool::{ObjectPool, Record};
//!
//! #[derive(Clone, Copy, Debug, PartialEq)]
//! struct Trade {
//!     price: u64,
//!     volume: u32,
//! }
//!
//! // SAFETY: Integers only, all-zero valid.
//! unsafe impl Record for Trade {}
//!
//! let pool = ObjectPool::<Trade>::new().unwrap();
//!
//! let trade = pool.acquire_with(true, |trade| {
//!     trade.price = 1200;
//!     trade.volume = 5;
//! });
//!
//! let copy = pool.copy(&trade, false);
//! assert_eq!(*copy, *trade);
//!
//! pool.release(copy);
//! drop(trade); // Retained, so this returns the record too.
//!
//! assert_eq!(pool.len(), 2);
//! ```
//!
//! # Observability
//!
//! Every pool exposes a [`PoolStats`] snapshot of its hit, miss and return counters. Pool
//! creation is logged at `debug` level and dropped memory at `trace` level via [`tracing`].
//!
//! [`tracing`]: https://docs.rs/tracing

mod byte_pool;
mod error;
mod object_pool;
mod pooled;
mod raw_view;
mod record;
mod registry;
mod registry_builder;
mod retention;
mod size_class;
mod stats;

pub use byte_pool::BytePool;
pub use error::Error;
pub(crate) use error::Result;
pub use object_pool::ObjectPool;
pub(crate) use object_pool::ObjectPoolCore;
pub use pooled::Pooled;
pub use raw_view::RawView;
pub use record::{Record, RecordKind};
pub use registry::PoolRegistry;
pub use registry_builder::PoolRegistryBuilder;
pub(crate) use retention::RetentionHook;
pub use size_class::{MAX_SIZE, MIN_SIZE, class_for, round_up_power_of_two};
pub use stats::PoolStats;
pub(crate) use stats::StatsCounters;
