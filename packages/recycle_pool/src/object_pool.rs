use std::sync::Arc;
use std::{any, fmt};

use crossbeam_queue::SegQueue;
use tracing::{debug, trace};

use crate::{Error, PoolStats, Pooled, Record, RecordKind, Result, StatsCounters};

/// A thread-safe pool of reusable heap-allocated records of type `T`.
///
/// Records are handed out as [`Pooled<T>`] handles. A handle is returned to the pool either
/// explicitly via [`release()`](Self::release) or, if it was acquired with `retain` set,
/// automatically when it is dropped. Records that are acquired from an empty pool are allocated
/// with every byte set to zero.
///
/// Only struct-like [`Record`] types can be pooled. Creating a pool for anything else fails with
/// [`Error::InvalidType`], which makes it impossible to get a pool whose records cannot be
/// cleared or copied byte-wise.
///
/// This type acts as a cloneable handle to a shared pool instance. Multiple handles can exist
/// simultaneously and the underlying pool remains alive as long as at least one handle or one
/// [`Pooled<T>`] exists.
///
/// # Example
///
/// ```rust
/// use recycle_pool::{ObjectPool, Record};
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// struct Order {
///     id: u64,
///     quantity: u32,
/// }
///
/// // SAFETY: Integers only, all-zero valid.
/// unsafe impl Record for Order {}
///
/// let pool = ObjectPool::<Order>::new().unwrap();
///
/// let mut order = pool.acquire_zeroed(false);
/// order.id = 17;
/// order.quantity = 3;
///
/// let duplicate = pool.copy(&order, false);
/// assert_eq!(*duplicate, *order);
///
/// pool.release(order);
/// pool.release(duplicate);
/// assert_eq!(pool.len(), 2);
/// ```
///
/// # Thread safety
///
/// This type is thread-safe and can be safely shared across multiple threads. The free-list is
/// lock-free, so acquiring and releasing never block.
pub struct ObjectPool<T: Record> {
    core: Arc<ObjectPoolCore<T>>,
}

/// The shared state behind all [`ObjectPool`] handles and the [`Pooled`] records of one pool.
pub(crate) struct ObjectPoolCore<T: Record> {
    free: SegQueue<Box<T>>,
    stats: StatsCounters,
}

impl<T: Record> ObjectPoolCore<T> {
    #[expect(
        clippy::unnecessary_box_returns,
        reason = "free-lists store boxed records"
    )]
    fn take(&self) -> Box<T> {
        if let Some(item) = self.free.pop() {
            self.stats.record_hit();
            item
        } else {
            self.stats.record_miss();
            allocate_zeroed()
        }
    }

    pub(crate) fn recycle(&self, item: Box<T>) {
        self.free.push(item);
        self.stats.record_return();
    }
}

#[expect(
    clippy::unnecessary_box_returns,
    reason = "free-lists store boxed records"
)]
fn allocate_zeroed<T: Record>() -> Box<T> {
    // SAFETY: `Record` guarantees that all-zero bytes form a valid `T`.
    unsafe { Box::<T>::new_zeroed().assume_init() }
}

impl<T: Record> ObjectPool<T> {
    /// Creates a new empty pool for records of type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidType`] if `T` is not a struct record (for example a bare integer or
    /// an array) or if `T` is zero-sized.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::{Error, ObjectPool, Record};
    ///
    /// #[derive(Clone, Copy)]
    /// struct Header {
    ///     length: u32,
    ///     flags: u16,
    /// }
    ///
    /// // SAFETY: Integers only, all-zero valid.
    /// unsafe impl Record for Header {}
    ///
    /// assert!(ObjectPool::<Header>::new().is_ok());
    /// assert!(matches!(
    ///     ObjectPool::<u64>::new(),
    ///     Err(Error::InvalidType { .. })
    /// ));
    /// ```
    pub fn new() -> Result<Self> {
        let type_name = any::type_name::<T>();

        let problem = match T::KIND {
            RecordKind::Struct if size_of::<T>() == 0 => {
                Some("zero-sized records have no storage to recycle")
            }
            RecordKind::Struct => None,
            RecordKind::Scalar => Some("scalar types cannot be pooled, wrap them in a struct"),
            RecordKind::Array => Some("array types cannot be pooled, wrap them in a struct"),
        };

        if let Some(problem) = problem {
            return Err(Error::InvalidType { type_name, problem });
        }

        debug!(
            type_name,
            record_size = size_of::<T>(),
            "created object pool"
        );

        Ok(Self {
            core: Arc::new(ObjectPoolCore {
                free: SegQueue::new(),
                stats: StatsCounters::default(),
            }),
        })
    }

    /// The size in bytes of one record, equal to `size_of::<T>()`.
    #[must_use]
    #[inline]
    pub fn record_size(&self) -> usize {
        size_of::<T>()
    }

    /// Number of records waiting in the free-list.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.core.free.len()
    }

    /// Whether the free-list is empty.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.core.free.is_empty()
    }

    /// Returns a snapshot of the activity of this pool.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.core.stats.snapshot(self.core.free.len())
    }

    /// Acquires a record from the pool, allocating a new one if the pool is empty.
    ///
    /// The contents of a recycled record are whatever its previous user left in it. Use
    /// [`acquire_zeroed()`](Self::acquire_zeroed) or [`acquire_with()`](Self::acquire_with) if
    /// that matters.
    ///
    /// If `retain` is set, dropping the returned handle returns the record to the pool.
    /// Otherwise the record must be returned with [`release()`](Self::release) to be reused.
    #[must_use]
    pub fn acquire(&self, retain: bool) -> Pooled<T> {
        Pooled::new(self.core.take(), Arc::clone(&self.core), retain)
    }

    /// Acquires a record from the pool with every byte set to zero.
    ///
    /// See [`acquire()`](Self::acquire) for the meaning of `retain`.
    #[must_use]
    pub fn acquire_zeroed(&self, retain: bool) -> Pooled<T> {
        let mut item = self.acquire(retain);
        item.raw_view().zero();
        item
    }

    /// Acquires a record from the pool and initializes it with `init`.
    ///
    /// The record is not zeroed first, so this is the cheapest way to get a record in a known
    /// state when `init` overwrites every field anyway.
    ///
    /// See [`acquire()`](Self::acquire) for the meaning of `retain`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::{ObjectPool, Record};
    ///
    /// #[derive(Clone, Copy)]
    /// struct Span {
    ///     start: u64,
    ///     end: u64,
    /// }
    ///
    /// // SAFETY: Integers only, all-zero valid.
    /// unsafe impl Record for Span {}
    ///
    /// let pool = ObjectPool::<Span>::new().unwrap();
    ///
    /// let span = pool.acquire_with(false, |span| {
    ///     span.start = 10;
    ///     span.end = 20;
    /// });
    ///
    /// assert_eq!(span.end - span.start, 10);
    /// ```
    #[must_use]
    pub fn acquire_with<F>(&self, retain: bool, init: F) -> Pooled<T>
    where
        F: FnOnce(&mut T),
    {
        let mut item = self.acquire(retain);
        init(&mut *item);
        item
    }

    /// Acquires a record and copies every byte of `source` into it.
    ///
    /// The copy is independent of `source`: each can be released or dropped without affecting
    /// the other. See [`acquire()`](Self::acquire) for the meaning of `retain`.
    #[must_use]
    pub fn copy(&self, source: &T, retain: bool) -> Pooled<T> {
        let mut item = self.acquire(retain);
        item.raw_view().copy_from(source);
        item
    }

    /// Returns a record to the pool.
    ///
    /// Accepts either a [`Pooled<T>`] or an [`Option<Pooled<T>>`]; releasing `None` does nothing.
    /// Any pending automatic return of a retained record is cancelled, so the record enters the
    /// free-list exactly once.
    ///
    /// The record always goes back to the pool it was acquired from, even if that is a different
    /// pool for the same type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::{ObjectPool, Pooled, Record};
    ///
    /// #[derive(Clone, Copy)]
    /// struct Token {
    ///     value: u32,
    /// }
    ///
    /// // SAFETY: A single integer, all-zero valid.
    /// unsafe impl Record for Token {}
    ///
    /// let pool = ObjectPool::<Token>::new().unwrap();
    ///
    /// let token = pool.acquire(true);
    /// pool.release(token);
    /// assert_eq!(pool.len(), 1);
    ///
    /// let nothing: Option<Pooled<Token>> = None;
    /// pool.release(nothing);
    /// assert_eq!(pool.len(), 1);
    /// ```
    pub fn release(&self, item: impl Into<Option<Pooled<T>>>) {
        let Some(item) = item.into() else {
            return;
        };

        if !item.is_from(&self.core) {
            trace!(
                type_name = any::type_name::<T>(),
                "record released to a pool it was not acquired from"
            );
        }

        item.release();
    }
}

impl<T: Record> Clone for ObjectPool<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T: Record> fmt::Debug for ObjectPool<T> {
    #[cfg_attr(test, mutants::skip)] // Informational output only, mutations are not observable.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("item_type", &format_args!("{}", any::type_name::<T>()))
            .field("record_size", &self.record_size())
            .field("free", &self.len())
            .finish()
    }
}
