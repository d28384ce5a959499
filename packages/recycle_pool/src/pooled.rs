use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::{any, fmt, ptr};

use crate::{ObjectPoolCore, RawView, Record, RetentionHook};

/// An exclusively owned record acquired from an [`ObjectPool`][crate::ObjectPool].
///
/// The handle dereferences to the record. No other handle refers to the same record while this
/// one exists, so the record can be read and written freely.
///
/// What happens when the handle goes away depends on whether it is retained:
///
/// * [`ObjectPool::release()`][crate::ObjectPool::release] always returns the record to the pool.
/// * Dropping a **retained** handle returns the record to the pool automatically. This is a
///   safety net for callers that forget to release.
/// * Dropping a handle that is **not retained** deallocates the record. It is not pooled.
///
/// Either way, a record is returned to its pool at most once.
///
/// # Thread safety
///
/// [`Pooled<T>`] is [`Send`] because records are [`Send`], and [`Sync`] if `T` is [`Sync`].
/// The retention state may be changed through a shared reference from any thread.
///
/// # Example
///
/// ```rust
/// use recycle_pool::{ObjectPool, Record};
///
/// #[derive(Clone, Copy)]
/// struct Counter {
///     hits: u64,
/// }
///
/// // SAFETY: A single integer, all-zero valid.
/// unsafe impl Record for Counter {}
///
/// let pool = ObjectPool::<Counter>::new().unwrap();
///
/// {
///     let mut counter = pool.acquire_zeroed(true);
///     counter.hits += 1;
///     assert!(counter.is_retained());
/// } // Retained, so the record goes back to the pool here.
///
/// assert_eq!(pool.len(), 1);
/// ```
pub struct Pooled<T: Record> {
    /// Taken out exactly once, by `Drop` or by `detach()`.
    item: ManuallyDrop<Box<T>>,

    /// The pool the record came from. This is where it is returned to.
    pool: Arc<ObjectPoolCore<T>>,

    retention: RetentionHook,
}

impl<T: Record> Pooled<T> {
    #[must_use]
    pub(crate) fn new(item: Box<T>, pool: Arc<ObjectPoolCore<T>>, retain: bool) -> Self {
        Self {
            item: ManuallyDrop::new(item),
            pool,
            retention: RetentionHook::new(retain),
        }
    }

    /// Whether dropping this handle will return the record to its pool.
    #[must_use]
    #[inline]
    pub fn is_retained(&self) -> bool {
        self.retention.is_armed()
    }

    /// Makes dropping this handle return the record to its pool.
    ///
    /// Returns `false` if the handle was already retained, in which case nothing changes.
    #[inline]
    pub fn retain(&self) -> bool {
        self.retention.arm()
    }

    /// Stops dropping this handle from returning the record to its pool.
    ///
    /// Returns `true` if the handle was retained before the call.
    #[inline]
    pub fn disarm_retention(&self) -> bool {
        self.retention.disarm()
    }

    /// Takes the record out of pool management.
    ///
    /// The record will not be returned to the pool, no matter whether the handle was retained.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::{ObjectPool, Record};
    ///
    /// #[derive(Clone, Copy)]
    /// struct Slot {
    ///     value: u32,
    /// }
    ///
    /// // SAFETY: A single integer, all-zero valid.
    /// unsafe impl Record for Slot {}
    ///
    /// let pool = ObjectPool::<Slot>::new().unwrap();
    ///
    /// let slot = pool.acquire_with(true, |slot| slot.value = 5);
    /// let owned: Box<Slot> = slot.detach();
    ///
    /// assert_eq!(owned.value, 5);
    /// assert!(pool.is_empty());
    /// ```
    #[must_use]
    pub fn detach(self) -> Box<T> {
        let mut this = ManuallyDrop::new(self);

        // SAFETY: `this` is never dropped and never used again after we move the fields out,
        // so each field is moved out exactly once.
        let item = unsafe { ManuallyDrop::take(&mut this.item) };
        // SAFETY: See above.
        let pool = unsafe { ptr::read(&this.pool) };

        drop(pool);
        item
    }

    /// Returns the record to its pool.
    pub(crate) fn release(self) {
        // The drop path is the only place that returns records. Forcing the hook on routes this
        // handle through it, and the hook guarantees it fires exactly once.
        self.retention.arm();
        drop(self);
    }

    pub(crate) fn raw_view(&mut self) -> RawView<'_, T> {
        RawView::new(&mut **self.item)
    }

    pub(crate) fn is_from(&self, pool: &Arc<ObjectPoolCore<T>>) -> bool {
        Arc::ptr_eq(&self.pool, pool)
    }
}

impl<T: Record> Deref for Pooled<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.item
    }
}

impl<T: Record> DerefMut for Pooled<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.item
    }
}

impl<T: Record> Drop for Pooled<T> {
    fn drop(&mut self) {
        // SAFETY: This is the only place besides `detach()` that takes the item and `detach()`
        // prevents this destructor from running. The handle is not used after this.
        let item = unsafe { ManuallyDrop::take(&mut self.item) };

        if self.retention.disarm() {
            self.pool.recycle(item);
        }
    }
}

impl<T: Record> fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pooled")
            .field("item_type", &format_args!("{}", any::type_name::<T>()))
            .field("retained", &self.is_retained())
            .finish_non_exhaustive()
    }
}
