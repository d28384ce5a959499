use std::sync::atomic::{AtomicUsize, Ordering};

/// A point-in-time snapshot of the activity of one pool.
///
/// Counters are updated with relaxed atomics, so a snapshot taken while other threads are using
/// the pool is approximate. Snapshots taken while the pool is quiescent are exact.
///
/// # Example
///
/// ```rust
/// use recycle_pool::BytePool;
///
/// let pool = BytePool::new(256);
///
/// let buffer = pool.acquire();
/// pool.release(buffer);
/// let _buffer = pool.acquire();
///
/// let stats = pool.stats();
/// assert_eq!(stats.misses(), 1);
/// assert_eq!(stats.hits(), 1);
/// assert_eq!(stats.returns(), 1);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PoolStats {
    free: usize,
    hits: usize,
    misses: usize,
    returns: usize,
    rejected: usize,
}

impl PoolStats {
    /// Number of items currently waiting in the free-list.
    #[must_use]
    #[inline]
    pub fn free(&self) -> usize {
        self.free
    }

    /// Number of acquisitions served by reusing an item from the free-list.
    #[must_use]
    #[inline]
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Number of acquisitions that had to allocate a new item.
    #[must_use]
    #[inline]
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Number of items returned to the free-list.
    #[must_use]
    #[inline]
    pub fn returns(&self) -> usize {
        self.returns
    }

    /// Number of items offered to the pool but dropped because they did not fit it.
    #[must_use]
    #[inline]
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Fraction of acquisitions served from the free-list, from 0.0 to 1.0.
    ///
    /// Returns 0.0 if nothing has been acquired yet.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "a ratio does not need every bit of a large counter"
    )]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits.saturating_add(self.misses);

        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// The live counters behind [`PoolStats`].
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    hits: AtomicUsize,
    misses: AtomicUsize,
    returns: AtomicUsize,
    rejected: AtomicUsize,
}

impl StatsCounters {
    #[inline]
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_return(&self) {
        self.returns.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_rejection(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, free: usize) -> PoolStats {
        PoolStats {
            free,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            returns: self.returns.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}
