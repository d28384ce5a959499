use crossbeam_queue::SegQueue;
use tracing::{debug, trace};

use crate::size_class::{MIN_SIZE, class_for};
use crate::{PoolStats, StatsCounters};

/// A pool of byte buffers that all have the same capacity.
///
/// Buffers are handed out as plain [`Vec<u8>`] values whose length and capacity both equal the
/// size class of the pool. A buffer is only taken back by [`release()`](Self::release) if its
/// capacity still matches the size class exactly, so the pool never hands out undersized storage
/// and a caller may grow a buffer up to the class size without reallocating.
///
/// # Thread safety
///
/// The pool is thread-safe ([`Send`] and [`Sync`]). Acquiring and releasing never block;
/// if the free-list is empty, a new buffer is allocated.
///
/// # Example
///
/// ```rust
/// use recycle_pool::BytePool;
///
/// let pool = BytePool::new(512);
///
/// let mut buffer = pool.acquire_zeroed();
/// assert_eq!(buffer.len(), 512);
/// assert!(buffer.iter().all(|b| *b == 0));
///
/// buffer[..5].copy_from_slice(b"hello");
/// pool.release(buffer);
///
/// // The next caller gets the same storage back.
/// let buffer = pool.acquire();
/// assert_eq!(buffer.capacity(), 512);
/// ```
#[derive(Debug)]
pub struct BytePool {
    size: usize,

    /// Every buffer in here has `len() == capacity() == size`.
    free: SegQueue<Vec<u8>>,

    stats: StatsCounters,
}

impl BytePool {
    /// Creates a pool for buffers of the size class that serves `size` bytes.
    ///
    /// The size is rounded up to a power of two and clamped to [`MIN_SIZE`] and
    /// [`MAX_SIZE`][crate::MAX_SIZE]. Zero selects [`MIN_SIZE`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::BytePool;
    /// use recycle_pool::{MAX_SIZE, MIN_SIZE};
    ///
    /// assert_eq!(BytePool::new(0).size(), MIN_SIZE);
    /// assert_eq!(BytePool::new(300).size(), 512);
    /// assert_eq!(BytePool::new(1_000_000).size(), MAX_SIZE);
    /// ```
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self::with_class(class_for(size))
    }

    /// Creates a pool for exactly `size`-byte buffers. The caller has already validated that
    /// `size` is a power of two.
    pub(crate) fn with_class(size: usize) -> Self {
        debug_assert!(size.is_power_of_two());

        debug!(size, "created byte pool");

        Self {
            size,
            free: SegQueue::new(),
            stats: StatsCounters::default(),
        }
    }

    /// The capacity of every buffer handed out by this pool.
    #[must_use]
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of buffers waiting in the free-list.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.free.len()
    }

    /// Whether the free-list is empty.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Returns a snapshot of the activity of this pool.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats.snapshot(self.free.len())
    }

    /// Returns a buffer with length and capacity equal to [`size()`](Self::size).
    ///
    /// The contents are unspecified: a recycled buffer still contains whatever the previous
    /// user wrote into it. Use [`acquire_zeroed()`](Self::acquire_zeroed) if that matters.
    #[must_use]
    pub fn acquire(&self) -> Vec<u8> {
        if let Some(buffer) = self.free.pop() {
            self.stats.record_hit();
            buffer
        } else {
            self.stats.record_miss();
            vec![0; self.size]
        }
    }

    /// Returns a buffer with length and capacity equal to [`size()`](Self::size), with every
    /// byte set to zero.
    #[must_use]
    pub fn acquire_zeroed(&self) -> Vec<u8> {
        let mut buffer = self.acquire();
        buffer.fill(0);
        buffer
    }

    /// Returns a buffer of length `len` and capacity [`size()`](Self::size).
    ///
    /// If `len` is zero or exceeds the size class, the full size class is used instead.
    /// The contents are unspecified.
    #[must_use]
    pub fn acquire_sized(&self, len: usize) -> Vec<u8> {
        let mut buffer = self.acquire();
        buffer.truncate(self.clamp_len(len));
        buffer
    }

    /// Returns a zero-filled buffer of length `len` and capacity [`size()`](Self::size).
    ///
    /// If `len` is zero or exceeds the size class, the full size class is used instead.
    #[must_use]
    pub fn acquire_zeroed_sized(&self, len: usize) -> Vec<u8> {
        let len = self.clamp_len(len);

        let mut buffer = self.acquire();
        buffer.truncate(len);
        buffer.fill(0);
        buffer
    }

    /// Returns a buffer to the pool.
    ///
    /// The buffer is only kept if its capacity is exactly [`size()`](Self::size). Any other
    /// buffer, for example one that was grown past the size class or one that came from a
    /// different pool, is dropped.
    pub fn release(&self, mut buffer: Vec<u8>) {
        if buffer.capacity() != self.size {
            trace!(
                size = self.size,
                capacity = buffer.capacity(),
                "dropping buffer with mismatched capacity"
            );
            self.stats.record_rejection();
            return;
        }

        // Restores the invariant that pooled buffers span their whole capacity. Bytes beyond
        // the old length are zeroed, the rest keep their contents.
        buffer.resize(self.size, 0);

        self.free.push(buffer);
        self.stats.record_return();
    }

    #[inline]
    fn clamp_len(&self, len: usize) -> usize {
        if len == 0 || len > self.size {
            self.size
        } else {
            len
        }
    }
}

impl Default for BytePool {
    /// Creates a pool for buffers of [`MIN_SIZE`] bytes.
    fn default() -> Self {
        Self::new(MIN_SIZE)
    }
}
