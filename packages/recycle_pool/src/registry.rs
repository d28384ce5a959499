use std::iter;
use std::sync::OnceLock;

use tracing::{debug, trace};

use crate::size_class::{class_index, class_within};
use crate::{BytePool, PoolRegistryBuilder};

/// The process-wide registry with the default bounds, created on first use.
static GLOBAL_REGISTRY: OnceLock<PoolRegistry> = OnceLock::new();

/// A fixed set of [`BytePool`]s, one for every power of two between a minimum and a maximum
/// size class.
///
/// Requests for an arbitrary number of bytes are routed to the smallest size class that can
/// hold them. Returned buffers are routed by their actual capacity, not by the size that was
/// originally requested, and buffers whose capacity does not match any size class are dropped.
///
/// The set of size classes is decided when the registry is built and never changes. Use
/// [`PoolRegistry::global()`] for a shared registry with the default bounds of
/// [`MIN_SIZE`][crate::MIN_SIZE] and [`MAX_SIZE`][crate::MAX_SIZE], or
/// [`PoolRegistry::builder()`] to create one with custom bounds.
///
/// # Example
///
/// ```rust
/// use recycle_pool::PoolRegistry;
///
/// let registry = PoolRegistry::global();
///
/// let buffer = registry.acquire_zeroed(100);
/// assert_eq!(buffer.len(), 128);
///
/// registry.release(buffer);
/// ```
///
/// # Thread safety
///
/// The registry is thread-safe ([`Send`] and [`Sync`]). Every size class has its own
/// independent lock-free free-list.
#[derive(Debug)]
pub struct PoolRegistry {
    min_size: usize,
    max_size: usize,

    /// Entry `i` serves buffers of `min_size << i` bytes.
    pools: Box<[BytePool]>,
}

impl PoolRegistry {
    /// Creates a registry with the default bounds.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::{MAX_SIZE, MIN_SIZE, PoolRegistry};
    ///
    /// let registry = PoolRegistry::new();
    /// assert_eq!(registry.min_size(), MIN_SIZE);
    /// assert_eq!(registry.max_size(), MAX_SIZE);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a builder for configuring and constructing a [`PoolRegistry`].
    #[inline]
    pub fn builder() -> PoolRegistryBuilder {
        PoolRegistryBuilder::new()
    }

    /// Returns the process-wide registry with the default bounds.
    ///
    /// The registry is created the first time this is called and lives until the process exits.
    #[must_use]
    pub fn global() -> &'static Self {
        GLOBAL_REGISTRY.get_or_init(Self::new)
    }

    /// Creates a registry from bounds that the builder has already validated.
    pub(crate) fn new_inner(min_size: usize, max_size: usize) -> Self {
        debug_assert!(min_size.is_power_of_two());
        debug_assert!(max_size.is_power_of_two());
        debug_assert!(min_size <= max_size);

        let pools = iter::successors(Some(min_size), |size| size.checked_mul(2))
            .take_while(|size| *size <= max_size)
            .map(BytePool::with_class)
            .collect::<Box<[_]>>();

        debug!(min_size, max_size, classes = pools.len(), "created pool registry");

        Self {
            min_size,
            max_size,
            pools,
        }
    }

    /// The smallest size class of the registry.
    #[must_use]
    #[inline]
    pub fn min_size(&self) -> usize {
        self.min_size
    }

    /// The largest size class of the registry.
    #[must_use]
    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Iterates over the size classes of the registry, from smallest to largest.
    pub fn classes(&self) -> impl Iterator<Item = usize> + '_ {
        self.pools.iter().map(BytePool::size)
    }

    /// Returns the size class that serves a request for `size` bytes.
    ///
    /// This is the smallest power of two that is at least `size`, clamped to the bounds of the
    /// registry. Requests for zero bytes get the smallest class and requests larger than the
    /// largest class get the largest class.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::PoolRegistry;
    ///
    /// let registry = PoolRegistry::new();
    ///
    /// assert_eq!(registry.class_for(0), 64);
    /// assert_eq!(registry.class_for(65), 128);
    /// assert_eq!(registry.class_for(4092), 4096);
    /// assert_eq!(registry.class_for(100_000), 4096);
    /// ```
    #[must_use]
    #[inline]
    pub fn class_for(&self, size: usize) -> usize {
        class_within(size, self.min_size, self.max_size)
    }

    /// Returns the pool that serves a request for `size` bytes.
    #[must_use]
    pub fn pool(&self, size: usize) -> &BytePool {
        let index = class_index(self.class_for(size), self.min_size);

        // The class is always within our bounds and the table has one entry per class.
        self.pools
            .get(index)
            .expect("every size class within the registry bounds has a pool")
    }

    /// Returns a buffer from the smallest size class that can hold `size` bytes.
    ///
    /// The length and capacity of the buffer equal the size class, which may be less than
    /// `size` if it exceeds the largest size class. The contents are unspecified.
    #[must_use]
    pub fn acquire(&self, size: usize) -> Vec<u8> {
        self.pool(size).acquire()
    }

    /// Like [`acquire()`](Self::acquire) but every byte of the buffer is zero.
    #[must_use]
    pub fn acquire_zeroed(&self, size: usize) -> Vec<u8> {
        self.pool(size).acquire_zeroed()
    }

    /// Returns a buffer of length `size` from the smallest size class that can hold it.
    ///
    /// If `size` exceeds the largest size class, the buffer is as long as the largest size class.
    /// The contents are unspecified.
    #[must_use]
    pub fn acquire_sized(&self, size: usize) -> Vec<u8> {
        self.pool(size).acquire_sized(size)
    }

    /// Like [`acquire_sized()`](Self::acquire_sized) but every byte of the buffer is zero.
    #[must_use]
    pub fn acquire_zeroed_sized(&self, size: usize) -> Vec<u8> {
        self.pool(size).acquire_zeroed_sized(size)
    }

    /// Returns a buffer to the size class matching its capacity.
    ///
    /// Buffers whose capacity is outside the bounds of the registry or is not a power of two
    /// are dropped.
    pub fn release(&self, buffer: Vec<u8>) {
        let capacity = buffer.capacity();

        if capacity < self.min_size || capacity > self.max_size {
            trace!(
                capacity,
                min_size = self.min_size,
                max_size = self.max_size,
                "dropping buffer outside registry bounds"
            );
            return;
        }

        // A capacity that is not a power of two rounds up to a class whose pool rejects it.
        self.pool(capacity).release(buffer);
    }
}

impl Default for PoolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::{MAX_SIZE, MIN_SIZE};

    assert_impl_all!(PoolRegistry: Send, Sync, std::fmt::Debug);

    fn total_free(registry: &PoolRegistry) -> usize {
        registry.pools.iter().map(BytePool::len).sum()
    }

    #[test]
    fn default_registry_covers_every_class() {
        let registry = PoolRegistry::new();

        assert_eq!(
            registry.classes().collect::<Vec<_>>(),
            vec![64, 128, 256, 512, 1024, 2048, 4096]
        );
    }

    #[test]
    fn pools_are_indexed_by_class() {
        let registry = PoolRegistry::new();

        for class in registry.classes().collect::<Vec<_>>() {
            assert_eq!(registry.pool(class).size(), class);
        }
    }

    #[test]
    fn acquire_uses_smallest_fitting_class() {
        let registry = PoolRegistry::new();

        assert_eq!(registry.acquire(0).capacity(), MIN_SIZE);
        assert_eq!(registry.acquire(15).capacity(), MIN_SIZE);
        assert_eq!(registry.acquire(100).capacity(), 128);
        assert_eq!(registry.acquire(4092).capacity(), 4096);
        assert_eq!(registry.acquire(4098).capacity(), MAX_SIZE);
    }

    #[test]
    fn acquire_sized_uses_requested_length() {
        let registry = PoolRegistry::new();

        let buffer = registry.acquire_sized(100);
        assert_eq!(buffer.len(), 100);
        assert_eq!(buffer.capacity(), 128);

        let buffer = registry.acquire_zeroed_sized(10_000);
        assert_eq!(buffer.len(), MAX_SIZE);
        assert!(buffer.iter().all(|b| *b == 0));
    }

    #[test]
    fn release_routes_by_capacity() {
        let registry = PoolRegistry::new();

        let buffer = registry.acquire_sized(10);
        assert_eq!(buffer.len(), 10);
        registry.release(buffer);

        assert_eq!(registry.pool(64).len(), 1);
        assert_eq!(total_free(&registry), 1);
    }

    #[test]
    fn round_trip_keeps_class_capacity() {
        let registry = PoolRegistry::new();

        for size in [1, 64, 65, 500, 1024, 4000, 4096] {
            let buffer = registry.acquire(size);
            registry.release(buffer);

            let buffer = registry.acquire(size);
            assert_eq!(buffer.capacity(), registry.class_for(size));
        }
    }

    #[test]
    fn release_drops_out_of_bounds_buffers() {
        let registry = PoolRegistry::new();

        registry.release(Vec::with_capacity(5000));
        registry.release(Vec::with_capacity(32));
        registry.release(Vec::new());

        assert_eq!(total_free(&registry), 0);
        for class in registry.classes().collect::<Vec<_>>() {
            assert_eq!(registry.pool(class).stats().returns(), 0);
        }
    }

    #[test]
    fn release_drops_non_power_of_two_buffers() {
        let registry = PoolRegistry::new();

        registry.release(Vec::with_capacity(100));

        assert_eq!(total_free(&registry), 0);
        assert_eq!(registry.pool(128).stats().rejected(), 1);
    }

    #[test]
    fn global_registry_is_shared() {
        let first = PoolRegistry::global();
        let second = PoolRegistry::global();

        assert!(std::ptr::eq(first, second));
        assert_eq!(first.min_size(), MIN_SIZE);
        assert_eq!(first.max_size(), MAX_SIZE);
    }

    #[test]
    fn zeroed_after_dirty_release() {
        let registry = PoolRegistry::new();

        let mut buffer = registry.acquire_zeroed(MAX_SIZE);
        buffer[..100].fill(0x5A);
        registry.release(buffer);

        let buffer = registry.acquire_zeroed(MAX_SIZE);
        assert_eq!(buffer.len(), MAX_SIZE);
        assert!(buffer[..100].iter().all(|b| *b == 0));
    }
}
