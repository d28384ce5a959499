use std::cell::Cell;
use std::marker::PhantomData;

use crate::PoolRegistry;
use crate::size_class::{MAX_SIZE, MIN_SIZE};

/// Builder for creating an instance of [`PoolRegistry`].
///
/// The registry covers every power of two between a minimum and a maximum size class. Both
/// bounds are optional and default to [`MIN_SIZE`] and [`MAX_SIZE`].
///
/// # Examples
///
/// ```
/// use recycle_pool::PoolRegistry;
///
/// let registry = PoolRegistry::builder().min_size(16).max_size(1024).build();
///
/// assert_eq!(registry.class_for(1), 16);
/// assert_eq!(registry.class_for(5000), 1024);
/// ```
///
/// # Thread safety
///
/// A builder may be handed to another thread ([`Send`]) to finish the registry there. It is not
/// [`Sync`]: configure it from one thread at a time.
#[derive(Debug)]
#[must_use]
pub struct PoolRegistryBuilder {
    min_size: usize,
    max_size: usize,

    // Send but not Sync.
    _not_sync: PhantomData<Cell<()>>,
}

impl PoolRegistryBuilder {
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            min_size: MIN_SIZE,
            max_size: MAX_SIZE,
            _not_sync: PhantomData,
        }
    }

    /// Sets the smallest size class of the registry.
    ///
    /// # Panics
    ///
    /// Panics if `size` is not a power of two.
    #[inline]
    pub fn min_size(mut self, size: usize) -> Self {
        assert!(
            size.is_power_of_two(),
            "PoolRegistry size classes must be powers of two, got {size}"
        );
        self.min_size = size;
        self
    }

    /// Sets the largest size class of the registry.
    ///
    /// # Panics
    ///
    /// Panics if `size` is not a power of two.
    #[inline]
    pub fn max_size(mut self, size: usize) -> Self {
        assert!(
            size.is_power_of_two(),
            "PoolRegistry size classes must be powers of two, got {size}"
        );
        self.max_size = size;
        self
    }

    /// Builds the registry, creating one [`BytePool`][crate::BytePool] per size class.
    ///
    /// # Panics
    ///
    /// Panics if the minimum size class is larger than the maximum size class.
    #[must_use]
    #[inline]
    pub fn build(self) -> PoolRegistry {
        assert!(
            self.min_size <= self.max_size,
            "PoolRegistry minimum size {} exceeds maximum size {}",
            self.min_size,
            self.max_size
        );

        PoolRegistry::new_inner(self.min_size, self.max_size)
    }
}
