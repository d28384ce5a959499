//! Size class arithmetic shared by [`BytePool`][crate::BytePool] and
//! [`PoolRegistry`][crate::PoolRegistry].

/// The smallest size class managed by the default [`PoolRegistry`][crate::PoolRegistry].
pub const MIN_SIZE: usize = 1 << 6;

/// The largest size class managed by the default [`PoolRegistry`][crate::PoolRegistry].
///
/// Requests for more bytes than this are served from this class, so callers receive at most
/// `MAX_SIZE` bytes of capacity.
pub const MAX_SIZE: usize = 1 << 12;

/// Rounds `size` up to the nearest power of two.
///
/// Zero maps to one. Returns `None` if the result does not fit in `usize`.
///
/// # Example
///
/// ```rust
/// use recycle_pool::round_up_power_of_two;
///
/// assert_eq!(round_up_power_of_two(0), Some(1));
/// assert_eq!(round_up_power_of_two(15), Some(16));
/// assert_eq!(round_up_power_of_two(1024), Some(1024));
/// assert_eq!(round_up_power_of_two(4098), Some(8192));
/// ```
#[must_use]
#[inline]
pub const fn round_up_power_of_two(size: usize) -> Option<usize> {
    if size <= 1 {
        return Some(1);
    }

    // Smear the highest set bit of `size - 1` into every lower position, which leaves a value
    // of the form 0b0..01..1 that is one less than the power of two we are looking for.
    let mut n = size.wrapping_sub(1);
    n |= n >> 1;
    n |= n >> 2;
    n |= n >> 4;
    n |= n >> 8;
    n |= n >> 16;
    #[cfg(target_pointer_width = "64")]
    {
        n |= n >> 32;
    }

    n.checked_add(1)
}

/// Returns the size class that serves a request for `size` bytes, given the bounds of a
/// registry.
///
/// This is the smallest power of two that is at least `size`, clamped to `[min_size, max_size]`.
#[must_use]
#[inline]
pub(crate) const fn class_within(size: usize, min_size: usize, max_size: usize) -> usize {
    if size >= max_size {
        return max_size;
    }

    match round_up_power_of_two(size) {
        Some(class) if class < min_size => min_size,
        Some(class) if class > max_size => max_size,
        Some(class) => class,
        None => max_size,
    }
}

/// Returns the size class of the default bounds ([`MIN_SIZE`] to [`MAX_SIZE`]) that serves a
/// request for `size` bytes.
///
/// # Example
///
/// ```rust
/// use recycle_pool::{MAX_SIZE, MIN_SIZE, class_for};
///
/// assert_eq!(class_for(0), MIN_SIZE);
/// assert_eq!(class_for(15), MIN_SIZE);
/// assert_eq!(class_for(100), 128);
/// assert_eq!(class_for(4092), 4096);
/// assert_eq!(class_for(4098), MAX_SIZE);
/// ```
#[must_use]
#[inline]
pub const fn class_for(size: usize) -> usize {
    class_within(size, MIN_SIZE, MAX_SIZE)
}

/// Returns the index of `class` in a table whose first entry is `min_size`, with one entry per
/// power of two. Both values must be powers of two with `class >= min_size`.
#[inline]
pub(crate) const fn class_index(class: usize, min_size: usize) -> usize {
    debug_assert!(class.is_power_of_two());
    debug_assert!(min_size.is_power_of_two());
    debug_assert!(class >= min_size);

    // Cannot underflow: the debug assertions above hold for every caller.
    class.trailing_zeros().wrapping_sub(min_size.trailing_zeros()) as usize
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn round_up_matches_known_values() {
        assert_eq!(round_up_power_of_two(0), Some(1));
        assert_eq!(round_up_power_of_two(1), Some(1));
        assert_eq!(round_up_power_of_two(2), Some(2));
        assert_eq!(round_up_power_of_two(3), Some(4));
        assert_eq!(round_up_power_of_two(15), Some(16));
        assert_eq!(round_up_power_of_two(112), Some(128));
        assert_eq!(round_up_power_of_two(129), Some(256));
        assert_eq!(round_up_power_of_two(1024), Some(1024));
        assert_eq!(round_up_power_of_two(4092), Some(4096));
        assert_eq!(round_up_power_of_two(4098), Some(8192));
    }

    #[test]
    fn round_up_agrees_with_std() {
        for size in 1..=100_000_usize {
            assert_eq!(
                round_up_power_of_two(size),
                Some(size.next_power_of_two()),
                "size {size}"
            );
        }
    }

    #[test]
    fn round_up_handles_large_values() {
        let top = 1_usize << (usize::BITS - 1);

        assert_eq!(round_up_power_of_two(top), Some(top));
        assert_eq!(round_up_power_of_two(top + 1), None);
        assert_eq!(round_up_power_of_two(usize::MAX), None);
    }

    #[test]
    fn class_for_is_smallest_fitting_class() {
        for size in 1..=MAX_SIZE * 10 {
            let class = class_for(size);

            assert!(class.is_power_of_two());
            assert!((MIN_SIZE..=MAX_SIZE).contains(&class));

            if size <= MAX_SIZE {
                assert!(class >= size, "size {size} got class {class}");
                assert!(
                    class == MIN_SIZE || class / 2 < size,
                    "size {size} got class {class} which is not the smallest"
                );
            } else {
                assert_eq!(class, MAX_SIZE);
            }
        }
    }

    #[test]
    fn class_for_clamps_at_bounds() {
        assert_eq!(class_for(0), MIN_SIZE);
        assert_eq!(class_for(15), MIN_SIZE);
        assert_eq!(class_for(64), 64);
        assert_eq!(class_for(65), 128);
        assert_eq!(class_for(4092), 4096);
        assert_eq!(class_for(4096), 4096);
        assert_eq!(class_for(4098), MAX_SIZE);
        assert_eq!(class_for(usize::MAX), MAX_SIZE);
    }

    #[test]
    fn class_within_respects_custom_bounds() {
        assert_eq!(class_within(1, 16, 256), 16);
        assert_eq!(class_within(17, 16, 256), 32);
        assert_eq!(class_within(10_000, 16, 256), 256);
    }

    #[test]
    fn class_index_counts_doublings() {
        assert_eq!(class_index(64, 64), 0);
        assert_eq!(class_index(128, 64), 1);
        assert_eq!(class_index(4096, 64), 6);
    }
}
