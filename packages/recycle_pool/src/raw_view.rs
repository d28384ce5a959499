use std::marker::PhantomData;
use std::ptr::{self, NonNull};

use crate::Record;

/// A byte-level view over the storage of one [`Record`].
///
/// The view covers exactly `size_of::<T>()` bytes and aliases the record it was created from,
/// so it borrows that record mutably for its whole lifetime. It only offers whole-record
/// operations (zero-fill and byte-wise copy) and never hands out the bytes themselves, which
/// keeps padding bytes from ever being read as data.
///
/// # Example
///
/// ```rust
/// use recycle_pool::{RawView, Record};
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// // SAFETY: Plain integers, all-zero valid.
/// unsafe impl Record for Point {}
///
/// let source = Point { x: 3, y: 4 };
/// let mut target = Point { x: 0, y: 0 };
///
/// RawView::new(&mut target).copy_from(&source);
/// assert_eq!(target, source);
///
/// RawView::new(&mut target).zero();
/// assert_eq!(target, Point { x: 0, y: 0 });
/// ```
#[derive(Debug)]
pub struct RawView<'a, T: Record> {
    start: NonNull<u8>,

    _record: PhantomData<&'a mut T>,
}

impl<'a, T: Record> RawView<'a, T> {
    /// Creates a view over the storage of `record`.
    #[must_use]
    #[inline]
    pub fn new(record: &'a mut T) -> Self {
        Self {
            start: NonNull::from(record).cast::<u8>(),
            _record: PhantomData,
        }
    }

    /// The number of bytes covered by the view, equal to `size_of::<T>()`.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        size_of::<T>()
    }

    /// Whether the view covers no bytes, which is only the case for zero-sized records.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes zero to every byte of the record.
    #[inline]
    pub fn zero(&mut self) {
        // SAFETY: The view exclusively borrows a live `T`, so `len()` bytes starting at `start`
        // are valid for writes. `Record` guarantees all-zero bytes form a valid `T`.
        unsafe {
            ptr::write_bytes(self.start.as_ptr(), 0, self.len());
        }
    }

    /// Copies every byte of `source` into the record.
    #[inline]
    pub fn copy_from(&mut self, source: &T) {
        let source = ptr::from_ref(source).cast::<u8>();

        // SAFETY: Both regions are `len()` bytes long and belong to live records. They cannot
        // overlap because we hold an exclusive borrow of the target while `source` is a shared
        // borrow. A byte copy of a valid `T` is a valid `T` because records are `Copy`.
        unsafe {
            ptr::copy_nonoverlapping(source, self.start.as_ptr(), self.len());
        }
    }
}
