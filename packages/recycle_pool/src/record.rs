/// Describes the shape of a [`Record`] type.
///
/// Only [`RecordKind::Struct`] types can back an [`ObjectPool`][crate::ObjectPool]. The other
/// kinds exist so that mistakes like pooling a bare integer are reported as
/// [`Error::InvalidType`][crate::Error::InvalidType] when the pool is created.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum RecordKind {
    /// A user-defined struct with named or positional fields. This is the default.
    Struct,

    /// A primitive scalar such as an integer, a float or a `bool`.
    Scalar,

    /// A fixed-size array of records.
    Array,
}

/// A fixed-layout record that can be stored in an [`ObjectPool`][crate::ObjectPool].
///
/// Pools recycle records by treating their storage as raw bytes: a reused record is cleared by
/// writing zero to every byte and duplicated by copying its bytes into another record. This is
/// only sound for types that have no drop logic and for which every byte pattern the pool can
/// produce is a valid value.
///
/// # Safety
///
/// Implementers must guarantee that:
///
/// * A value consisting entirely of zero bytes is a valid value of the type.
/// * The type does not contain references or pointers whose validity depends on the particular
///   record instance (a byte-wise copy of a valid value must be a valid value, which [`Copy`]
///   already implies).
///
/// # Example
///
/// ```rust
/// use recycle_pool::{ObjectPool, Record};
///
/// #[derive(Clone, Copy)]
/// struct Sample {
///     sensor_id: u32,
///     value: f64,
/// }
///
/// // SAFETY: All fields are plain numbers, for which all-zero bytes are valid.
/// unsafe impl Record for Sample {}
///
/// let pool = ObjectPool::<Sample>::new().unwrap();
/// assert_eq!(pool.record_size(), size_of::<Sample>());
/// ```
pub unsafe trait Record: Copy + Send + 'static {
    /// The shape of the record type. Pools only accept [`RecordKind::Struct`].
    const KIND: RecordKind = RecordKind::Struct;
}

macro_rules! scalar_records {
    ($($t:ty),* $(,)?) => {
        $(
            // SAFETY: Zero is a valid value for every primitive scalar.
            unsafe impl Record for $t {
                const KIND: RecordKind = RecordKind::Scalar;
            }
        )*
    };
}

scalar_records!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool
);

// SAFETY: An array of records is all-zero valid if its element type is.
unsafe impl<T: Record, const N: usize> Record for [T; N] {
    const KIND: RecordKind = RecordKind::Array;
}
