use thiserror::Error;

/// Errors that can occur when creating a pool.
///
/// Acquiring and releasing never fail. Memory that does not fit a pool is silently dropped
/// instead of being reported as an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The caller attempted to create an [`ObjectPool`][crate::ObjectPool] over a type that is
    /// not a poolable fixed-layout record.
    #[error("invalid record type '{type_name}': {problem}")]
    InvalidType {
        /// The name of the rejected type, as reported by [`std::any::type_name`].
        type_name: &'static str,

        /// A human-readable description of the problem.
        problem: &'static str,
    },
}

/// A specialized `Result` type for pool creation, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
