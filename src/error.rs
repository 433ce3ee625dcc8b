//! The error type of the fallible sorting entry points

use std::collections::TryReserveError;

/// Errors that abort a sort, leaving the slice in an unspecified permutation of its elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The temporary buffer for a merge could not be allocated
    BufferAllocation {
        /// The number of elements the buffer should have held
        capacity: usize,
        /// The underlying allocation error
        source: TryReserveError,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::BufferAllocation { capacity, .. } => {
                write!(f, "failed to allocate a merge buffer for {capacity} elements")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::BufferAllocation { source, .. } => Some(source),
        }
    }
}
