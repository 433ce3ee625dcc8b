//! A stable, adaptive timsort for slices ordered by a strict weak order.
//!
//! The sort scans for existing runs, grows short runs with insertion sort, keeps pending runs on
//! a small stack and merges adjacent runs through a temporary buffer holding the shorter one,
//! optionally galloping over long already ordered spans.
//!
//! The relation passed to [`sort_by`] has to be a strict weak order and must not change its
//! answers during a sort. A relation violating this leaves the slice in an unspecified
//! permutation of its elements, but never loses or duplicates an element.

pub mod algorithms;
#[cfg(feature = "counters")]
pub mod counters;
pub mod data;
mod error;


pub use algorithms::Sort;
pub use error::Error;

/// The timsort configuration used by [`sort`], [`sort_by`] and [`try_sort_by`]
pub type DefaultTimSort = algorithms::timsort::TimSort;

/// Sort `slice` ascending, keeping the order of equal elements.
///
/// # Panics
///
/// Panics if a merge buffer can not be allocated, see [`try_sort_by`].
pub fn sort<T: Ord>(slice: &mut [T]) {
    DefaultTimSort::sort(slice);
}

/// Sort `slice` ascending according to the strict weak order `is_less`, keeping the order of
/// elements that compare equal.
///
/// # Panics
///
/// Panics if a merge buffer can not be allocated, see [`try_sort_by`].
pub fn sort_by<T, F>(slice: &mut [T], is_less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    DefaultTimSort::sort_by(slice, is_less);
}

/// Like [`sort_by`], but reports a failed merge buffer allocation instead of panicking.
///
/// # Errors
///
/// Returns [`Error::BufferAllocation`] if a merge buffer can not be allocated. The sort is
/// aborted and `slice` is left in an unspecified permutation of its elements.
pub fn try_sort_by<T, F>(slice: &mut [T], mut is_less: F) -> Result<(), Error>
where
    F: FnMut(&T, &T) -> bool,
{
    DefaultTimSort::try_sort_by(slice, &mut is_less)
}
