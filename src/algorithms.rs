//! Sorting algorithms and the building blocks of timsort

pub mod bisect;
pub mod insertionsort;
pub mod merge_policy;
pub mod merging;
pub mod runs;
pub mod timsort;

/// A sorting algorithm over slices
pub trait Sort {
    /// Whether the sort keeps the order of equal elements
    const IS_STABLE: bool;

    /// String representation of this sort
    fn display() -> String;

    /// Sort `slice` according to the strict weak order `is_less`
    fn sort_by<T, F>(slice: &mut [T], is_less: F)
    where
        F: FnMut(&T, &T) -> bool;

    /// Sort `slice` ascending
    fn sort<T: Ord>(slice: &mut [T]) {
        Self::sort_by(slice, T::lt);
    }
}

/// A sort that can make use of an already sorted prefix
pub trait PostfixSort: Sort {
    /// Sort `slice` according to `is_less`, assuming `slice[..sorted_prefix]` is already sorted
    fn sort_postfix_by<T, F>(slice: &mut [T], sorted_prefix: usize, is_less: &mut F)
    where
        F: FnMut(&T, &T) -> bool;
}

/// The sorts of the standard library, used as a baseline
#[derive(Debug, Clone, Copy)]
pub struct StdSort<const STABLE: bool = true>;

impl<const STABLE: bool> Sort for StdSort<STABLE> {
    const IS_STABLE: bool = STABLE;

    fn display() -> String {
        if STABLE {
            "std stable sort".to_string()
        } else {
            "std unstable sort".to_string()
        }
    }

    fn sort_by<T, F>(slice: &mut [T], mut is_less: F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        let compare = |a: &T, b: &T| {
            if is_less(a, b) {
                std::cmp::Ordering::Less
            } else if is_less(b, a) {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        };

        if STABLE {
            slice.sort_by(compare);
        } else {
            slice.sort_unstable_by(compare);
        }
    }
}
