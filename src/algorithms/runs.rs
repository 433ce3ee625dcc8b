//! Run detection and minimum run lengths

/// A single continuous run starting at `start` followed by `len` weakly increasing elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub start: usize,
    pub len: usize,
}

impl Run {
    /// The index one past the last element of the run
    pub fn end(self) -> usize {
        self.start + self.len
    }
}

/// Calculate the length short runs are extended to when sorting a slice of length `n`.
///
/// Halves `n` until it drops below `MIN_MERGE`, adding one if any shifted out bit was set, so
/// that `n / min_run` is a power of two or slightly above one.
pub fn min_run_length<const MIN_MERGE: usize>(mut n: usize) -> usize {
    let mut r = 0;
    while n >= MIN_MERGE {
        r |= n & 1;
        n >>= 1;
    }
    n + r
}

/// Returns the largest `index`, such that `slice[..index]` is weakly increasing
pub fn weakly_increasing_prefix_index<T, F>(slice: &[T], is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    slice
        .windows(2)
        .position(|pair| is_less(&pair[1], &pair[0]))
        .map_or(slice.len(), |index| index + 1)
}

/// Returns the largest `index`, such that `slice[..index]` is strictly decreasing
pub fn strictly_decreasing_prefix_index<T, F>(slice: &[T], is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    slice
        .windows(2)
        .position(|pair| !is_less(&pair[1], &pair[0]))
        .map_or(slice.len(), |index| index + 1)
}

/// Find the run at the start of `slice` and return its length.
///
/// A strictly decreasing run is reversed in place. Equal elements never end up in a decreasing
/// run, so reversing it keeps the sort stable.
pub fn count_run_and_make_ascending<T, F>(slice: &mut [T], is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    if slice.len() < 2 {
        return slice.len();
    }

    if is_less(&slice[1], &slice[0]) {
        let run_end = strictly_decreasing_prefix_index(&slice[1..], is_less) + 1;

        slice[..run_end].reverse();

        run_end
    } else {
        weakly_increasing_prefix_index(&slice[1..], is_less) + 1
    }
}
