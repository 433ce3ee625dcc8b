//! Contains structs implementing [`MergingMethod`], which merge two adjacent runs in a slice
//! through a temporary buffer holding the shorter run.

use std::mem::MaybeUninit;
use std::ptr;

use super::bisect::{bisect_left, bisect_right};
use crate::error::Error;

/// The default `MIN_GALLOP` to use
pub const DEFAULT_MIN_GALLOP: usize = 7;

/// Specifies ways to merge two adjacent runs in a slice
pub trait MergingMethod {
    /// Whether the merging method is stable
    const IS_STABLE: bool;

    /// String representation of this merging method
    fn display() -> String;

    /// Merge the two sorted runs `slice[..run_length]` and `slice[run_length..]` according to
    /// `is_less`, acquiring a merge buffer of type `B`.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer can not be allocated, `slice` is left untouched then.
    fn merge<T, F, B>(slice: &mut [T], run_length: usize, is_less: &mut F) -> Result<(), Error>
    where
        F: FnMut(&T, &T) -> bool,
        B: BufGuard<T>;
}

/// Copied from [`std::slice::sort::stable::BufGuard<T>`], with fallible allocation
pub trait BufGuard<T>: Sized {
    /// Creates a new buffer that holds at least `capacity` elements.
    fn try_with_capacity(capacity: usize) -> Result<Self, Error>;
    /// Returns mutable access to uninitialized memory owned by the buffer.
    fn as_uninit_slice_mut(&mut self) -> &mut [MaybeUninit<T>];
}

impl<T> BufGuard<T> for Vec<T> {
    fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        #[cfg(feature = "counters")]
        crate::counters::ALLOC_COUNTER.increase(capacity as u64);

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(capacity)
            .map_err(|source| Error::BufferAllocation { capacity, source })?;

        Ok(buffer)
    }

    fn as_uninit_slice_mut(&mut self) -> &mut [MaybeUninit<T>] {
        self.spare_capacity_mut()
    }
}

/// Creates the merge buffers of a sort
pub trait BufGuardFactory {
    type Guard<T>: BufGuard<T>;
}

/// A [`BufGuardFactory`] handing out [`Vec`]s
#[derive(Debug, Clone, Copy)]
pub struct DefaultBufGuardFactory;

impl BufGuardFactory for DefaultBufGuardFactory {
    type Guard<T> = Vec<T>;
}

/// A [`MergingMethod`] comparing element by element, without any galloping
#[derive(Debug, Clone, Copy)]
pub struct Linear;

impl MergingMethod for Linear {
    const IS_STABLE: bool = true;

    fn display() -> String {
        "linear".to_string()
    }

    fn merge<T, F, B>(slice: &mut [T], run_length: usize, is_less: &mut F) -> Result<(), Error>
    where
        F: FnMut(&T, &T) -> bool,
        B: BufGuard<T>,
    {
        merge_runs::<T, F, B, false, 1>(slice, run_length, is_less)
    }
}

/// A [`MergingMethod`] that uses binary search to skip spans of at least `MIN_GALLOP` elements
/// which are already in order.
///
/// Before merging, the far end of the longer run is probed `MIN_GALLOP` elements deep and
/// trimmed if it already lies in place. While merging, once one run wins `MIN_GALLOP` times in a
/// row, the number of further wins is found by binary search and moved as a block.
#[derive(Debug, Clone, Copy)]
pub struct Galloping<const MIN_GALLOP: usize = DEFAULT_MIN_GALLOP>;

impl<const MIN_GALLOP: usize> MergingMethod for Galloping<MIN_GALLOP> {
    const IS_STABLE: bool = true;

    fn display() -> String {
        format!("galloping (MIN_GALLOP = {MIN_GALLOP})")
    }

    fn merge<T, F, B>(slice: &mut [T], run_length: usize, is_less: &mut F) -> Result<(), Error>
    where
        F: FnMut(&T, &T) -> bool,
        B: BufGuard<T>,
    {
        merge_runs::<T, F, B, true, MIN_GALLOP>(slice, run_length, is_less)
    }
}

/// Merge `slice[..run_length]` and `slice[run_length..]`, buffering the shorter run.
fn merge_runs<T, F, B, const GALLOP: bool, const MIN_GALLOP: usize>(
    slice: &mut [T],
    run_length: usize,
    is_less: &mut F,
) -> Result<(), Error>
where
    F: FnMut(&T, &T) -> bool,
    B: BufGuard<T>,
{
    const { assert!(MIN_GALLOP > 0, "MIN_GALLOP has to be positive") };

    if run_length == 0 || run_length >= slice.len() || size_of::<T>() == 0 {
        return Ok(());
    }

    #[cfg(feature = "counters")]
    crate::counters::MERGE_SLICE_COUNTER.increase(slice.len() as u64);

    let left_len = run_length;
    let right_len = slice.len() - run_length;

    if left_len <= right_len {
        let mut end = slice.len();

        // The probe index lies inside the right run only if it holds MIN_GALLOP elements
        if GALLOP
            && right_len >= MIN_GALLOP
            && is_less(&slice[run_length - 1], &slice[slice.len() - MIN_GALLOP])
        {
            #[cfg(feature = "counters")]
            crate::counters::GALLOP_COUNTER.increase(1);

            // Right elements not less than the last left element are already in place
            end = run_length + bisect_left(&slice[run_length..], &slice[run_length - 1], is_less);
            if end == run_length {
                return Ok(());
            }
        }

        merge_low::<T, F, B, GALLOP, MIN_GALLOP>(&mut slice[..end], run_length, is_less)
    } else {
        let mut start = 0;

        if GALLOP && left_len > MIN_GALLOP && is_less(&slice[MIN_GALLOP], &slice[run_length]) {
            #[cfg(feature = "counters")]
            crate::counters::GALLOP_COUNTER.increase(1);

            // Left elements not greater than the first right element are already in place
            start = bisect_right(&slice[..run_length], &slice[run_length], is_less);
            if start == run_length {
                return Ok(());
            }
        }

        merge_high::<T, F, B, GALLOP, MIN_GALLOP>(&mut slice[start..], run_length - start, is_less)
    }
}

/// Merge by copying the left run into a buffer and merging from the front.
fn merge_low<T, F, B, const GALLOP: bool, const MIN_GALLOP: usize>(
    slice: &mut [T],
    run_length: usize,
    is_less: &mut F,
) -> Result<(), Error>
where
    F: FnMut(&T, &T) -> bool,
    B: BufGuard<T>,
{
    let len = slice.len();
    assert!(
        (1..len).contains(&run_length),
        "Split point has to be within slice bounds"
    );

    let mut buffer = B::try_with_capacity(run_length)?;
    let buffer = buffer.as_uninit_slice_mut();
    assert!(
        buffer.len() >= run_length,
        "We need at least run_length buffer size"
    );

    #[cfg(feature = "counters")]
    crate::counters::MERGE_BUFFER_COUNTER.increase(run_length as u64);

    let v = slice.as_mut_ptr();
    let buf = buffer.as_mut_ptr().cast::<T>();

    // SAFETY: `buf` holds at least `run_length` elements and does not overlap `slice`. Every
    // element is read from exactly one place and written to exactly one place. Between the steps
    // the free positions `hole.dest..right` are exactly as many as the unmerged elements in
    // `hole.start..hole.end`, so dropping `hole`, also while unwinding from a panicking
    // `is_less`, leaves `slice` a permutation of its original elements.
    unsafe {
        ptr::copy_nonoverlapping(v, buf, run_length);

        let mut hole = MergeHole {
            start: buf,
            end: buf.add(run_length),
            dest: v,
        };
        let mut right = v.add(run_length);
        let right_end = v.add(len);

        let mut left_wins = 0;
        let mut right_wins = 0;

        while hole.start < hole.end && right < right_end {
            // Only take the right element if it is strictly less, so ties keep the left first
            if is_less(&*right, &*hole.start) {
                ptr::copy_nonoverlapping(right, hole.dest, 1);
                right = right.add(1);
                right_wins += 1;
                left_wins = 0;
            } else {
                ptr::copy_nonoverlapping(hole.start, hole.dest, 1);
                hole.start = hole.start.add(1);
                left_wins += 1;
                right_wins = 0;
            }
            hole.dest = hole.dest.add(1);

            if !GALLOP || hole.start == hole.end || right == right_end {
                continue;
            }

            if left_wins >= MIN_GALLOP {
                let left_run = std::slice::from_raw_parts(hole.start, hole.len());
                let count = bisect_right(left_run, &*right, is_less);

                ptr::copy_nonoverlapping(hole.start, hole.dest, count);
                hole.start = hole.start.add(count);
                hole.dest = hole.dest.add(count);
                left_wins = 0;
            } else if right_wins >= MIN_GALLOP {
                let right_run =
                    std::slice::from_raw_parts(right, right_end.offset_from(right) as usize);
                let count = bisect_left(right_run, &*hole.start, is_less);

                ptr::copy(right, hole.dest, count);
                right = right.add(count);
                hole.dest = hole.dest.add(count);
                right_wins = 0;
            }
        }

        // Dropping `hole` moves the rest of the left run into the gap, the rest of the right
        // run is already in place.
    }

    Ok(())
}

/// Merge by copying the right run into a buffer and merging from the back.
fn merge_high<T, F, B, const GALLOP: bool, const MIN_GALLOP: usize>(
    slice: &mut [T],
    run_length: usize,
    is_less: &mut F,
) -> Result<(), Error>
where
    F: FnMut(&T, &T) -> bool,
    B: BufGuard<T>,
{
    let len = slice.len();
    assert!(
        (1..len).contains(&run_length),
        "Split point has to be within slice bounds"
    );
    let right_len = len - run_length;

    let mut buffer = B::try_with_capacity(right_len)?;
    let buffer = buffer.as_uninit_slice_mut();
    assert!(
        buffer.len() >= right_len,
        "We need at least slice.len() - run_length buffer size"
    );

    #[cfg(feature = "counters")]
    crate::counters::MERGE_BUFFER_COUNTER.increase(right_len as u64);

    let v = slice.as_mut_ptr();
    let buf = buffer.as_mut_ptr().cast::<T>();

    // SAFETY: Mirrors `merge_low`. Here `hole.dest` is the end of the unmerged left run and the
    // free positions `hole.dest..out` are exactly as many as the unmerged buffered elements.
    unsafe {
        ptr::copy_nonoverlapping(v.add(run_length), buf, right_len);

        let mut hole = MergeHole {
            start: buf,
            end: buf.add(right_len),
            dest: v.add(run_length),
        };
        let mut out = v.add(len);

        let mut left_wins = 0;
        let mut right_wins = 0;

        while v < hole.dest && hole.start < hole.end {
            let left = hole.dest.sub(1);
            let right = hole.end.sub(1);
            out = out.sub(1);

            // Only take the left element if it is strictly greater, so ties keep the right last
            if is_less(&*right, &*left) {
                ptr::copy_nonoverlapping(left, out, 1);
                hole.dest = left;
                left_wins += 1;
                right_wins = 0;
            } else {
                ptr::copy_nonoverlapping(right, out, 1);
                hole.end = right;
                right_wins += 1;
                left_wins = 0;
            }

            if !GALLOP || v == hole.dest || hole.start == hole.end {
                continue;
            }

            if left_wins >= MIN_GALLOP {
                let left_len = hole.dest.offset_from(v) as usize;
                let left_run = std::slice::from_raw_parts(v, left_len);
                let count = left_len - bisect_right(left_run, &*hole.end.sub(1), is_less);

                hole.dest = hole.dest.sub(count);
                out = out.sub(count);
                ptr::copy(hole.dest, out, count);
                left_wins = 0;
            } else if right_wins >= MIN_GALLOP {
                let right_run = std::slice::from_raw_parts(hole.start, hole.len());
                let count = right_run.len() - bisect_left(right_run, &*hole.dest.sub(1), is_less);

                hole.end = hole.end.sub(count);
                out = out.sub(count);
                ptr::copy_nonoverlapping(hole.end, out, count);
                right_wins = 0;
            }
        }

        // Dropping `hole` moves the rest of the right run into the gap, the rest of the left
        // run is already in place.
    }

    Ok(())
}

/// The unmerged part `start..end` of a buffered run, moved to `dest..` on drop
struct MergeHole<T> {
    start: *mut T,
    end: *mut T,
    dest: *mut T,
}

impl<T> MergeHole<T> {
    fn len(&self) -> usize {
        // SAFETY: `start` and `end` point into the same buffer with `start <= end`
        unsafe { self.end.offset_from(self.start) as usize }
    }
}

impl<T> Drop for MergeHole<T> {
    fn drop(&mut self) {
        // SAFETY: `T` is not zero-sized, `start..end` are initialized buffer elements and
        // `dest..` is the equally long gap in the merged slice.
        unsafe {
            ptr::copy_nonoverlapping(self.start, self.dest, self.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    use rand::{Rng as _, RngCore as _};

    use crate::test::counting_lt;

    /// How big the test arrays should be
    const TEST_SIZE: usize = 1000;
    /// How many times to run each test
    const TEST_RUNS: usize = 100;

    macro_rules! test_methods {
        ($($method:ident),*) => {
            $(
                paste::paste! {
                    mod [< $method:snake >] {
                        use super::*;

                        test_methods!(@single $method);
                    }
                }
            )*
        };
        (@single $method:ident) => {
            #[test]
            fn test_empty_merges() {
                test_empty_merge::<$method>();
            }

            #[test]
            fn test_correct_merges() {
                test_correct_merge::<$method>();
            }

            #[test]
            fn test_correct_stable_merges() {
                test_correct_stable_merge::<$method>();
            }

            #[test]
            fn test_short_run_merges() {
                test_short_run_merge::<$method>();
            }

            #[test]
            fn test_soundness_merges() {
                test_soundness_merge::<$method>();
            }
        };
    }

    test_methods!(Linear, Galloping, Galloping3);

    type Galloping3 = Galloping<3>;

    fn merge<M: MergingMethod, T: Ord>(slice: &mut [T], run_length: usize) {
        M::merge::<T, _, Vec<T>>(slice, run_length, &mut T::lt)
            .expect("merge buffer allocation failed");
    }

    /// Test merging an empty slice
    fn test_empty_merge<M: MergingMethod>() {
        let mut elements = [0u32; 0];

        // This should not panic nor cause UB
        merge::<M, _>(&mut elements, 0);
    }

    /// Test that two runs are correctly merged
    fn test_correct_merge<M: MergingMethod>() {
        let mut rng = crate::test::test_rng();

        // Test random runs
        for run in 0..TEST_RUNS {
            let mut elements: Box<[usize]> = (0..TEST_SIZE)
                .map(|_| rng.random_range(0..usize::MAX))
                .collect();
            let split = rng.random_range(0..TEST_SIZE);
            elements[..split].sort();
            elements[split..].sort();

            merge::<M, _>(&mut elements, split);

            assert!(
                elements.is_sorted(),
                "Resulting elements were not sorted by {name} in run {run}",
                name = M::display(),
            );
        }

        // Test random runs, split at 0, 1, n - 1 and n
        for split in [0, 1, TEST_SIZE - 1, TEST_SIZE] {
            let mut elements: Box<[usize]> = (0..TEST_SIZE)
                .map(|_| rng.random_range(0..usize::MAX))
                .collect();
            elements[..split].sort();
            elements[split..].sort();

            merge::<M, _>(&mut elements, split);

            assert!(
                elements.is_sorted(),
                "Resulting elements were not sorted by {name} with split {split}",
                name = M::display(),
            );
        }
    }

    /// Test that two runs are correctly merged and the ordering of equal elements remains stable
    fn test_correct_stable_merge<M: MergingMethod>() {
        let mut rng = crate::test::test_rng();

        for run in 0..TEST_RUNS {
            // Few distinct values make long streaks of equal elements on both sides
            let distinct = if run % 2 == 0 { TEST_SIZE / 4 } else { 4 };
            let mut elements: Box<[_]> = crate::test::IndexedOrdered::map_iter(
                (0..TEST_SIZE).map(|_| rng.random_range(0..distinct)),
            )
            .collect();
            let split = rng.random_range(0..TEST_SIZE);
            elements[..split].sort();
            elements[split..].sort();

            merge::<M, _>(&mut elements, split);

            assert!(
                crate::test::IndexedOrdered::is_stable_sorted(&elements),
                "Resulting elements were not stable sorted by {name} in run {run}\n{elements:?}",
                name = M::display(),
            );
        }
    }

    /// Test all splits of short slices, where runs are shorter than the galloping probe
    fn test_short_run_merge<M: MergingMethod>() {
        let mut rng = crate::test::test_rng();

        for len in 0..20 {
            for split in 0..=len {
                let mut elements: Box<[_]> = crate::test::IndexedOrdered::map_iter(
                    (0..len).map(|_| rng.random_range(0..3u8)),
                )
                .collect();
                elements[..split].sort();
                elements[split..].sort();

                merge::<M, _>(&mut elements, split);

                assert!(
                    crate::test::IndexedOrdered::is_stable_sorted(&elements),
                    "Length {len} split {split} not stable sorted by {name}\n{elements:?}",
                    name = M::display(),
                );
            }
        }
    }

    /// Merge with [`crate::test::RandomOrdered`] and [`crate::test::MaybePanickingOrdered`]
    /// elements and check no element gets lost or duplicated
    fn test_soundness_merge<M: MergingMethod>() {
        let mut rng = crate::test::test_rng();

        for _ in 0..TEST_RUNS {
            // RandomOrdered elements
            let mut elements: Box<[crate::test::RandomOrdered]> =
                crate::test::RandomOrdered::new_iter(rng.next_u64())
                    .take(TEST_SIZE)
                    .collect();
            let split = rng.random_range(0..TEST_SIZE);

            merge::<M, _>(&mut elements, split);
            drop(elements);

            // MaybePanickingOrdered elements
            let mut values: Box<[u32]> = std::iter::repeat_with(|| rng.random())
                .take(TEST_SIZE)
                .collect();
            let split = rng.random_range(0..TEST_SIZE);
            values[..split].sort();
            values[split..].sort();

            let mut elements: Box<[crate::test::MaybePanickingOrdered<TEST_SIZE, u32>]> =
                crate::test::MaybePanickingOrdered::map_iter(values.iter().copied(), rng.next_u64())
                    .collect();

            // The types are not actually unwind safe but must not trigger UB anyway
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                merge::<M, _>(&mut elements, split);
            }));

            assert!(
                crate::test::is_permutation(
                    &values,
                    elements.iter().map(crate::test::MaybePanickingOrdered::inner)
                ),
                "{name} lost or duplicated elements",
                name = M::display(),
            );
        }
    }

    #[test]
    fn failed_allocation_leaves_slice_untouched() {
        let mut elements = [3, 4, 5, 1, 2];

        let result = Galloping::<7>::merge::<_, _, crate::test::FailingBuf<i32>>(
            &mut elements,
            3,
            &mut i32::lt,
        );

        assert!(matches!(result, Err(Error::BufferAllocation { capacity: 2, .. })));
        assert_eq!(elements, [3, 4, 5, 1, 2]);
    }

    #[test]
    fn shortcut_trims_right_run() {
        // Left run is short and lies in the middle of the right run
        let mut elements: Vec<usize> = vec![500, 501, 502];
        elements.extend(0..1000);
        let mut expected = elements.clone();
        expected.sort();

        let linear = Cell::new(0);
        let mut linear_elements = elements.clone();
        Linear::merge::<_, _, Vec<_>>(&mut linear_elements, 3, &mut counting_lt(&linear))
            .unwrap();
        assert_eq!(linear_elements, expected);

        let galloping = Cell::new(0);
        Galloping::<7>::merge::<_, _, Vec<_>>(&mut elements, 3, &mut counting_lt(&galloping))
            .unwrap();
        assert_eq!(elements, expected);

        assert!(
            galloping.get() * 10 < linear.get(),
            "galloping: {galloping:?}, linear: {linear:?}"
        );
    }

    #[test]
    fn shortcut_skips_merge_of_ordered_runs() {
        let mut elements: Vec<usize> = (0..100).collect();
        let comparisons = Cell::new(0);

        Galloping::<7>::merge::<_, _, Vec<_>>(&mut elements, 90, &mut counting_lt(&comparisons))
            .unwrap();

        assert!(elements.is_sorted());
        assert!(comparisons.get() <= 10, "{comparisons:?} comparisons");
    }

    #[test]
    fn long_left_run_before_short_smaller_run() {
        // Short right run of small elements, merged from the back
        let mut elements: Vec<usize> = (100..1100).collect();
        elements.extend(0..5);
        let mut expected = elements.clone();
        expected.sort();

        let linear = Cell::new(0);
        let mut linear_elements = elements.clone();
        Linear::merge::<_, _, Vec<_>>(&mut linear_elements, 1000, &mut counting_lt(&linear))
            .unwrap();
        assert_eq!(linear_elements, expected);

        let galloping = Cell::new(0);
        Galloping::<7>::merge::<_, _, Vec<_>>(&mut elements, 1000, &mut counting_lt(&galloping))
            .unwrap();
        assert_eq!(elements, expected);

        assert_eq!(linear.get(), 1000);
        assert!(galloping.get() < 30, "galloping: {galloping:?}");
    }

    #[test]
    fn merge_high_keeps_ties_in_order() {
        let mut elements = [(1, 'a'), (2, 'b'), (2, 'c'), (3, 'd'), (2, 'e'), (2, 'f')];

        Linear::merge::<_, _, Vec<_>>(&mut elements, 4, &mut |a: &(i32, char), b: &(i32, char)| {
            a.0 < b.0
        })
        .unwrap();

        assert_eq!(
            elements,
            [(1, 'a'), (2, 'b'), (2, 'c'), (2, 'e'), (2, 'f'), (3, 'd')]
        );
    }
}
