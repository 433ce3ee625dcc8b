//! The timsort implementation

use super::merge_policy::MergePolicy;
use super::merging::{BufGuardFactory, MergingMethod};
use super::runs::{self, Run};
use crate::error::Error;

/// The default insertion sort to use
pub type DefaultInsertionSort = super::insertionsort::InsertionSort;

/// The default [`super::merging::MergingMethod`] to use
pub type DefaultMergingMethod = super::merging::Galloping;

/// The default [`super::merge_policy::MergePolicy`] to use
pub type DefaultMergePolicy = super::merge_policy::ThreeRunLookback;

/// The default BufGuardFactory to use
pub type DefaultBufGuardFactory = super::merging::DefaultBufGuardFactory;

/// The default `MIN_MERGE` to use
pub const DEFAULT_MIN_MERGE: usize = 64;

/// The timsort [`super::Sort`]
///
/// - `I` extends short runs to the minimum run length
/// - `M` merges adjacent runs
/// - `P` decides when pending runs are merged
/// - `B` creates the temporary merge buffers
/// - `MIN_MERGE` bounds the minimum run length, see [`runs::min_run_length`]
pub struct TimSort<
    I: super::PostfixSort = DefaultInsertionSort,
    M: MergingMethod = DefaultMergingMethod,
    P: MergePolicy = DefaultMergePolicy,
    B: BufGuardFactory = DefaultBufGuardFactory,
    const MIN_MERGE: usize = DEFAULT_MIN_MERGE,
>(
    std::marker::PhantomData<I>,
    std::marker::PhantomData<M>,
    std::marker::PhantomData<P>,
    std::marker::PhantomData<B>,
);

impl<
    I: super::PostfixSort,
    M: MergingMethod,
    P: MergePolicy,
    B: BufGuardFactory,
    const MIN_MERGE: usize,
> super::Sort for TimSort<I, M, P, B, MIN_MERGE>
{
    const IS_STABLE: bool = I::IS_STABLE && M::IS_STABLE;

    fn display() -> String {
        format!(
            "timsort ({}, {} merging, {}, MIN_MERGE = {MIN_MERGE})",
            I::display(),
            M::display(),
            P::display(),
        )
    }

    fn sort_by<T, F>(slice: &mut [T], mut is_less: F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        if let Err(error) = Self::try_sort_by(slice, &mut is_less) {
            panic!("timsort aborted: {error}");
        }
    }
}

impl<
    I: super::PostfixSort,
    M: MergingMethod,
    P: MergePolicy,
    B: BufGuardFactory,
    const MIN_MERGE: usize,
> TimSort<I, M, P, B, MIN_MERGE>
{
    /// Sort `slice` according to the strict weak order `is_less`.
    ///
    /// # Errors
    ///
    /// Returns an error if a merge buffer can not be allocated. The sort is aborted and `slice`
    /// holds an unspecified permutation of its elements.
    pub fn try_sort_by<T, F>(slice: &mut [T], is_less: &mut F) -> Result<(), Error>
    where
        F: FnMut(&T, &T) -> bool,
    {
        const { assert!(MIN_MERGE > 0, "MIN_MERGE has to be positive") };

        // Zero sized types have no observable order
        if slice.len() < 2 || size_of::<T>() == 0 {
            return Ok(());
        }

        let min_run = runs::min_run_length::<MIN_MERGE>(slice.len());
        log::debug!("sorting {} elements with min_run {min_run}", slice.len());

        let mut pending_runs: Vec<Run> = Vec::new();
        let mut start = 0;

        while start < slice.len() {
            let len = Self::next_run(&mut slice[start..], min_run, is_less);

            pending_runs.push(Run { start, len });
            Self::merge_collapse(slice, &mut pending_runs, is_less)?;

            start += len;
        }

        assert!(start == slice.len());
        Self::merge_force_collapse(slice, &mut pending_runs, is_less)?;
        assert!(pending_runs.len() == 1);

        Ok(())
    }

    /// Find the run at the start of `slice`, make it ascending and extend it to `min_run`
    /// elements if it is shorter. Returns the length of the run.
    fn next_run<T, F>(slice: &mut [T], min_run: usize, is_less: &mut F) -> usize
    where
        F: FnMut(&T, &T) -> bool,
    {
        // Descending runs are reversed before extension too, short ones included
        let run_length = runs::count_run_and_make_ascending(slice, is_less);

        if run_length < min_run {
            let force = std::cmp::min(slice.len(), min_run);
            I::sort_postfix_by(&mut slice[..force], run_length, is_less);

            force
        } else {
            run_length
        }
    }

    /// Merge pending runs until `P` considers the stack balanced
    fn merge_collapse<T, F>(
        slice: &mut [T],
        pending_runs: &mut Vec<Run>,
        is_less: &mut F,
    ) -> Result<(), Error>
    where
        F: FnMut(&T, &T) -> bool,
    {
        while let Some(index) = P::next_merge(pending_runs) {
            Self::merge_at(slice, pending_runs, index, is_less)?;
        }

        Ok(())
    }

    /// Merge all pending runs into one, always merging the two most recent runs
    fn merge_force_collapse<T, F>(
        slice: &mut [T],
        pending_runs: &mut Vec<Run>,
        is_less: &mut F,
    ) -> Result<(), Error>
    where
        F: FnMut(&T, &T) -> bool,
    {
        while pending_runs.len() > 1 {
            let index = pending_runs.len() - 2;
            Self::merge_at(slice, pending_runs, index, is_less)?;
        }

        Ok(())
    }

    /// Merge `pending_runs[index]` with `pending_runs[index + 1]`, replacing both by one entry
    fn merge_at<T, F>(
        slice: &mut [T],
        pending_runs: &mut Vec<Run>,
        index: usize,
        is_less: &mut F,
    ) -> Result<(), Error>
    where
        F: FnMut(&T, &T) -> bool,
    {
        let stack_size = pending_runs.len();
        assert!(stack_size >= 2);
        assert!(index == stack_size - 2 || index == stack_size - 3);

        let run1 = pending_runs[index];
        let run2 = pending_runs[index + 1];
        assert!(run1.len > 0 && run2.len > 0);
        assert!(run1.end() == run2.start);

        log::trace!("merging {run1:?} with {run2:?}");

        pending_runs[index].len += run2.len;
        pending_runs.remove(index + 1);

        M::merge::<T, F, B::Guard<T>>(&mut slice[run1.start..run2.end()], run1.len, is_less)
    }
}
