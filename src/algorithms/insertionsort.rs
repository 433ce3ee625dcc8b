//! Insertion sort, used by timsort to extend short runs

/// The default `BINARY` parameter for `InsertionSort`
pub const DEFAULT_BINARY: bool = false;

/// The insertion [`super::Sort`]
///
/// With `BINARY` the insertion point is found with [`super::bisect::bisect_right`] instead of a
/// linear scan.
#[derive(Debug, Clone, Copy)]
pub struct InsertionSort<const BINARY: bool = DEFAULT_BINARY>;

impl<const BINARY: bool> super::Sort for InsertionSort<BINARY> {
    const IS_STABLE: bool = true;

    fn display() -> String {
        if BINARY {
            "binary insertion sort".to_string()
        } else {
            "insertion sort".to_string()
        }
    }

    fn sort_by<T, F>(slice: &mut [T], mut is_less: F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        <Self as super::PostfixSort>::sort_postfix_by(slice, 1, &mut is_less);
    }
}

impl<const BINARY: bool> super::PostfixSort for InsertionSort<BINARY> {
    fn sort_postfix_by<T, F>(slice: &mut [T], sorted_prefix: usize, is_less: &mut F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        if slice.len() < 2 {
            return;
        }

        if BINARY {
            binary_insertion_sort_with_partition(slice, sorted_prefix, is_less);
        } else {
            insertion_sort_with_partition(slice, sorted_prefix, is_less);
        }
    }
}

/// Sort slice using insertion sort, assuming that `slice[..partition_point]` is already in order
fn insertion_sort_with_partition<T, F>(slice: &mut [T], partition_point: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    assert!(
        partition_point <= slice.len(),
        "Partition point needs to be in bounds"
    );

    for i in partition_point.max(1)..slice.len() {
        // Only move past strictly greater elements, so equal elements keep their order
        let mut j = i;
        while j > 0 && is_less(&slice[i], &slice[j - 1]) {
            j -= 1;
        }

        slice[j..=i].rotate_right(1);
    }
}

/// Sort slice using binary insertion sort, assuming that `slice[..partition_point]` is already
/// in order
fn binary_insertion_sort_with_partition<T, F>(
    slice: &mut [T],
    partition_point: usize,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    assert!(
        partition_point <= slice.len(),
        "Partition point needs to be in bounds"
    );

    for i in partition_point.max(1)..slice.len() {
        let (sorted, rest) = slice.split_at(i);
        let j = super::bisect::bisect_right(sorted, &rest[0], is_less);

        slice[j..=i].rotate_right(1);
    }
}
