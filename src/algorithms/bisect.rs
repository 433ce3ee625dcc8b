//! Binary search for insertion points in sorted runs

/// Return the first index in `run` whose element is not less than `value`.
///
/// `run` has to be sorted according to `is_less`. Returns 0 for an empty run.
pub fn bisect_left<T, F>(run: &[T], value: &T, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    run.partition_point(|element| is_less(element, value))
}

/// Return the first index in `run` whose element is greater than `value`.
///
/// `run` has to be sorted according to `is_less`. Returns 0 for an empty run.
pub fn bisect_right<T, F>(run: &[T], value: &T, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    run.partition_point(|element| !is_less(value, element))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        let run: [u32; 0] = [];

        assert_eq!(bisect_left(&run, &3, &mut u32::lt), 0);
        assert_eq!(bisect_right(&run, &3, &mut u32::lt), 0);
    }

    #[test]
    fn duplicates() {
        let run = [1, 2, 2, 2, 5, 7];

        assert_eq!(bisect_left(&run, &2, &mut i32::lt), 1);
        assert_eq!(bisect_right(&run, &2, &mut i32::lt), 4);
        assert_eq!(bisect_left(&run, &3, &mut i32::lt), 4);
        assert_eq!(bisect_right(&run, &3, &mut i32::lt), 4);
    }

    #[test]
    fn bounds() {
        let run = [10, 20, 30];

        assert_eq!(bisect_left(&run, &0, &mut i32::lt), 0);
        assert_eq!(bisect_right(&run, &0, &mut i32::lt), 0);
        assert_eq!(bisect_left(&run, &30, &mut i32::lt), 2);
        assert_eq!(bisect_right(&run, &30, &mut i32::lt), 3);
        assert_eq!(bisect_left(&run, &40, &mut i32::lt), 3);
    }

    #[test]
    fn logarithmic_comparisons() {
        let run: Box<[usize]> = (0..1024).collect();
        let mut comparisons = 0;

        let index = bisect_left(&run, &700, &mut |a: &usize, b: &usize| {
            comparisons += 1;
            a < b
        });

        assert_eq!(index, 700);
        assert!(comparisons <= 11, "{comparisons} comparisons");
    }

    #[test]
    fn matches_linear_search() {
        let run = [0, 0, 1, 1, 1, 3, 4, 4, 9];

        for value in -1..11 {
            let left = run.iter().position(|element| *element >= value);
            let right = run.iter().position(|element| *element > value);

            assert_eq!(
                bisect_left(&run, &value, &mut i32::lt),
                left.unwrap_or(run.len())
            );
            assert_eq!(
                bisect_right(&run, &value, &mut i32::lt),
                right.unwrap_or(run.len())
            );
        }
    }
}
