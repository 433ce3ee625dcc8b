//! Policies deciding which pending runs timsort merges after pushing a new run

use super::runs::Run;

/// Decides which adjacent runs on the stack of pending runs to merge next
pub trait MergePolicy {
    /// String representation of this policy
    fn display() -> String;

    /// Return `Some(index)` if `runs[index]` and `runs[index + 1]` have to be merged before the
    /// next run is pushed, `None` if the stack is balanced.
    ///
    /// The most recent run is the last one in `runs`, `index` is always `runs.len() - 2` or
    /// `runs.len() - 3`.
    fn next_merge(runs: &[Run]) -> Option<usize>;
}

/// Looks at the topmost three runs `z`, `y`, `x` (with `x` on top).
///
/// The stack is balanced once `|y| > |x|` and `|z| > |x| + |y|` hold, where a missing `z` counts
/// as balanced. Otherwise `y` is merged with the shorter of its neighbours, preferring `x` on
/// ties. Runs further down are not checked, so their lengths are not guaranteed to keep
/// growing, which only affects the merge cost.
#[derive(Debug, Clone, Copy)]
pub struct ThreeRunLookback;

impl MergePolicy for ThreeRunLookback {
    fn display() -> String {
        "three run lookback".to_string()
    }

    fn next_merge(runs: &[Run]) -> Option<usize> {
        let n = runs.len();
        if n < 2 {
            return None;
        }

        let x = runs[n - 1].len;
        let y = runs[n - 2].len;

        if n == 2 {
            return if y > x { None } else { Some(0) };
        }

        let z = runs[n - 3].len;

        if y > x && z > x + y {
            None
        } else if x > z {
            Some(n - 3)
        } else {
            Some(n - 2)
        }
    }
}

/// Checks the invariants `|runs[i]| > |runs[i + 1]| + |runs[i + 2]|` and
/// `|runs[i]| > |runs[i + 1]|` on the topmost four runs, which keeps them holding for the whole
/// stack.
#[derive(Debug, Clone, Copy)]
pub struct FourRunLookback;

impl MergePolicy for FourRunLookback {
    fn display() -> String {
        "four run lookback".to_string()
    }

    fn next_merge(runs: &[Run]) -> Option<usize> {
        if runs.len() < 2 {
            return None;
        }

        let mut n = runs.len() - 2;

        if (n > 0 && runs[n - 1].len <= runs[n].len + runs[n + 1].len)
            || (n > 1 && runs[n - 2].len <= runs[n - 1].len + runs[n].len)
        {
            if runs[n - 1].len < runs[n + 1].len {
                n -= 1;
            }

            Some(n)
        } else if runs[n].len <= runs[n + 1].len {
            Some(n)
        } else {
            None
        }
    }
}
