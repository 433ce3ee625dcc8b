//! Input distributions for the benchmark

use std::fmt;

use rand::{Rng as _, distr::Distribution as _, rngs::StdRng, seq::SliceRandom as _};

/// A trait for generalizing sorting data creation
pub trait Data<T: Sized + Ord + fmt::Debug> {
    /// Initialize a vector of the given size
    fn initialize(size: usize, rng: &mut StdRng) -> Vec<T>;
}

/// Uniformly distributed values over the whole range of the type
#[derive(Debug, Clone, Copy)]
pub struct UniformData;

/// A random permutation of `0..size`
#[derive(Debug, Clone, Copy)]
pub struct PermutationData;

/// A permutation whose first `PERCENT` percent are already sorted
#[derive(Debug, Clone, Copy)]
pub struct AscendingPrefixData<const PERCENT: usize = 90>;

/// A permutation made of ascending runs with exponentially distributed lengths around
/// `MEAN_RUN_LENGTH`
#[derive(Debug, Clone, Copy)]
pub struct RandomRunsData<const MEAN_RUN_LENGTH: usize>;

/// `size - 1` down to `0`
#[derive(Debug, Clone, Copy)]
pub struct DescendingData;

/// Split `values` into consecutive chunks of `Exp(1 / mean)` distributed lengths and sort each
fn sort_random_runs<T: Ord>(values: &mut [T], mean: usize, rng: &mut StdRng) {
    let Ok(exp) = rand_distr::Exp::new(1.0 / mean as f64) else {
        return;
    };

    let mut start = 0;
    while start < values.len() {
        let len = (exp.sample(rng).round() as usize).max(1);
        let end = values.len().min(start + len);

        values[start..end].sort_unstable();
        start = end;
    }
}

macro_rules! impl_for_integers {
    ($($type:ty),*) => {
        $(
            impl_for_integers!(@single $type);
        )*
    };
    (@single $type:ty) => {
        impl Data<$type> for UniformData {
            fn initialize(size: usize, rng: &mut StdRng) -> Vec<$type> {
                // `usize` has no platform independent uniform distribution
                std::iter::repeat_with(|| rng.random::<u64>() as $type)
                    .take(size)
                    .collect()
            }
        }

        impl Data<$type> for PermutationData {
            fn initialize(size: usize, rng: &mut StdRng) -> Vec<$type> {
                let mut values: Vec<$type> = (0..size).map(|value| value as $type).collect();
                values.shuffle(rng);
                values
            }
        }

        impl<const PERCENT: usize> Data<$type> for AscendingPrefixData<PERCENT> {
            fn initialize(size: usize, rng: &mut StdRng) -> Vec<$type> {
                const { assert!(PERCENT <= 100, "PERCENT is a percentage") };

                let mut values = <PermutationData as Data<$type>>::initialize(size, rng);
                values[..size * PERCENT / 100].sort_unstable();
                values
            }
        }

        impl<const MEAN_RUN_LENGTH: usize> Data<$type> for RandomRunsData<MEAN_RUN_LENGTH> {
            fn initialize(size: usize, rng: &mut StdRng) -> Vec<$type> {
                const { assert!(MEAN_RUN_LENGTH > 0, "Runs have to be non-empty") };

                let mut values = <PermutationData as Data<$type>>::initialize(size, rng);
                sort_random_runs(&mut values, MEAN_RUN_LENGTH, rng);
                values
            }
        }

        impl Data<$type> for DescendingData {
            fn initialize(size: usize, _rng: &mut StdRng) -> Vec<$type> {
                (0..size).rev().map(|value| value as $type).collect()
            }
        }
    }
}

// Implement the Data trait for the default integer types
impl_for_integers!(u32, u64, usize);
