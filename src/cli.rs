//! Command line input handling

use adaptive_timsort::algorithms::*;

/// Command line arguments
#[derive(clap::Parser)]
#[command(author, version, about)]
pub struct Args {
    /// The sorting algorithm to run
    #[arg()]
    pub algorithm: Algorithm,
    /// The data distribution to sort
    #[arg()]
    pub data: DataType,
    /// The algorithm variant, use `-v=-1` to print available options
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub variant: isize,
    /// The number of runs to do
    #[arg(short, long, default_value_t = 1_000)]
    pub runs: usize,
    /// The size of the slices to sort
    #[arg(short, long, default_value_t = 1_000_000)]
    pub size: usize,
    /// Seed for the rng
    #[arg(long)]
    pub seed: Option<u64>,
    /// The output file to write the samples to
    pub output: Option<std::path::PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Algorithm {
    /// The sorts in [`std`]
    Std,
    /// Insertionsort
    Insertionsort,
    /// Timsort
    Timsort,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match clap::ValueEnum::to_possible_value(self) {
            Some(value) => f.write_str(value.get_name()),
            None => write!(f, "{self:?}"),
        }
    }
}

macro_rules! declare_variants {
    (
        $name:ident {
            $(
                $top_algorithm:pat => [
                    $(
                        $variant:ty
                    ),*
                    $(,)?
                ]
            ),*
            $(,)?
        }
    ) => {
        pub struct $name;

        impl $name {
            /// The display names of all variants of `algorithm`
            pub fn variants(algorithm: Algorithm) -> impl Iterator<Item = String> {
                let mut variants = Vec::new();
                declare_variants! { @match_algorithm
                    algorithm => Variant
                    ($(
                        $top_algorithm => [
                            $($variant),*
                        ]
                    ),*)
                    {
                        variants.push(<Variant as Sort>::display())
                    }
                }
                variants.into_iter()
            }

            pub fn sorter<T: Ord>(algorithm: Algorithm, variant: usize) -> Option<fn(&mut [T])> {
                let mut index = 0;

                declare_variants! { @match_algorithm
                    algorithm => Variant
                    ($(
                        $top_algorithm => [
                            $($variant),*
                        ]
                    ),*)
                    {
                        if variant == index {
                            return Some(<Variant as Sort>::sort);
                        } else {
                            index += 1;
                        }
                    }
                }

                None
            }

            pub fn is_stable(algorithm: Algorithm, variant: usize) -> Option<bool> {
                let mut index = 0;

                declare_variants! { @match_algorithm
                    algorithm => Variant
                    ($(
                        $top_algorithm => [
                            $($variant),*
                        ]
                    ),*)
                    {
                        if variant == index {
                            return Some(<Variant as Sort>::IS_STABLE);
                        } else {
                            index += 1;
                        }
                    }
                }

                None
            }
        }
    };
    (@match_algorithm
        $alg:expr => $variant_name:ident
        ($(
            $top_algorithm:pat => [
                $($variant:ty),*
            ]
        ),*)
        $code:block
    ) => {
        match $alg {
            $(
                $top_algorithm => {
                    $(
                        {
                            type $variant_name = $variant;

                            $code
                        }
                    )*
                }
            )*
        }
    };
}

declare_variants! {
    AlgorithmVariants {
        Algorithm::Std => [
            StdSort,
            StdSort<false>,
        ],
        Algorithm::Insertionsort => [
            insertionsort::InsertionSort,
            insertionsort::InsertionSort<true>,
        ],
        Algorithm::Timsort => [
            timsort::TimSort,
            timsort::TimSort<
                timsort::DefaultInsertionSort,
                merging::Linear,
            >,
            timsort::TimSort<
                timsort::DefaultInsertionSort,
                merging::Galloping<3>,
            >,
            timsort::TimSort<
                timsort::DefaultInsertionSort,
                timsort::DefaultMergingMethod,
                merge_policy::FourRunLookback,
            >,
            timsort::TimSort<
                insertionsort::InsertionSort<true>,
                timsort::DefaultMergingMethod,
                timsort::DefaultMergePolicy,
                timsort::DefaultBufGuardFactory,
                { timsort::DEFAULT_MIN_MERGE },
            >,
        ],
    }
}

impl AlgorithmVariants {
    /// Returns `variant` as an index if `algorithm` has such a variant
    pub fn validate(algorithm: Algorithm, variant: isize) -> Option<usize> {
        let index = usize::try_from(variant).ok()?;

        (index < Self::variants(algorithm).count()).then_some(index)
    }
}

/// Available data distributions for sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DataType {
    /// Uniformly distributed `u64`s
    Uniform,
    /// A random permutation
    Permutation,
    /// A permutation with its first 90 percent sorted
    AscendingPrefix,
    /// Ascending runs of about 30 elements
    RandomRuns30,
    /// Ascending runs of about 3000 elements
    RandomRuns3000,
    /// Strictly descending values
    Descending,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match clap::ValueEnum::to_possible_value(self) {
            Some(value) => f.write_str(value.get_name()),
            None => write!(f, "{self:?}"),
        }
    }
}
