use std::io::Write as _;

use anyhow::{Context as _, ensure};
use clap::Parser as _;
use log::{debug, info};
use rand::SeedableRng as _;

use adaptive_timsort::data::{self, Data};

mod cli;

/// Program entry point
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli::Args {
        algorithm,
        data,
        variant,
        runs,
        size,
        seed,
        output,
    } = cli::Args::parse();

    let Some(variant) = cli::AlgorithmVariants::validate(algorithm, variant) else {
        let variants: Vec<String> = cli::AlgorithmVariants::variants(algorithm)
            .enumerate()
            .map(|(index, name)| format!("  {index}: {name}"))
            .collect();

        info!(
            "Available variants for {algorithm}:\n{}",
            variants.join("\n")
        );
        return Ok(());
    };

    let name = cli::AlgorithmVariants::variants(algorithm)
        .nth(variant)
        .context("validated variant has no name")?;
    let stable = cli::AlgorithmVariants::is_stable(algorithm, variant)
        .context("validated variant has no stability")?;

    info!("Running measurements for {name} (stable: {stable})");
    info!("Runs: {runs}, Slice size: {size}, Data type: {data}");

    let mut rng = match seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => {
            info!("No seed provided, generating one using system rng");
            rand::rngs::StdRng::from_os_rng()
        }
    };

    let sorter = cli::AlgorithmVariants::sorter::<u64>(algorithm, variant)
        .context("validated variant has no sorter")?;

    let (samples, stats) = match data {
        cli::DataType::Uniform => {
            perform_experiment::<data::UniformData>(sorter, runs, size, &mut rng)
        }
        cli::DataType::Permutation => {
            perform_experiment::<data::PermutationData>(sorter, runs, size, &mut rng)
        }
        cli::DataType::AscendingPrefix => {
            perform_experiment::<data::AscendingPrefixData>(sorter, runs, size, &mut rng)
        }
        cli::DataType::RandomRuns30 => {
            perform_experiment::<data::RandomRunsData<30>>(sorter, runs, size, &mut rng)
        }
        cli::DataType::RandomRuns3000 => {
            perform_experiment::<data::RandomRunsData<3000>>(sorter, runs, size, &mut rng)
        }
        cli::DataType::Descending => {
            perform_experiment::<data::DescendingData>(sorter, runs, size, &mut rng)
        }
    }?;

    info!("Stats (ms): {stats:?}");

    #[cfg(feature = "counters")]
    {
        use adaptive_timsort::counters::*;

        info!(
            "Allocated {} elements, merged {} slice elements with {} buffered, galloped {} times",
            ALLOC_COUNTER.take(),
            MERGE_SLICE_COUNTER.take(),
            MERGE_BUFFER_COUNTER.take(),
            GALLOP_COUNTER.take(),
        );
    }

    if let Some(path) = output {
        let file = std::fs::File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = std::io::BufWriter::new(file);

        for sample in &samples {
            writeln!(writer, "{}", sample.as_nanos())
                .with_context(|| format!("failed to write to {}", path.display()))?;
        }
        writer
            .flush()
            .with_context(|| format!("failed to write to {}", path.display()))?;

        info!("Wrote {} samples to {}", samples.len(), path.display());
    }

    Ok(())
}

/// Perform a time sampling experiment on the given sorting algorithm
///
/// - sorter: The sort to measure
/// - runs: The number of samples to measure
/// - size: The size of the slices to sort
/// - rng: The rng used for sampling the data
fn perform_experiment<D: Data<u64>>(
    sorter: fn(&mut [u64]),
    runs: usize,
    size: usize,
    rng: &mut rand::rngs::StdRng,
) -> anyhow::Result<(Vec<std::time::Duration>, rolling_stats::Stats<f64>)> {
    let mut samples = Vec::with_capacity(runs);
    let mut stats: rolling_stats::Stats<f64> = rolling_stats::Stats::new();

    let bar = indicatif::ProgressBar::new(runs as u64);

    for run in 0..=runs {
        let mut data = D::initialize(size, rng);
        let mut expected = data.clone();

        let now = std::time::Instant::now();
        sorter(std::hint::black_box(&mut data));
        let elapsed = now.elapsed();

        expected.sort_unstable();
        ensure!(data == expected, "run {run} did not sort the data correctly");

        // The first sample warms up caches and the allocator
        if run == 0 {
            debug!("Warmup took {elapsed:?}");
        } else {
            samples.push(elapsed);
            stats.update(elapsed.as_secs_f64() * 1_000.0);

            bar.inc(1);
        }
    }

    bar.finish();

    Ok((samples, stats))
}
