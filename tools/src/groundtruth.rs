use std::path::PathBuf;

use clap::Parser;
use knng_tools::exhaustive::exact_knn_plus_self;
use knng_tools::Error;
use rand::seq::SliceRandom;
use rand::thread_rng;
use utils::cli::CommonArgs;

#[derive(Parser, Debug)]
#[command(name = "knng-groundtruth", about = "Compute an exact k-NN ground-truth sample")]
struct Cli {
    /// Path to the dataset to compute ground truth over.
    #[arg(long)]
    dataset_path: PathBuf,

    /// Number of points to sample; 0 computes the full ground truth.
    #[arg(long, default_value_t = 0)]
    n_samples: usize,

    /// Where to write the ground-truth sample.
    #[arg(long)]
    output_path: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() {
    let cli = Cli::parse();
    tracer::init_tracing(&cli.common.log_level);

    if let Err(err) = run(cli) {
        eprintln!("[evaluator] fatal: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    if !cli.dataset_path.exists() {
        return Err(Error::Config(format!(
            "dataset path does not exist: {}",
            cli.dataset_path.display()
        )));
    }
    if cli.output_path.exists() {
        return Err(Error::Config(format!(
            "output path already exists: {}",
            cli.output_path.display()
        )));
    }

    let store = utils::codec::read_dataset(&cli.dataset_path, vector::DIMENSIONS)?;
    tracing::info!(n_points = store.len(), "loaded dataset");

    if cli.n_samples > store.len() {
        return Err(Error::Config(
            "--n-samples cannot be greater than the dataset's cardinality".to_string(),
        ));
    }

    let mut sample_ids: Vec<u32> = store.ids().collect();
    if cli.n_samples != 0 {
        sample_ids.shuffle(&mut thread_rng());
        sample_ids.truncate(cli.n_samples);
    }

    let k = vector::K;
    let with_self = exact_knn_plus_self(&store, &sample_ids, k);

    let knn: Vec<Vec<u32>> = sample_ids
        .iter()
        .zip(with_self)
        .map(|(&query, mut neighbors)| {
            // Filter by id equality rather than trusting that the
            // self-match always sorts to a specific position (see
            // DESIGN.md: the safer rule spec.md recommends over the
            // original's position-0 assumption).
            neighbors.retain(|&id| id != query);
            if neighbors.len() > k {
                neighbors.truncate(k);
            }
            neighbors
        })
        .collect();

    for (id, row) in sample_ids.iter().zip(&knn) {
        if row.len() != k {
            return Err(Error::Config(format!(
                "point {id} produced {} neighbors after removing its self-entry, expected {k}",
                row.len()
            )));
        }
    }

    tracing::info!(n_samples = sample_ids.len(), "writing ground-truth sample");
    utils::codec::write_ground_truth(&cli.output_path, &sample_ids, &knn, k)?;

    Ok(())
}
