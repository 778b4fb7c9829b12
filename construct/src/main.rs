mod cli;
mod error;

use clap::Parser;
use engine::{Driver, Strategy, StrategyAConfig, StrategyBConfig};

use crate::cli::{Cli, StrategyArgs};
use crate::error::AppError;

fn main() {
    let cli = Cli::parse();
    tracer::init_tracing(&cli.common.log_level);

    if let Err(err) = run(cli) {
        eprintln!("[knng-clusters] fatal: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    if !cli.dataset.exists() {
        return Err(AppError::Config(format!(
            "dataset path does not exist: {}",
            cli.dataset.display()
        )));
    }
    if cli.output.exists() {
        return Err(AppError::Config(format!(
            "output path already exists: {}",
            cli.output.display()
        )));
    }

    let num_workers = utils::parallel::resolve_worker_count();
    utils::parallel::init_threadpool(num_workers);
    tracing::info!(num_workers, "resolved worker count");

    let store = utils::codec::read_dataset(&cli.dataset, vector::DIMENSIONS)?;
    tracing::info!(n_points = store.len(), "loaded dataset");

    let driver = Driver::new(store)?;

    let strategy = match cli.strategy {
        StrategyArgs::NearestClusters {
            n_clusters,
            n_iters,
            nearest_clusters,
        } => Strategy::NearestClusters(StrategyAConfig {
            n_clusters,
            n_iters,
            nearest_clusters,
        }),
        StrategyArgs::NearNeighborJoin {
            partition_size,
            n_clusters,
            top_p,
        } => Strategy::NearNeighborJoin(StrategyBConfig {
            partition_size,
            n_clusters,
            top_p,
        }),
    };

    let knng = driver.run(strategy, num_workers, cli.seed)?;
    tracing::info!(n_points = knng.len(), "construction complete, writing output");

    utils::codec::write_knng(&cli.output, &knng, vector::K)?;

    Ok(())
}
