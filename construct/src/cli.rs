use std::path::PathBuf;

use clap::{Parser, Subcommand};
use utils::cli::CommonArgs;

#[derive(Parser, Debug)]
#[command(name = "knng-construct", about = "Build an approximate k-NNG over a binary dataset")]
pub struct Cli {
    /// Path to the input dataset; must exist.
    #[arg(long)]
    pub dataset: PathBuf,

    /// Path to write the k-NNG to; must not already exist.
    #[arg(long)]
    pub output: PathBuf,

    /// Seed for any randomized initialization (k-means centroid sampling).
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    #[command(subcommand)]
    pub strategy: StrategyArgs,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Subcommand, Debug)]
pub enum StrategyArgs {
    /// Strategy A: cluster with k-means, then exhaustively search each
    /// point's nearest clusters.
    NearestClusters {
        /// Cluster count c.
        #[arg(long)]
        n_clusters: usize,
        /// k-means iteration cap.
        #[arg(long)]
        n_iters: usize,
        /// Number of nearest clusters (m) searched per point.
        #[arg(long, default_value_t = 1)]
        nearest_clusters: usize,
    },
    /// Strategy B: bottom-up k-medoids hierarchy followed by top-down
    /// topP refinement.
    NearNeighborJoin {
        /// Partition size at every BU level.
        #[arg(long)]
        partition_size: usize,
        /// Cluster count per partition.
        #[arg(long)]
        n_clusters: usize,
        /// Per-worker topP budget for TD refinement.
        #[arg(long)]
        top_p: usize,
    },
}
