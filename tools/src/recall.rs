use std::path::PathBuf;

use clap::Parser;
use knng_tools::Error;
use utils::cli::CommonArgs;

#[derive(Parser, Debug)]
#[command(name = "knng-recall", about = "Score a k-NNG against a ground-truth sample")]
struct Cli {
    /// Path to the ground-truth sample file.
    #[arg(long)]
    true_knng_path: PathBuf,

    /// Path to the k-NNG to evaluate.
    #[arg(long)]
    eval_knng_path: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() {
    let cli = Cli::parse();
    tracer::init_tracing(&cli.common.log_level);

    match run(cli) {
        Ok(recall) => println!("Recall score: {recall}"),
        Err(err) => {
            eprintln!("[evaluator] fatal: {err}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<f64, Error> {
    if !cli.true_knng_path.exists() {
        return Err(Error::Config(format!(
            "true knng path does not exist: {}",
            cli.true_knng_path.display()
        )));
    }
    if !cli.eval_knng_path.exists() {
        return Err(Error::Config(format!(
            "eval knng path does not exist: {}",
            cli.eval_knng_path.display()
        )));
    }

    let k = vector::K;
    let (true_ids, true_knng) = utils::codec::read_ground_truth(&cli.true_knng_path, k)?;
    tracing::info!(n_samples = true_ids.len(), "loaded ground-truth sample");

    let eval_knng = utils::codec::read_knng(&cli.eval_knng_path, k)?;
    tracing::info!(n_points = eval_knng.len(), "loaded evaluation knng");

    recall_of_points(&eval_knng, &true_knng, &true_ids, k)
}

fn recall_of_points(
    eval_knng: &[Vec<u32>],
    true_knng: &[Vec<u32>],
    true_ids: &[u32],
    k: usize,
) -> Result<f64, Error> {
    let mut total = 0.0;
    for (&true_id, true_knn) in true_ids.iter().zip(true_knng) {
        let eval_knn = eval_knng.get(true_id as usize).ok_or_else(|| {
            Error::Config(format!(
                "eval knng has no entry for sampled point {true_id}"
            ))
        })?;
        total += recall_of_point(eval_knn, true_knn, k)?;
    }
    Ok(total / true_ids.len() as f64)
}

fn recall_of_point(eval_knn: &[u32], true_knn: &[u32], k: usize) -> Result<f64, Error> {
    if eval_knn.len() != k || true_knn.len() != k {
        return Err(Error::Config(
            "eval and true knng must both have exactly k nearest neighbors".to_string(),
        ));
    }
    let correct = true_knn.iter().filter(|id| eval_knn.contains(id)).count();
    Ok(correct as f64 / k as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn identical_knng_scores_perfect_recall() {
        let knn = vec![1, 2, 3];
        let score = recall_of_point(&knn, &knn, 3).unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn disjoint_knng_scores_zero_recall() {
        let eval = vec![1, 2, 3];
        let truth = vec![4, 5, 6];
        let score = recall_of_point(&eval, &truth, 3).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn rejects_mismatched_k() {
        let eval = vec![1, 2];
        let truth = vec![1, 2, 3];
        assert!(recall_of_point(&eval, &truth, 3).is_err());
    }
}
