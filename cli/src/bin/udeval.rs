//! Scores a system CoNLL-U file against a gold CoNLL-U file and prints the LAS, the full table of
//! metrics or the `measure` blocks.

use anyhow::Context;
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};
use udeval::{evaluate_str, DeprelWeights, EvaluationConfigBuilder};

#[derive(Debug, Parser)]
#[command(name = "udeval", version, about)]
struct Args {
    /// Name of the CoNLL-U file with the gold data.
    gold_file: PathBuf,
    /// Name of the CoNLL-U file with the predicted data (default: standard input).
    system_file: Option<PathBuf>,
    /// Compute WeightedLAS using given weights for Universal Dependency Relations.
    #[arg(short, long, value_name = "DEPREL_WEIGHTS_FILE")]
    weights: Option<PathBuf>,
    /// Print all metrics.
    #[arg(short, long)]
    verbose: bool,
    /// Print every metric as `measure` blocks.
    #[arg(long)]
    measures: bool,
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut builder = EvaluationConfigBuilder::default();
    if let Some(path) = &args.weights {
        let weights: DeprelWeights = read_file(path)?
            .parse()
            .with_context(|| format!("Invalid weights file {}", path.display()))?;
        log::info!("Loaded {} relation weights from {}", weights.len(), path.display());
        builder = builder.deprel_weights(weights);
    }
    let config = builder.build();
    log::debug!("{}", config);

    let gold = read_file(&args.gold_file)?;
    let system = match &args.system_file {
        Some(path) => read_file(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read the system file from the standard input")?;
            buffer
        }
    };

    let reporter = evaluate_str(&gold, &system, config)?;

    if args.measures {
        print!("{}", reporter.measures());
    } else if args.verbose || args.weights.is_some() {
        print!("{}", reporter);
    } else {
        println!("{}", reporter.las_summary());
    }
    Ok(())
}
