use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlscore_cli::{dataset, AccuracyReport, EvalOptions, Evaluator, DEFAULT_CONCURRENCY};
use sqlscore_engine::Engine;
use sqlscore_engine_sqlite::SqliteEngine;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::FmtSubscriber;

#[cfg(feature = "duckdb")]
use sqlscore_engine_duckdb::DuckDbEngine;

#[derive(Parser)]
#[command(name = "sqlscore")]
#[command(about = "Execution-accuracy scoring for text-to-SQL predictions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute predictions and gold queries and score them by result set
    Run(RunArgs),
}

#[derive(Parser)]
struct RunArgs {
    /// Prediction file (JSON array, JSON index map, or one query per line)
    #[arg(long)]
    predictions: PathBuf,

    /// Gold dataset file (JSON array of {query, db_id, db_path} records)
    #[arg(long)]
    golds: PathBuf,

    /// Override the database root directory from the gold records
    #[arg(long)]
    db_root: Option<PathBuf>,

    /// Engine used to execute queries
    #[arg(long, default_value = "sqlite")]
    engine: String,

    /// Worker pool size per batch
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Per-query time limit in seconds
    #[arg(long, default_value_t = 30)]
    time_limit: u64,

    /// Predictions are formatted as "<db_id> | <query>"
    #[arg(long)]
    with_db_id: bool,

    /// List every mismatched example index
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::new();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(args).await,
    }
}

async fn run(args: RunArgs) -> Result<()> {
    let mut golds = dataset::load_golds(&args.golds)
        .with_context(|| format!("Failed to load gold dataset from {:?}", args.golds))?;
    let predictions = dataset::load_predictions(&args.predictions)
        .with_context(|| format!("Failed to load predictions from {:?}", args.predictions))?;

    if let Some(ref db_root) = args.db_root {
        for gold in &mut golds {
            gold.db_root = db_root.clone();
        }
    }

    println!(
        "Loaded {} predictions and {} gold examples",
        predictions.len(),
        golds.len()
    );

    let engine: Arc<dyn Engine> = match args.engine.as_str() {
        "sqlite" => Arc::new(SqliteEngine::new()),
        "duckdb" => {
            #[cfg(feature = "duckdb")]
            {
                Arc::new(DuckDbEngine::new())
            }
            #[cfg(not(feature = "duckdb"))]
            {
                return Err(anyhow::anyhow!(
                    "DuckDB engine not available. Rebuild with --features duckdb"
                ));
            }
        }
        other => {
            return Err(anyhow::anyhow!(
                "Unknown engine '{}'. Available engines: sqlite, duckdb",
                other
            ));
        }
    };

    println!(
        "Engine: {} ({} workers, {}s per query)",
        engine.name(),
        args.concurrency,
        args.time_limit
    );

    let options = EvalOptions {
        concurrency: args.concurrency,
        time_limit: Duration::from_secs(args.time_limit),
        strip_db_id_prefix: args.with_db_id,
    };
    let evaluator = Evaluator::new(engine, options);

    // An operator interrupt terminates the whole run; per-item isolation
    // never swallows it.
    let report = tokio::select! {
        report = evaluator.evaluate(&predictions, &golds) => report?,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\nInterrupted, aborting run");
            std::process::exit(130);
        }
    };

    print_report(&report, args.verbose);
    Ok(())
}

fn print_report(report: &AccuracyReport, verbose: bool) {
    println!("\n{}", "=".repeat(60));
    println!("Execution accuracy");
    println!("{}", "=".repeat(60));
    println!(
        "✓ {}/{} correct ({:.2}%)",
        report.correct,
        report.total,
        report.accuracy()
    );

    if report.mismatches.is_empty() {
        println!("  No mismatched examples");
    } else if verbose {
        println!(
            "  Mismatched examples: {}",
            report
                .mismatches
                .iter()
                .map(|index| index.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    } else {
        println!(
            "  {} mismatched examples (run with --verbose to list them)",
            report.mismatches.len()
        );
    }
}
