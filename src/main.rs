//! scaling-bench command line
//!
//! ```text
//! scaling-bench                              # run ./config.json
//! scaling-bench run --config cfg.json --threads 1,2,4 --sizes 1K,1M
//! scaling-bench summary results/minmax.csv
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use scaling_bench::config::{parse_sizes, ConfigDocument};
use scaling_bench::report::{render, scaling_table};
use scaling_bench::runner::run_document;
use scaling_bench::sink::read_log;

/// Thread-scaling benchmark harness for parallel reduction kernels
#[derive(Parser, Debug)]
#[command(name = "scaling-bench", version, about)]
struct Cli {
    /// Log every trial and pool acquisition
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the experiment described by a configuration file (default)
    Run(RunArgs),
    /// Print speedup and efficiency for a result log
    Summary {
        /// Result log to analyse
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Configuration document
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Override the task (minmax, dot, integral, row_minmax, structured_minmax, schedule)
    #[arg(long)]
    task: Option<String>,

    /// Override problem sizes (e.g. 1K,100K,10M)
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<String>>,

    /// Override thread counts (e.g. 1,2,4,8)
    #[arg(long, value_delimiter = ',')]
    threads: Option<Vec<usize>>,

    /// Override trials per point
    #[arg(long)]
    repeats: Option<usize>,

    /// Override the result log path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            config: PathBuf::from("config.json"),
            task: None,
            sizes: None,
            threads: None,
            repeats: None,
            output: None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.unwrap_or_else(|| Command::Run(RunArgs::default())) {
        Command::Run(args) => run(args),
        Command::Summary { input } => summary(&input),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(args: RunArgs) -> Result<()> {
    let mut doc = ConfigDocument::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    if let Some(task) = args.task {
        doc.task = task;
    }
    if let Some(raw) = args.sizes {
        doc.sizes = parse_sizes(&raw)?;
    }
    if let Some(threads) = args.threads {
        doc.threads = threads;
    }
    if let Some(repeats) = args.repeats {
        doc.repeats = repeats;
    }
    if let Some(output) = args.output {
        doc.output = Some(output);
    }

    let (records, path) = run_document(&doc).context("Experiment failed")?;

    info!("{records} results saved to {}", path.display());
    Ok(())
}

fn summary(input: &Path) -> Result<()> {
    let records =
        read_log(input).with_context(|| format!("Failed to read {}", input.display()))?;
    print!("{}", render(&scaling_table(&records)));
    Ok(())
}
