use std::io;
use std::process::ExitCode;

use amplimer::BasisLabel;
use bellverse::{render, Experiment, ExperimentConfig, Harness, HarnessError, DEFAULT_TRIAL_COUNT};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bell")]
#[command(about = "Run X, Hadamard and Bell-correlation experiments on a state-vector simulator")]
#[command(version)]
struct Cli {
    /// Trials per experiment and initial label
    #[arg(short = 'n', long, default_value_t = DEFAULT_TRIAL_COUNT as i64, allow_negative_numbers = true)]
    trials: i64,

    /// Seed for reproducible runs; drawn from entropy when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Independently seeded slices each experiment is split into and run in parallel
    #[arg(short, long, default_value_t = 1)]
    partitions: usize,

    /// Experiments to run, in order (default: all)
    #[arg(short, long = "experiment", value_name = "NAME")]
    experiments: Vec<Experiment>,

    /// Initial labels to run every experiment from (default: Zero and One)
    #[arg(short, long = "label", value_name = "LABEL")]
    labels: Vec<BasisLabel>,

    /// Log filter directives; overrides RUST_LOG
    #[arg(long, value_name = "DIRECTIVES")]
    log_level: Option<String>,
}

impl Cli {
    fn config(&self) -> Result<ExperimentConfig, HarnessError> {
        let config = ExperimentConfig::new(self.trials)?.with_partitions(self.partitions)?;
        Ok(match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        })
    }
}

fn init_logging(directives: Option<&str>) {
    let filter = match directives {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<String, HarnessError> {
    let experiments = if cli.experiments.is_empty() {
        Experiment::ALL.to_vec()
    } else {
        cli.experiments.clone()
    };
    let labels = if cli.labels.is_empty() {
        BasisLabel::ALL.to_vec()
    } else {
        cli.labels.clone()
    };
    let mut harness = Harness::new(cli.config()?);
    let records = harness.run_all(&experiments, &labels)?;
    Ok(render(&records))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match run(&cli) {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "run failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
