pub mod catalog;
pub mod circuit;
pub mod config;
pub mod error;
pub mod harness;
pub mod report;
pub mod sampling;
#[cfg(test)]
pub(crate) mod statistical_testing;
pub mod trial;

pub use catalog::Experiment;
pub use circuit::{Circuit, Instruction, Preparation};
pub use config::{ExperimentConfig, TrialCount, DEFAULT_TRIAL_COUNT};
pub use error::{ConfigError, HarnessError};
pub use harness::{ExperimentRecord, Harness};
pub use report::{render, ReportLine};
pub use sampling::SeedSplitter;
pub use trial::{run_partitioned, run_trial, TrialResult};
