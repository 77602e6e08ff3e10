use amplimer::{ParseLabelError, SimulationError};
use thiserror::Error;

/// Rejected harness configuration. Raised before any trial runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("trial count must be positive, got {0}")]
    NonPositiveTrialCount(i64),

    #[error("partition count must be positive")]
    ZeroPartitions,

    #[error(transparent)]
    Label(#[from] ParseLabelError),

    #[error("unknown experiment {0:?}: expected XGate, HGate, BellTest or Playground")]
    UnknownExperiment(String),

    #[error("circuit never measures a qubit")]
    UnmeasuredCircuit,
}

/// Failure of an experiment run. No partial counts survive an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HarnessError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("simulation failed: {0}")]
    Simulation(#[from] SimulationError),
}
