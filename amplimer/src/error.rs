use thiserror::Error;

use crate::QubitId;

pub type Result<T, E = SimulationError> = std::result::Result<T, E>;

/// Failure of the random source feeding the measurement engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RandomSourceError {
    #[error("random source exhausted after {draws} draws")]
    Exhausted { draws: usize },

    #[error("random draw {0} is outside [0, 1)")]
    OutOfRange(f64),
}

/// Errors raised by the state vector, gate and measurement engines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("unsupported qubit count {0}: expected 1 or 2")]
    UnsupportedQubitCount(usize),

    #[error("amplitude vector of length {0} does not describe 1 or 2 qubits")]
    UnsupportedDimension(usize),

    #[error("qubit {qubit} is out of range for a {qubit_count}-qubit state")]
    QubitOutOfRange { qubit: QubitId, qubit_count: usize },

    #[error("qubit {0} appears more than once in the same operation")]
    DuplicateQubit(QubitId),

    #[error("measurement needs between 1 and {qubit_count} qubits, got {requested}")]
    MeasurementArity { requested: usize, qubit_count: usize },

    #[error("state norm {norm_sqr} is off by more than {limit}")]
    NumericalDrift { norm_sqr: f64, limit: f64 },

    #[error(transparent)]
    RandomSource(#[from] RandomSourceError),
}

/// Text that names neither `Zero` nor `One`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown basis label {0:?}: expected Zero or One")]
pub struct ParseLabelError(pub String);
