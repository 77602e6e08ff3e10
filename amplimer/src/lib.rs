//! Dense state vectors for one and two qubits.
//!
//! The crate provides the numeric core of the Bell experiments: a fixed-size
//! [`StateVector`], the gate set `{X, H, CX}` applied in place via [`StateVector::apply`],
//! and sampled computational-basis [`measure`]ment with collapse driven by a
//! [`RandomSource`].

pub mod error;
pub mod gates;
pub mod measurement;
pub mod random;
pub mod state;

pub use error::{ParseLabelError, RandomSourceError, Result, SimulationError};
pub use gates::{Gate, GateMatrix};
pub use measurement::{measure, validate_measurement, Outcome};
pub use random::{RandomSource, ScriptedSource};
pub use state::{BasisLabel, NormCheck, QubitCount, StateVector, DRIFT_LIMIT, NORM_TOLERANCE};

pub type QubitId = usize;
pub type Amplitude = num_complex::Complex64;
