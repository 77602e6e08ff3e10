//! The named experiments the driver can run.

use std::str::FromStr;

use amplimer::{BasisLabel, Gate, QubitCount, RandomSource};
use derive_more::Display;

use crate::circuit::{Circuit, Instruction, Preparation};
use crate::config::TrialCount;
use crate::error::{ConfigError, HarnessError};
use crate::trial::{self, TrialResult};

/// A fixed experiment circuit selectable by name.
///
/// ```text
/// XGate       q0: ─X─M─
///
/// HGate       q0: ─H─M─
///
/// BellTest    q0: ─H─●───M─
///             q1: ───X───M─
///
/// Playground  q0: ─H─●─────M─
///             q1: ───X──X──M─
/// ```
///
/// The first qubit starts in the run's initial label; the second qubit of the two-qubit
/// experiments always starts in `Zero`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Experiment {
    XGate,
    HGate,
    BellTest,
    Playground,
}

impl Experiment {
    pub const ALL: [Experiment; 4] = [
        Experiment::XGate,
        Experiment::HGate,
        Experiment::BellTest,
        Experiment::Playground,
    ];

    /// The circuit this experiment runs.
    pub fn circuit(self) -> Circuit {
        use Instruction::{Measure, Unitary};
        match self {
            Experiment::XGate => Circuit::from_parts(
                QubitCount::One,
                vec![Preparation::FromLabel],
                vec![Unitary(Gate::PauliX(0)), Measure { qubits: vec![0] }],
            ),
            Experiment::HGate => Circuit::from_parts(
                QubitCount::One,
                vec![Preparation::FromLabel],
                vec![Unitary(Gate::Hadamard(0)), Measure { qubits: vec![0] }],
            ),
            Experiment::BellTest => Circuit::from_parts(
                QubitCount::Two,
                vec![Preparation::FromLabel, Preparation::Fixed(BasisLabel::Zero)],
                vec![
                    Unitary(Gate::Hadamard(0)),
                    Unitary(Gate::ControlledX { control: 0, target: 1 }),
                    Measure { qubits: vec![0, 1] },
                ],
            ),
            Experiment::Playground => Circuit::from_parts(
                QubitCount::Two,
                vec![Preparation::FromLabel, Preparation::Fixed(BasisLabel::Zero)],
                vec![
                    Unitary(Gate::Hadamard(0)),
                    Unitary(Gate::ControlledX { control: 0, target: 1 }),
                    Unitary(Gate::PauliX(1)),
                    Measure { qubits: vec![0, 1] },
                ],
            ),
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Experiment::XGate => "X flips the qubit every time",
            Experiment::HGate => "H gives an even split of zeros and ones",
            Experiment::BellTest => "H then CX entangles two qubits that always agree",
            Experiment::Playground => "an anti-correlated Bell pair whose qubits never agree",
        }
    }

    /// Run `trial_count` trials of this experiment from `initial`.
    ///
    /// # Errors
    ///
    /// See [`trial::run`].
    pub fn run<S: RandomSource + ?Sized>(
        self,
        initial: BasisLabel,
        trial_count: TrialCount,
        source: &mut S,
    ) -> Result<TrialResult, HarnessError> {
        trial::run(initial, &self.circuit(), trial_count, source)
    }
}

impl FromStr for Experiment {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "xgate" | "x" => Ok(Experiment::XGate),
            "hgate" | "h" | "hadamard" => Ok(Experiment::HGate),
            "belltest" | "bell" => Ok(Experiment::BellTest),
            "playground" => Ok(Experiment::Playground),
            _ => Err(ConfigError::UnknownExperiment(name.to_owned())),
        }
    }
}
