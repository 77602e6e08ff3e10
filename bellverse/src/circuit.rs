use std::fmt;

use amplimer::{validate_measurement, BasisLabel, Gate, QubitCount, QubitId, SimulationError, StateVector};
use smallvec::SmallVec;

use crate::error::ConfigError;

/// How a qubit is initialized at the start of every trial.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Preparation {
    /// Takes the initial label the run was started with.
    #[default]
    FromLabel,
    /// Always starts in the given basis value.
    Fixed(BasisLabel),
}

impl Preparation {
    #[must_use]
    pub fn resolve(self, initial: BasisLabel) -> BasisLabel {
        match self {
            Preparation::FromLabel => initial,
            Preparation::Fixed(label) => label,
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Unitary(Gate),
    Measure { qubits: Vec<QubitId> },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Unitary(gate) => write!(f, "{gate}"),
            Instruction::Measure { qubits } => write!(f, "M{qubits:?}"),
        }
    }
}

/// A fixed experiment circuit: per-qubit preparation followed by gates and measurements.
///
/// Every instruction is validated against the qubit count as it is added, so a built
/// circuit can always be executed. [`validate`](Self::validate) additionally requires at
/// least one measurement before the circuit is run.
///
/// # Examples
///
/// ```
/// use amplimer::{Gate, QubitCount};
/// use bellverse::Circuit;
///
/// let circuit = Circuit::new(QubitCount::Two)
///     .then(Gate::Hadamard(0))?
///     .then(Gate::ControlledX { control: 0, target: 1 })?
///     .measure(&[0, 1])?;
/// assert_eq!(circuit.to_string(), "H(0); CX(0, 1); M[0, 1]");
/// # Ok::<(), amplimer::SimulationError>(())
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Circuit {
    qubit_count: QubitCount,
    preparations: Vec<Preparation>,
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// An empty circuit whose qubits all take the initial label.
    pub fn new(qubit_count: QubitCount) -> Self {
        Circuit {
            qubit_count,
            preparations: vec![Preparation::FromLabel; qubit_count.get()],
            instructions: Vec::new(),
        }
    }

    /// A circuit from parts known to fit `qubit_count`, skipping per-instruction checks.
    pub(crate) fn from_parts(
        qubit_count: QubitCount,
        preparations: Vec<Preparation>,
        instructions: Vec<Instruction>,
    ) -> Self {
        debug_assert_eq!(preparations.len(), qubit_count.get());
        Circuit {
            qubit_count,
            preparations,
            instructions,
        }
    }

    /// Set how `qubit` is prepared.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::QubitOutOfRange`] for a qubit the circuit does not have.
    pub fn prepared(mut self, qubit: QubitId, preparation: Preparation) -> Result<Self, SimulationError> {
        self.qubit_count.check(qubit)?;
        self.preparations[qubit] = preparation;
        Ok(self)
    }

    /// Append a gate.
    ///
    /// # Errors
    ///
    /// See [`Gate::validate`].
    pub fn then(mut self, gate: Gate) -> Result<Self, SimulationError> {
        self.push(Instruction::Unitary(gate))?;
        Ok(self)
    }

    /// Append a measurement of `qubits`.
    ///
    /// # Errors
    ///
    /// See [`validate_measurement`].
    pub fn measure(mut self, qubits: &[QubitId]) -> Result<Self, SimulationError> {
        self.push(Instruction::Measure { qubits: qubits.to_vec() })?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns the error of [`Gate::validate`] or [`validate_measurement`] for an
    /// instruction that does not fit the qubit count; the circuit is left unchanged.
    pub fn push(&mut self, instruction: Instruction) -> Result<(), SimulationError> {
        self.check(&instruction)?;
        self.instructions.push(instruction);
        Ok(())
    }

    fn check(&self, instruction: &Instruction) -> Result<(), SimulationError> {
        match instruction {
            Instruction::Unitary(gate) => gate.validate(self.qubit_count),
            Instruction::Measure { qubits } => validate_measurement(self.qubit_count, qubits),
        }
    }

    /// Check the circuit is ready to run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnmeasuredCircuit`] if no instruction measures anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.measured_qubit_count() == 0 {
            return Err(ConfigError::UnmeasuredCircuit);
        }
        Ok(())
    }

    pub fn qubit_count(&self) -> QubitCount {
        self.qubit_count
    }

    #[must_use]
    pub fn preparations(&self) -> &[Preparation] {
        &self.preparations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    pub fn gates(&self) -> impl Iterator<Item = &Gate> {
        self.instructions.iter().filter_map(|instruction| match instruction {
            Instruction::Unitary(gate) => Some(gate),
            Instruction::Measure { .. } => None,
        })
    }

    /// Number of bits a single trial produces.
    #[must_use]
    pub fn measured_qubit_count(&self) -> usize {
        self.instructions
            .iter()
            .map(|instruction| match instruction {
                Instruction::Measure { qubits } => qubits.len(),
                Instruction::Unitary(_) => 0,
            })
            .sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The basis state a trial starts from for the given initial label.
    ///
    /// # Errors
    ///
    /// Never fails for a circuit built through the public constructors.
    pub fn initial_state(&self, initial: BasisLabel) -> Result<StateVector, SimulationError> {
        let labels: SmallVec<[BasisLabel; 2]> = self
            .preparations
            .iter()
            .map(|preparation| preparation.resolve(initial))
            .collect();
        StateVector::prepare(&labels)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, instruction) in self.instructions.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{instruction}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use BasisLabel::{One, Zero};

    fn bell() -> Circuit {
        Circuit::new(QubitCount::Two)
            .prepared(1, Preparation::Fixed(Zero))
            .unwrap()
            .then(Gate::Hadamard(0))
            .unwrap()
            .then(Gate::ControlledX { control: 0, target: 1 })
            .unwrap()
            .measure(&[0, 1])
            .unwrap()
    }

    #[test]
    fn preparation_resolves_against_initial_label() {
        let circuit = bell();
        assert_eq!(circuit.initial_state(Zero).unwrap().probability(0b00), 1.0);
        assert_eq!(circuit.initial_state(One).unwrap().probability(0b01), 1.0);
    }

    #[test]
    fn invalid_instructions_are_rejected_without_change() {
        let mut circuit = Circuit::new(QubitCount::One);
        assert_eq!(
            circuit.push(Instruction::Unitary(Gate::PauliX(1))),
            Err(SimulationError::QubitOutOfRange { qubit: 1, qubit_count: 1 })
        );
        assert!(circuit
            .push(Instruction::Measure { qubits: vec![0, 0] })
            .is_err());
        assert!(circuit.push(Instruction::Measure { qubits: vec![] }).is_err());
        assert!(circuit.is_empty());
        assert!(Circuit::new(QubitCount::One).prepared(1, Preparation::FromLabel).is_err());
    }

    #[test]
    fn unmeasured_circuits_fail_validation() {
        let circuit = Circuit::new(QubitCount::One).then(Gate::PauliX(0)).unwrap();
        assert_eq!(circuit.validate(), Err(ConfigError::UnmeasuredCircuit));
        assert_eq!(bell().validate(), Ok(()));
    }

    #[test]
    fn gates_skip_measurements() {
        let circuit = bell();
        assert_eq!(circuit.len(), 3);
        assert_eq!(circuit.gates().count(), 2);
        assert_eq!(circuit.measured_qubit_count(), 2);
        assert_eq!(circuit.to_string(), "H(0); CX(0, 1); M[0, 1]");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn measured_count_matches_measure_instructions(measurements in prop::collection::vec(0usize..2, 0..10)) {
            let mut circuit = Circuit::new(QubitCount::Two);
            for &qubit in &measurements {
                circuit.push(Instruction::Measure { qubits: vec![qubit] }).unwrap();
            }
            prop_assert_eq!(circuit.measured_qubit_count(), measurements.len());
            prop_assert_eq!(circuit.len(), measurements.len());
            prop_assert_eq!(circuit.validate().is_ok(), !measurements.is_empty());
        }
    }
}
