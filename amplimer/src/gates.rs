//! The gate set and its in-place action on a [`StateVector`].

use derive_more::Display;
use smallvec::{smallvec, SmallVec};

use crate::error::{Result, SimulationError};
use crate::state::{QubitCount, StateVector};
use crate::{Amplitude, QubitId};

/// Gates the simulator knows how to apply.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Pauli X on one qubit
    /// ```text
    /// |0 1|
    /// |1 0|
    /// ```
    #[display("X({_0})")]
    PauliX(QubitId),

    /// Hadamard on one qubit
    /// ```text
    /// 1  |1  1|
    /// -- |1 -1|
    /// √2
    /// ```
    #[display("H({_0})")]
    Hadamard(QubitId),

    /// Flips `target` on the basis states where `control` is 1.
    #[display("CX({control}, {target})")]
    ControlledX { control: QubitId, target: QubitId },
}

/// Dense unitary of a gate.
///
/// Single-qubit gates are given on their own qubit, controlled-X on the full two-qubit
/// state in the index order of [`StateVector`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GateMatrix {
    Single([[Amplitude; 2]; 2]),
    Joint([[Amplitude; 4]; 4]),
}

impl GateMatrix {
    /// `M · M†`, which is the identity for a unitary `M`.
    #[must_use]
    pub fn gram(&self) -> Vec<Vec<Amplitude>> {
        let rows: Vec<&[Amplitude]> = match self {
            GateMatrix::Single(matrix) => matrix.iter().map(|row| row.as_slice()).collect(),
            GateMatrix::Joint(matrix) => matrix.iter().map(|row| row.as_slice()).collect(),
        };
        rows.iter()
            .map(|left| {
                rows.iter()
                    .map(|right| left.iter().zip(right.iter()).map(|(a, b)| a * b.conj()).sum())
                    .collect()
            })
            .collect()
    }
}

impl Gate {
    /// Qubits the gate acts on, control first.
    #[must_use]
    pub fn qubits(&self) -> SmallVec<[QubitId; 2]> {
        match *self {
            Gate::PauliX(qubit) | Gate::Hadamard(qubit) => smallvec![qubit],
            Gate::ControlledX { control, target } => smallvec![control, target],
        }
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Gate::PauliX(_) | Gate::Hadamard(_) => 1,
            Gate::ControlledX { .. } => 2,
        }
    }

    /// Check the gate can act on a state with `qubit_count` qubits.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::QubitOutOfRange`] for a qubit beyond the count and
    /// [`SimulationError::DuplicateQubit`] for a controlled-X whose control is its target.
    pub fn validate(&self, qubit_count: QubitCount) -> Result<()> {
        for qubit in self.qubits() {
            qubit_count.check(qubit)?;
        }
        match *self {
            Gate::ControlledX { control, target } if control == target => {
                Err(SimulationError::DuplicateQubit(control))
            }
            _ => Ok(()),
        }
    }

    /// The unitary this gate represents.
    ///
    /// # Panics
    ///
    /// Panics for a controlled-X on a qubit above 1, which has no 4×4 matrix.
    #[must_use]
    pub fn matrix(&self) -> GateMatrix {
        let zero = Amplitude::new(0.0, 0.0);
        let one = Amplitude::new(1.0, 0.0);
        match *self {
            Gate::PauliX(_) => GateMatrix::Single([[zero, one], [one, zero]]),
            Gate::Hadamard(_) => {
                let h = Amplitude::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
                GateMatrix::Single([[h, h], [h, -h]])
            }
            Gate::ControlledX { control, target } => {
                let mut matrix = [[zero; 4]; 4];
                for column in 0..4 {
                    matrix[controlled_flip(column, control, target)][column] = one;
                }
                GateMatrix::Joint(matrix)
            }
        }
    }
}

fn controlled_flip(index: usize, control: QubitId, target: QubitId) -> usize {
    if index & (1 << control) == 0 {
        index
    } else {
        index ^ (1 << target)
    }
}

impl StateVector {
    /// Apply `gate` in place.
    ///
    /// The gate is validated against the qubit count first; an invalid gate leaves the
    /// state untouched. No norm check is made here.
    ///
    /// # Errors
    ///
    /// See [`Gate::validate`].
    pub fn apply(&mut self, gate: Gate) -> Result<()> {
        gate.validate(self.qubit_count())?;
        let amplitudes = self.amplitudes_mut();
        match gate {
            Gate::PauliX(qubit) => pauli_x(amplitudes, qubit),
            Gate::Hadamard(qubit) => hadamard(amplitudes, qubit),
            Gate::ControlledX { control, target } => controlled_x(amplitudes, control, target),
        }
        Ok(())
    }

    /// Apply `gates` in order, stopping at the first invalid one.
    ///
    /// # Errors
    ///
    /// See [`Gate::validate`].
    pub fn apply_all<'a>(&mut self, gates: impl IntoIterator<Item = &'a Gate>) -> Result<()> {
        for gate in gates {
            self.apply(*gate)?;
        }
        Ok(())
    }
}

fn pauli_x(amplitudes: &mut [Amplitude], qubit: QubitId) {
    let mask = 1 << qubit;
    for index in 0..amplitudes.len() {
        if index & mask == 0 {
            amplitudes.swap(index, index | mask);
        }
    }
}

fn hadamard(amplitudes: &mut [Amplitude], qubit: QubitId) {
    let mask = 1 << qubit;
    for index in 0..amplitudes.len() {
        if index & mask == 0 {
            let (a, b) = (amplitudes[index], amplitudes[index | mask]);
            amplitudes[index] = (a + b) * std::f64::consts::FRAC_1_SQRT_2;
            amplitudes[index | mask] = (a - b) * std::f64::consts::FRAC_1_SQRT_2;
        }
    }
}

fn controlled_x(amplitudes: &mut [Amplitude], control: QubitId, target: QubitId) {
    let (control_mask, target_mask) = (1 << control, 1 << target);
    for index in 0..amplitudes.len() {
        if index & control_mask != 0 && index & target_mask == 0 {
            amplitudes.swap(index, index | target_mask);
        }
    }
}
