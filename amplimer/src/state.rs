//! Dense amplitude vectors over one or two qubits.

use std::fmt;
use std::str::FromStr;

use derive_more::Display;

use crate::error::{ParseLabelError, Result, SimulationError};
use crate::{Amplitude, QubitId};

/// Largest supported dimension, `2^2`.
pub const MAX_DIMENSION: usize = 4;

/// Deviation of the squared norm from one that is left untouched.
pub const NORM_TOLERANCE: f64 = 1e-9;

/// Deviation of the squared norm from one beyond which the state is considered corrupt.
pub const DRIFT_LIMIT: f64 = 1e-6;

/// Computational basis value a qubit is prepared in.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BasisLabel {
    Zero,
    One,
}

impl BasisLabel {
    pub const ALL: [BasisLabel; 2] = [BasisLabel::Zero, BasisLabel::One];

    #[must_use]
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            BasisLabel::One
        } else {
            BasisLabel::Zero
        }
    }

    #[must_use]
    pub fn bit(self) -> bool {
        self == BasisLabel::One
    }

    /// The other basis value.
    #[must_use]
    pub fn flipped(self) -> Self {
        Self::from_bit(!self.bit())
    }
}

impl FromStr for BasisLabel {
    type Err = ParseLabelError;

    fn from_str(text: &str) -> std::result::Result<Self, Self::Err> {
        match text.trim().to_ascii_lowercase().as_str() {
            "zero" | "0" => Ok(BasisLabel::Zero),
            "one" | "1" => Ok(BasisLabel::One),
            _ => Err(ParseLabelError(text.to_owned())),
        }
    }
}

/// Number of qubits a [`StateVector`] describes.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "usize", into = "usize"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QubitCount {
    One = 1,
    Two = 2,
}

impl QubitCount {
    #[must_use]
    pub fn get(self) -> usize {
        self as usize
    }

    /// Number of amplitudes, `2^count`.
    #[must_use]
    pub fn dimension(self) -> usize {
        1 << self.get()
    }

    /// # Errors
    ///
    /// Returns [`SimulationError::QubitOutOfRange`] if `qubit` is not below the count.
    pub fn check(self, qubit: QubitId) -> Result<()> {
        if qubit < self.get() {
            Ok(())
        } else {
            Err(SimulationError::QubitOutOfRange {
                qubit,
                qubit_count: self.get(),
            })
        }
    }
}

impl TryFrom<usize> for QubitCount {
    type Error = SimulationError;

    fn try_from(count: usize) -> Result<Self> {
        match count {
            1 => Ok(QubitCount::One),
            2 => Ok(QubitCount::Two),
            other => Err(SimulationError::UnsupportedQubitCount(other)),
        }
    }
}

impl From<QubitCount> for usize {
    fn from(count: QubitCount) -> usize {
        count.get()
    }
}

impl fmt::Display for QubitCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Outcome of [`StateVector::stabilize_norm`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NormCheck {
    WithinTolerance,
    Renormalized { norm_sqr: f64 },
}

/// Joint state of one or two qubits as a dense vector of complex amplitudes.
///
/// Amplitude `i` belongs to the basis state whose bit `q` is the value of qubit `q`,
/// so qubit 0 is the least significant bit of the index:
///
/// ```text
/// index 0 = |q1=0, q0=0⟩
/// index 1 = |q1=0, q0=1⟩
/// index 2 = |q1=1, q0=0⟩
/// index 3 = |q1=1, q0=1⟩
/// ```
///
/// The storage is a fixed array of [`MAX_DIMENSION`] amplitudes of which only the first
/// [`dimension`](Self::dimension) are meaningful; the rest are kept at zero.
///
/// # Examples
///
/// ```
/// use amplimer::{BasisLabel, Gate, StateVector};
///
/// let mut state = StateVector::prepare(&[BasisLabel::Zero, BasisLabel::Zero]).unwrap();
/// state.apply(Gate::Hadamard(0)).unwrap();
/// state.apply(Gate::ControlledX { control: 0, target: 1 }).unwrap();
///
/// assert!((state.probability(0b00) - 0.5).abs() < 1e-12);
/// assert!((state.probability(0b11) - 0.5).abs() < 1e-12);
/// assert!(state.is_normalized(1e-9));
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct StateVector {
    amplitudes: [Amplitude; MAX_DIMENSION],
    qubit_count: QubitCount,
}

impl StateVector {
    /// The basis state with the given index.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::UnsupportedDimension`] if `index` is not below `2^count`.
    pub fn basis(qubit_count: QubitCount, index: usize) -> Result<Self> {
        if index >= qubit_count.dimension() {
            return Err(SimulationError::UnsupportedDimension(index + 1));
        }
        let mut amplitudes = [Amplitude::new(0.0, 0.0); MAX_DIMENSION];
        amplitudes[index] = Amplitude::new(1.0, 0.0);
        Ok(StateVector {
            amplitudes,
            qubit_count,
        })
    }

    /// All qubits in `|0⟩`.
    pub fn zero(qubit_count: QubitCount) -> Self {
        let mut amplitudes = [Amplitude::new(0.0, 0.0); MAX_DIMENSION];
        amplitudes[0] = Amplitude::new(1.0, 0.0);
        StateVector {
            amplitudes,
            qubit_count,
        }
    }

    /// The product basis state with qubit `q` set to `labels[q]`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::UnsupportedQubitCount`] unless one or two labels are given.
    pub fn prepare(labels: &[BasisLabel]) -> Result<Self> {
        let qubit_count = QubitCount::try_from(labels.len())?;
        let index = labels
            .iter()
            .enumerate()
            .filter(|(_, label)| label.bit())
            .fold(0, |index, (qubit, _)| index | (1 << qubit));
        Self::basis(qubit_count, index)
    }

    /// Build a state from explicit amplitudes of length 2 or 4.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::UnsupportedDimension`] for any other length and
    /// [`SimulationError::NumericalDrift`] if the squared norm is further than
    /// [`DRIFT_LIMIT`] from one.
    pub fn from_amplitudes(values: &[Amplitude]) -> Result<Self> {
        let qubit_count = match values.len() {
            2 => QubitCount::One,
            4 => QubitCount::Two,
            other => return Err(SimulationError::UnsupportedDimension(other)),
        };
        let mut amplitudes = [Amplitude::new(0.0, 0.0); MAX_DIMENSION];
        amplitudes[..values.len()].copy_from_slice(values);
        let mut state = StateVector {
            amplitudes,
            qubit_count,
        };
        state.stabilize_norm()?;
        Ok(state)
    }

    pub fn qubit_count(&self) -> QubitCount {
        self.qubit_count
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.qubit_count.dimension()
    }

    #[must_use]
    pub fn amplitudes(&self) -> &[Amplitude] {
        &self.amplitudes[..self.dimension()]
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Amplitude] {
        let dimension = self.dimension();
        &mut self.amplitudes[..dimension]
    }

    /// Squared magnitude of the amplitude at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`dimension`](Self::dimension).
    #[must_use]
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes()[index].norm_sqr()
    }

    /// Probability that measuring `qubit` yields 1.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::QubitOutOfRange`] for a qubit the state does not have.
    pub fn probability_of_one(&self, qubit: QubitId) -> Result<f64> {
        self.qubit_count.check(qubit)?;
        let mask = 1 << qubit;
        Ok(self
            .amplitudes()
            .iter()
            .enumerate()
            .filter(|(index, _)| index & mask != 0)
            .map(|(_, amplitude)| amplitude.norm_sqr())
            .sum())
    }

    /// Sum of squared magnitudes.
    #[must_use]
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes().iter().map(|amplitude| amplitude.norm_sqr()).sum()
    }

    #[must_use]
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        (self.norm_sqr() - 1.0).abs() <= tolerance
    }

    /// Scale the amplitudes to unit norm. A zero vector is left as is.
    pub fn renormalize(&mut self) {
        let norm = self.norm_sqr().sqrt();
        if norm > 0.0 {
            for amplitude in self.amplitudes_mut() {
                *amplitude /= norm;
            }
        }
    }

    /// Absorb floating-point drift of the norm.
    ///
    /// Within [`NORM_TOLERANCE`] nothing happens, up to [`DRIFT_LIMIT`] the state is
    /// renormalized, and beyond that the state is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::NumericalDrift`] if the squared norm is further than
    /// [`DRIFT_LIMIT`] from one. The state is left unchanged in that case.
    pub fn stabilize_norm(&mut self) -> Result<NormCheck> {
        let norm_sqr = self.norm_sqr();
        let deviation = (norm_sqr - 1.0).abs();
        if deviation <= NORM_TOLERANCE {
            Ok(NormCheck::WithinTolerance)
        } else if deviation <= DRIFT_LIMIT {
            self.renormalize();
            Ok(NormCheck::Renormalized { norm_sqr })
        } else {
            Err(SimulationError::NumericalDrift {
                norm_sqr,
                limit: DRIFT_LIMIT,
            })
        }
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.qubit_count.get();
        let mut first = true;
        for (index, amplitude) in self.amplitudes().iter().enumerate() {
            if amplitude.norm_sqr() == 0.0 {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            write!(f, "({amplitude:.4})|{index:0width$b}⟩")?;
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}
