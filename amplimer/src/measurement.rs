//! Sampled computational-basis measurement with collapse.

use smallvec::SmallVec;

use crate::error::{Result, SimulationError};
use crate::random::RandomSource;
use crate::state::{QubitCount, StateVector, MAX_DIMENSION};
use crate::{Amplitude, QubitId};

/// Classical result of measuring one or two qubits.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    bits: SmallVec<[bool; 2]>,
    probability: f64,
}

impl Outcome {
    /// Bit observed on the `position`-th measured qubit.
    ///
    /// # Panics
    ///
    /// Panics if `position` is not below the number of measured qubits.
    #[must_use]
    pub fn bit(&self, position: usize) -> bool {
        self.bits[position]
    }

    /// Observed bits in the order the qubits were requested.
    #[must_use]
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Probability the outcome had before collapse.
    #[must_use]
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// True when every measured qubit gave the same bit.
    #[must_use]
    pub fn all_equal(&self) -> bool {
        self.bits.windows(2).all(|pair| pair[0] == pair[1])
    }
}

/// Measure `qubits` of `state` in the computational basis.
///
/// Outcome combinations are indexed so that bit `j` of the combination is the value of
/// `qubits[j]`. Their marginal probabilities partition `[0, 1)` in combination order and
/// a single uniform draw from `source` picks the interval it falls into. The state then
/// collapses onto the chosen combination and is renormalized.
///
/// # Errors
///
/// Returns [`SimulationError::MeasurementArity`] when no qubits or more qubits than the
/// state has are requested, [`SimulationError::QubitOutOfRange`] and
/// [`SimulationError::DuplicateQubit`] for bad qubit lists, and
/// [`SimulationError::RandomSource`] when the source fails. The state is only modified
/// on success.
///
/// # Examples
///
/// ```
/// use amplimer::{measure, BasisLabel, Gate, ScriptedSource, StateVector};
///
/// let mut state = StateVector::prepare(&[BasisLabel::Zero, BasisLabel::Zero]).unwrap();
/// state.apply(Gate::Hadamard(0)).unwrap();
/// state.apply(Gate::ControlledX { control: 0, target: 1 }).unwrap();
///
/// // 0.75 lies in the upper half, which belongs to |11⟩.
/// let outcome = measure(&mut state, &[0, 1], &mut ScriptedSource::new([0.75])).unwrap();
/// assert_eq!(outcome.bits(), &[true, true]);
/// assert!((state.probability(0b11) - 1.0).abs() < 1e-12);
/// ```
pub fn measure<S: RandomSource + ?Sized>(
    state: &mut StateVector,
    qubits: &[QubitId],
    source: &mut S,
) -> Result<Outcome> {
    validate_measurement(state.qubit_count(), qubits)?;

    let mut marginals = [0.0; MAX_DIMENSION];
    for (index, amplitude) in state.amplitudes().iter().enumerate() {
        marginals[combination_of(index, qubits)] += amplitude.norm_sqr();
    }
    let marginals = &marginals[..1 << qubits.len()];

    let draw = source.next_uniform()?;
    let combination = select(marginals, draw);
    let probability = marginals[combination];

    collapse(state, qubits, combination, probability);

    Ok(Outcome {
        bits: (0..qubits.len()).map(|bit| combination & (1 << bit) != 0).collect(),
        probability,
    })
}

/// Check that `qubits` is a list of one or more distinct qubits of a `qubit_count` state.
///
/// # Errors
///
/// The qubit-list errors described on [`measure`].
pub fn validate_measurement(qubit_count: QubitCount, qubits: &[QubitId]) -> Result<()> {
    if qubits.is_empty() || qubits.len() > qubit_count.get() {
        return Err(SimulationError::MeasurementArity {
            requested: qubits.len(),
            qubit_count: qubit_count.get(),
        });
    }
    for (position, &qubit) in qubits.iter().enumerate() {
        qubit_count.check(qubit)?;
        if qubits[..position].contains(&qubit) {
            return Err(SimulationError::DuplicateQubit(qubit));
        }
    }
    Ok(())
}

/// Project a basis index onto the measured qubits.
fn combination_of(index: usize, qubits: &[QubitId]) -> usize {
    qubits
        .iter()
        .enumerate()
        .filter(|(_, &qubit)| index & (1 << qubit) != 0)
        .fold(0, |combination, (bit, _)| combination | (1 << bit))
}

/// First combination whose cumulative bound exceeds `draw`.
///
/// Rounding can leave the total slightly below one; a draw past it goes to the last
/// combination that has any weight.
fn select(marginals: &[f64], draw: f64) -> usize {
    let mut cumulative = 0.0;
    for (combination, &probability) in marginals.iter().enumerate() {
        cumulative += probability;
        if draw < cumulative {
            return combination;
        }
    }
    marginals.iter().rposition(|&probability| probability > 0.0).unwrap_or(0)
}

fn collapse(state: &mut StateVector, qubits: &[QubitId], combination: usize, probability: f64) {
    let scale = if probability > 0.0 { probability.sqrt().recip() } else { 0.0 };
    for (index, amplitude) in state.amplitudes_mut().iter_mut().enumerate() {
        if combination_of(index, qubits) == combination {
            *amplitude *= scale;
        } else {
            *amplitude = Amplitude::new(0.0, 0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RandomSourceError;
    use crate::random::ScriptedSource;
    use crate::state::NORM_TOLERANCE;
    use crate::BasisLabel::{One, Zero};
    use crate::Gate;

    fn bell_pair() -> StateVector {
        let mut state = StateVector::prepare(&[Zero, Zero]).unwrap();
        state.apply(Gate::Hadamard(0)).unwrap();
        state.apply(Gate::ControlledX { control: 0, target: 1 }).unwrap();
        state
    }

    #[test]
    fn basis_states_measure_deterministically() {
        for draw in [0.0, 0.5, 0.999_999] {
            let mut zero = StateVector::prepare(&[Zero]).unwrap();
            let outcome = measure(&mut zero, &[0], &mut ScriptedSource::new([draw])).unwrap();
            assert_eq!(outcome.bits(), &[false]);
            assert_eq!(outcome.probability(), 1.0);

            let mut one = StateVector::prepare(&[One]).unwrap();
            let outcome = measure(&mut one, &[0], &mut ScriptedSource::new([draw])).unwrap();
            assert_eq!(outcome.bits(), &[true]);
        }
    }

    #[test]
    fn draw_selects_cumulative_interval() {
        let mut low = bell_pair();
        let outcome = measure(&mut low, &[0, 1], &mut ScriptedSource::new([0.25])).unwrap();
        assert_eq!(outcome.bits(), &[false, false]);
        assert!((outcome.probability() - 0.5).abs() < 1e-12);

        let mut high = bell_pair();
        let outcome = measure(&mut high, &[0, 1], &mut ScriptedSource::new([0.75])).unwrap();
        assert_eq!(outcome.bits(), &[true, true]);
        assert!(outcome.all_equal());
    }

    #[test]
    fn boundary_draw_goes_to_the_next_interval() {
        let half = Amplitude::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        let mut state = StateVector::from_amplitudes(&[half, half]).unwrap();
        let boundary = state.probability(0);
        let outcome = measure(&mut state, &[0], &mut ScriptedSource::new([boundary])).unwrap();
        assert_eq!(outcome.bits(), &[true]);
    }

    #[test]
    fn zero_probability_outcomes_are_never_selected() {
        let mut state = StateVector::prepare(&[One, One]).unwrap();
        let outcome = measure(&mut state, &[0, 1], &mut ScriptedSource::new([0.0])).unwrap();
        assert_eq!(outcome.bits(), &[true, true]);
    }

    #[test]
    fn draw_past_rounded_total_selects_last_weighted_combination() {
        assert_eq!(select(&[0.5, 0.499_999_999_999], 0.999_999_999_999_5), 1);
        assert_eq!(select(&[0.3, 0.699_999_999, 0.0, 0.0], 0.999_999_999_5), 1);
    }

    #[test]
    fn collapse_renormalizes_partial_measurement() {
        let mut state = StateVector::prepare(&[Zero, Zero]).unwrap();
        state.apply(Gate::Hadamard(0)).unwrap();
        state.apply(Gate::Hadamard(1)).unwrap();

        let outcome = measure(&mut state, &[1], &mut ScriptedSource::new([0.9])).unwrap();
        assert_eq!(outcome.bits(), &[true]);
        assert!(state.is_normalized(NORM_TOLERANCE));
        assert!((state.probability(0b10) - 0.5).abs() < 1e-12);
        assert!((state.probability(0b11) - 0.5).abs() < 1e-12);
        assert_eq!(state.probability(0b00), 0.0);
        assert_eq!(state.probability(0b01), 0.0);
    }

    #[test]
    fn measuring_one_half_of_a_bell_pair_fixes_the_other() {
        let mut state = bell_pair();
        let first = measure(&mut state, &[0], &mut ScriptedSource::new([0.7])).unwrap();
        let second = measure(&mut state, &[1], &mut ScriptedSource::new([0.0])).unwrap();
        assert_eq!(first.bits(), second.bits());
        assert!((second.probability() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn qubit_order_determines_bit_order() {
        let mut state = StateVector::prepare(&[One, Zero]).unwrap();
        let outcome = measure(&mut state, &[1, 0], &mut ScriptedSource::new([0.5])).unwrap();
        assert_eq!(outcome.bits(), &[false, true]);
        assert!(!outcome.all_equal());
    }

    #[test]
    fn invalid_qubit_lists_are_rejected() {
        let mut state = bell_pair();
        let before = state.clone();
        let mut source = ScriptedSource::constant(0.5);
        assert_eq!(
            measure(&mut state, &[], &mut source),
            Err(SimulationError::MeasurementArity { requested: 0, qubit_count: 2 })
        );
        assert_eq!(
            measure(&mut state, &[0, 1, 0], &mut source),
            Err(SimulationError::MeasurementArity { requested: 3, qubit_count: 2 })
        );
        assert_eq!(
            measure(&mut state, &[1, 1], &mut source),
            Err(SimulationError::DuplicateQubit(1))
        );
        assert_eq!(
            measure(&mut state, &[2], &mut source),
            Err(SimulationError::QubitOutOfRange { qubit: 2, qubit_count: 2 })
        );
        assert_eq!(state, before);
        assert_eq!(source.draws_taken(), 0);
    }

    #[test]
    fn source_failure_propagates_and_keeps_state() {
        let mut state = bell_pair();
        let before = state.clone();
        let result = measure(&mut state, &[0, 1], &mut ScriptedSource::new(Vec::new()));
        assert_eq!(
            result,
            Err(SimulationError::RandomSource(RandomSourceError::Exhausted { draws: 0 }))
        );
        assert_eq!(state, before);
    }
}
