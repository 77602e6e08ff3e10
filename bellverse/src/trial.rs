//! Repeated prepare, apply, measure cycles and their aggregated counts.

use std::iter::Sum;
use std::num::NonZeroUsize;
use std::ops::{Add, AddAssign};

use amplimer::{measure, BasisLabel, NormCheck, RandomSource, SimulationError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use smallvec::SmallVec;
use tracing::{debug, error, trace};

use crate::circuit::{Circuit, Instruction};
use crate::config::TrialCount;
use crate::error::HarnessError;
use crate::sampling::{partition_sizes, SeedSplitter};

/// Aggregated counts of a run.
///
/// `zeros` and `ones` count the first measured bit of every trial. `agreements` counts the
/// trials whose measured bits were all equal and is `None` for circuits that measure a
/// single qubit.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TrialResult {
    pub zeros: usize,
    pub ones: usize,
    pub agreements: Option<usize>,
}

impl TrialResult {
    /// The counts of a run of `circuit` before any trial.
    #[must_use]
    pub fn empty(circuit: &Circuit) -> Self {
        TrialResult {
            agreements: (circuit.measured_qubit_count() > 1).then_some(0),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn trials(&self) -> usize {
        self.zeros + self.ones
    }

    /// Count the bits one trial measured.
    pub fn record(&mut self, bits: &[bool]) {
        let Some(&first) = bits.first() else {
            return;
        };
        if first {
            self.ones += 1;
        } else {
            self.zeros += 1;
        }
        if bits.len() > 1 {
            let agreed = bits.iter().all(|&bit| bit == first);
            self.agreements = Some(self.agreements.unwrap_or(0) + usize::from(agreed));
        }
    }
}

impl Add for TrialResult {
    type Output = TrialResult;

    fn add(self, other: TrialResult) -> TrialResult {
        TrialResult {
            zeros: self.zeros + other.zeros,
            ones: self.ones + other.ones,
            agreements: match (self.agreements, other.agreements) {
                (Some(left), Some(right)) => Some(left + right),
                (agreements, None) | (None, agreements) => agreements,
            },
        }
    }
}

impl AddAssign for TrialResult {
    fn add_assign(&mut self, other: TrialResult) {
        *self = *self + other;
    }
}

impl Sum for TrialResult {
    fn sum<I: Iterator<Item = TrialResult>>(iter: I) -> Self {
        iter.fold(TrialResult::default(), Add::add)
    }
}

/// Run one trial of `circuit` from `initial` and return the measured bits in order.
///
/// The state is checked after every instruction: small drift is renormalized, larger
/// drift aborts the trial.
///
/// # Errors
///
/// Returns [`SimulationError::NumericalDrift`] on fatal drift and
/// [`SimulationError::RandomSource`] when `source` fails.
pub fn run_trial<S: RandomSource + ?Sized>(
    initial: BasisLabel,
    circuit: &Circuit,
    source: &mut S,
) -> Result<SmallVec<[bool; 2]>, SimulationError> {
    let mut state = circuit.initial_state(initial)?;
    let mut bits = SmallVec::new();
    for instruction in circuit.iter() {
        match instruction {
            Instruction::Unitary(gate) => state.apply(*gate)?,
            Instruction::Measure { qubits } => {
                let outcome = measure(&mut state, qubits, source)?;
                bits.extend_from_slice(outcome.bits());
            }
        }
        if let NormCheck::Renormalized { norm_sqr } = state.stabilize_norm()? {
            trace!(norm_sqr, %instruction, "renormalized state");
        }
    }
    Ok(bits)
}

/// Run `trial_count` trials of `circuit` from `initial`, drawing from `source`.
///
/// All or nothing: a failing trial discards the counts gathered so far.
///
/// # Errors
///
/// Returns [`HarnessError::Config`] for a circuit that measures nothing and
/// [`HarnessError::Simulation`] for the first trial that fails.
///
/// # Examples
///
/// ```
/// use amplimer::{BasisLabel, Gate, QubitCount};
/// use bellverse::{trial, Circuit, TrialCount};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let circuit = Circuit::new(QubitCount::One).then(Gate::PauliX(0))?.measure(&[0])?;
/// let count = TrialCount::new(100)?;
/// let result = trial::run(BasisLabel::Zero, &circuit, count, &mut StdRng::seed_from_u64(1))?;
/// assert_eq!((result.zeros, result.ones, result.agreements), (0, 100, None));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn run<S: RandomSource + ?Sized>(
    initial: BasisLabel,
    circuit: &Circuit,
    trial_count: TrialCount,
    source: &mut S,
) -> Result<TrialResult, HarnessError> {
    circuit.validate()?;
    debug!(label = %initial, trials = trial_count.get(), %circuit, "running trials");
    let result = run_trials(initial, circuit, trial_count.get(), source)?;
    debug!(label = %initial, ?result, "trials finished");
    Ok(result)
}

/// Run `trial_count` trials split over `partitions` independently seeded slices in
/// parallel.
///
/// The seed of every slice is drawn from a generator seeded with `seed`, so the result
/// depends only on the arguments and never on thread scheduling.
///
/// # Errors
///
/// As [`run`]; the whole run fails if any slice fails.
pub fn run_partitioned(
    initial: BasisLabel,
    circuit: &Circuit,
    trial_count: TrialCount,
    seed: u64,
    partitions: NonZeroUsize,
) -> Result<TrialResult, HarnessError> {
    circuit.validate()?;
    debug!(
        label = %initial,
        trials = trial_count.get(),
        partitions = partitions.get(),
        seed,
        %circuit,
        "running partitioned trials"
    );

    let mut seeds = SeedSplitter::new(seed);
    let plan: Vec<(usize, u64)> = partition_sizes(trial_count.get(), partitions.get())
        .map(|size| (size, seeds.next_seed()))
        .collect();

    let result = plan
        .into_par_iter()
        .map(|(size, partition_seed)| {
            let mut rng = StdRng::seed_from_u64(partition_seed);
            run_trials(initial, circuit, size, &mut rng)
        })
        .try_reduce(|| TrialResult::empty(circuit), |left, right| Ok(left + right))?;

    debug!(label = %initial, ?result, "partitioned trials finished");
    Ok(result)
}

fn run_trials<S: RandomSource + ?Sized>(
    initial: BasisLabel,
    circuit: &Circuit,
    count: usize,
    source: &mut S,
) -> Result<TrialResult, SimulationError> {
    let mut result = TrialResult::empty(circuit);
    for index in 0..count {
        match run_trial(initial, circuit, source) {
            Ok(bits) => result.record(&bits),
            Err(err) => {
                error!(label = %initial, trial = index, %err, "trial aborted");
                return Err(err);
            }
        }
    }
    Ok(result)
}
