//! Runs catalog experiments under one configuration.

use amplimer::BasisLabel;
use tracing::info;

use crate::catalog::Experiment;
use crate::config::ExperimentConfig;
use crate::error::HarnessError;
use crate::sampling::SeedSplitter;
use crate::trial::{self, TrialResult};

/// Result of one experiment from one initial label.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExperimentRecord {
    pub experiment: Experiment,
    pub label: BasisLabel,
    pub result: TrialResult,
}

/// Runs experiments one after another, giving each run its own sub-stream seed.
///
/// Two harnesses built from the same seeded configuration produce the same records for
/// the same sequence of calls.
///
/// # Examples
///
/// ```
/// use amplimer::BasisLabel;
/// use bellverse::{Experiment, ExperimentConfig, Harness};
///
/// let config = ExperimentConfig::new(200)?.with_seed(9);
/// let mut harness = Harness::new(config);
/// let result = harness.run(Experiment::BellTest, BasisLabel::Zero)?;
/// assert_eq!(result.agreements, Some(200));
/// # Ok::<(), bellverse::HarnessError>(())
/// ```
pub struct Harness {
    config: ExperimentConfig,
    seeds: SeedSplitter,
}

impl Harness {
    #[must_use]
    pub fn new(config: ExperimentConfig) -> Self {
        let seeds = match config.seed() {
            Some(seed) => SeedSplitter::new(seed),
            None => SeedSplitter::from_entropy(),
        };
        Harness { config, seeds }
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Run `experiment` from `label` with the configured trial and partition counts.
    ///
    /// # Errors
    ///
    /// See [`trial::run_partitioned`].
    pub fn run(&mut self, experiment: Experiment, label: BasisLabel) -> Result<TrialResult, HarnessError> {
        let seed = self.seeds.next_seed();
        let result = trial::run_partitioned(
            label,
            &experiment.circuit(),
            self.config.trial_count(),
            seed,
            self.config.partitions(),
        )?;
        info!(
            %experiment,
            %label,
            trials = self.config.trial_count().get(),
            zeros = result.zeros,
            ones = result.ones,
            agreements = ?result.agreements,
            "experiment finished"
        );
        Ok(result)
    }

    /// Run every experiment from every label, experiments in the outer loop.
    ///
    /// # Errors
    ///
    /// Stops at the first failing run and returns its error.
    pub fn run_all(
        &mut self,
        experiments: &[Experiment],
        labels: &[BasisLabel],
    ) -> Result<Vec<ExperimentRecord>, HarnessError> {
        let mut records = Vec::with_capacity(experiments.len() * labels.len());
        for &experiment in experiments {
            for &label in labels {
                let result = self.run(experiment, label)?;
                records.push(ExperimentRecord {
                    experiment,
                    label,
                    result,
                });
            }
        }
        Ok(records)
    }
}
