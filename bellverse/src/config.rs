//! Validated run parameters.

use std::fmt;
use std::num::NonZeroUsize;

use crate::error::ConfigError;

pub const DEFAULT_TRIAL_COUNT: usize = 1000;

/// Number of independent trials per experiment and initial label. Always positive.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i64", into = "i64"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrialCount(NonZeroUsize);

impl TrialCount {
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositiveTrialCount`] for zero or negative counts.
    pub fn new(count: i64) -> Result<Self, ConfigError> {
        usize::try_from(count)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(TrialCount)
            .ok_or(ConfigError::NonPositiveTrialCount(count))
    }

    #[must_use]
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for TrialCount {
    fn default() -> Self {
        TrialCount(NonZeroUsize::new(DEFAULT_TRIAL_COUNT).unwrap_or(NonZeroUsize::MIN))
    }
}

impl TryFrom<i64> for TrialCount {
    type Error = ConfigError;

    fn try_from(count: i64) -> Result<Self, ConfigError> {
        TrialCount::new(count)
    }
}

impl TryFrom<usize> for TrialCount {
    type Error = ConfigError;

    fn try_from(count: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(count)
            .map(TrialCount)
            .ok_or(ConfigError::NonPositiveTrialCount(0))
    }
}

impl From<TrialCount> for i64 {
    fn from(count: TrialCount) -> i64 {
        i64::try_from(count.get()).unwrap_or(i64::MAX)
    }
}

impl fmt::Display for TrialCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters shared by every experiment of a run.
///
/// `seed` makes runs reproducible; without it a seed is drawn from entropy when the
/// run starts. `partitions` is the number of independently seeded slices the trials of
/// each experiment are split into and executed in parallel. Results depend on the
/// partition count but not on thread scheduling.
///
/// # Examples
///
/// ```
/// use bellverse::ExperimentConfig;
///
/// let config = ExperimentConfig::new(500).unwrap().with_seed(7).with_partitions(4).unwrap();
/// assert_eq!(config.trial_count().get(), 500);
/// assert_eq!(config.seed(), Some(7));
///
/// assert!(ExperimentConfig::new(0).is_err());
/// assert!(ExperimentConfig::new(-3).is_err());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct ExperimentConfig {
    trial_count: TrialCount,
    seed: Option<u64>,
    partitions: NonZeroUsize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            trial_count: TrialCount::default(),
            seed: None,
            partitions: NonZeroUsize::MIN,
        }
    }
}

impl ExperimentConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositiveTrialCount`] unless `trial_count` is positive.
    pub fn new(trial_count: i64) -> Result<Self, ConfigError> {
        Ok(ExperimentConfig {
            trial_count: TrialCount::new(trial_count)?,
            ..Self::default()
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroPartitions`] for zero.
    pub fn with_partitions(mut self, partitions: usize) -> Result<Self, ConfigError> {
        self.partitions = NonZeroUsize::new(partitions).ok_or(ConfigError::ZeroPartitions)?;
        Ok(self)
    }

    pub fn trial_count(&self) -> TrialCount {
        self.trial_count
    }

    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    #[must_use]
    pub fn partitions(&self) -> NonZeroUsize {
        self.partitions
    }
}
