//! Sources of uniform draws for the measurement engine.

use rand::{Rng, RngCore};

use crate::error::RandomSourceError;

/// A supplier of uniform draws in `[0, 1)`.
///
/// Every [`RngCore`] is a source that never fails. [`ScriptedSource`] replays a fixed
/// list of draws, which makes individual measurement branches reachable in tests.
pub trait RandomSource {
    /// Returns the next uniform draw.
    ///
    /// # Errors
    ///
    /// Returns [`RandomSourceError`] when the source cannot produce a draw in `[0, 1)`.
    fn next_uniform(&mut self) -> Result<f64, RandomSourceError>;
}

impl<R: RngCore> RandomSource for R {
    fn next_uniform(&mut self) -> Result<f64, RandomSourceError> {
        Ok(self.gen::<f64>())
    }
}

/// Replays a fixed sequence of draws, optionally cycling through it forever.
#[derive(Clone, Debug)]
pub struct ScriptedSource {
    draws: Vec<f64>,
    position: usize,
    cycle: bool,
}

impl ScriptedSource {
    /// A source that fails with [`RandomSourceError::Exhausted`] once `draws` run out.
    #[must_use]
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        ScriptedSource {
            draws: draws.into(),
            position: 0,
            cycle: false,
        }
    }

    /// A source that starts over after the last draw.
    #[must_use]
    pub fn cycle(draws: impl Into<Vec<f64>>) -> Self {
        ScriptedSource {
            cycle: true,
            ..Self::new(draws)
        }
    }

    /// A source that returns `value` forever.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::cycle([value])
    }

    /// Number of draws handed out so far.
    #[must_use]
    pub fn draws_taken(&self) -> usize {
        self.position
    }
}

impl RandomSource for ScriptedSource {
    fn next_uniform(&mut self) -> Result<f64, RandomSourceError> {
        let index = if self.cycle && !self.draws.is_empty() {
            self.position % self.draws.len()
        } else {
            self.position
        };
        let value = *self
            .draws
            .get(index)
            .ok_or(RandomSourceError::Exhausted { draws: self.position })?;
        self.position += 1;
        if (0.0..1.0).contains(&value) {
            Ok(value)
        } else {
            Err(RandomSourceError::OutOfRange(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn scripted_source_replays_then_exhausts() {
        let mut source = ScriptedSource::new([0.25, 0.75]);
        assert_eq!(source.next_uniform(), Ok(0.25));
        assert_eq!(source.next_uniform(), Ok(0.75));
        assert_eq!(source.next_uniform(), Err(RandomSourceError::Exhausted { draws: 2 }));
        assert_eq!(source.draws_taken(), 2);
    }

    #[test]
    fn cycling_source_never_exhausts() {
        let mut source = ScriptedSource::cycle([0.1, 0.9]);
        let draws: Vec<f64> = (0..5).map(|_| source.next_uniform().unwrap()).collect();
        assert_eq!(draws, vec![0.1, 0.9, 0.1, 0.9, 0.1]);
    }

    #[test]
    fn empty_cycle_is_exhausted() {
        let mut source = ScriptedSource::cycle(Vec::new());
        assert!(matches!(source.next_uniform(), Err(RandomSourceError::Exhausted { .. })));
    }

    #[test]
    fn draws_outside_unit_interval_are_rejected() {
        let mut source = ScriptedSource::new([1.0, -0.5]);
        assert_eq!(source.next_uniform(), Err(RandomSourceError::OutOfRange(1.0)));
        assert_eq!(source.next_uniform(), Err(RandomSourceError::OutOfRange(-0.5)));
    }

    #[test]
    fn rng_draws_stay_in_unit_interval() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let value = rng.next_uniform().unwrap();
            assert!((0.0..1.0).contains(&value));
        }
    }
}
