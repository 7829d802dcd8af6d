//! Independent runs in parallel, one random stream per run.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::simulation::config::SimulationConfig;
use crate::simulation::driver::{NullRenderer, RunSummary, Simulation};
use crate::simulation::error::{ConfigurationError, SimulationError};

/// Outcome of one seeded run.
#[derive(Debug)]
pub struct SweepResult {
    pub seed: u64,
    pub outcome: Result<RunSummary, SimulationError>,
}

/// `runs` consecutive seeds starting at `base`.
///
/// # Errors
/// [`ConfigurationError::SeedOverflow`] when the last seed would pass `u64::MAX`.
pub fn consecutive_seeds(base: u64, runs: u64) -> Result<Vec<u64>, ConfigurationError> {
    if runs == 0 {
        return Ok(Vec::new());
    }
    let last = base
        .checked_add(runs - 1)
        .ok_or(ConfigurationError::SeedOverflow { base, runs })?;
    Ok((base..=last).collect())
}

/// Runs `config` once per seed. Results keep the order of `seeds`.
///
/// Each run builds its own stream inside its own task, so runs never share
/// random state.
#[must_use]
pub fn sweep(config: &SimulationConfig, seeds: &[u64]) -> Vec<SweepResult> {
    info!(runs = seeds.len(), "starting sweep");
    seeds
        .par_iter()
        .map(|&seed| {
            let outcome = Simulation::new(config.with_seed(seed))
                .and_then(|mut sim| sim.run(&mut NullRenderer));
            if let Err(err) = &outcome {
                warn!(seed, %err, "run failed");
            }
            SweepResult { seed, outcome }
        })
        .collect()
}

/// Aggregate of the successful runs of a sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SweepStats {
    pub runs: usize,
    pub failures: usize,
    pub mean_belief_error: f64,
    pub max_belief_error: f64,
    pub max_tracking_error: f64,
}

#[must_use]
pub fn summarize(results: &[SweepResult]) -> SweepStats {
    let summaries: Vec<&RunSummary> = results
        .iter()
        .filter_map(|r| r.outcome.as_ref().ok())
        .collect();
    let runs = summaries.len();
    let mut stats = SweepStats {
        runs,
        failures: results.len() - runs,
        ..SweepStats::default()
    };
    if runs == 0 {
        return stats;
    }

    #[allow(clippy::cast_precision_loss)]
    let count = runs as f64;
    stats.mean_belief_error = summaries.iter().map(|s| s.belief_error()).sum::<f64>() / count;
    stats.max_belief_error = summaries
        .iter()
        .map(|s| s.belief_error())
        .fold(0.0, f64::max);
    stats.max_tracking_error = summaries
        .iter()
        .map(|s| s.tracking_error())
        .fold(0.0, f64::max);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consecutive_seeds() {
        assert_eq!(consecutive_seeds(4, 3), Ok(vec![4, 5, 6]));
        assert_eq!(consecutive_seeds(9, 0), Ok(Vec::new()));
        assert_eq!(consecutive_seeds(u64::MAX, 1), Ok(vec![u64::MAX]));
    }

    #[test]
    fn test_consecutive_seeds_overflow() {
        assert_eq!(
            consecutive_seeds(u64::MAX - 1, 3),
            Err(ConfigurationError::SeedOverflow {
                base: u64::MAX - 1,
                runs: 3
            })
        );
    }
}
