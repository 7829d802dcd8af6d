//! Error types shared by the simulation components.

use thiserror::Error;

/// Rejected configuration; the receiving component is left unchanged.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigurationError {
    #[error("sigma must be positive and finite, got {0}")]
    NonPositiveSigma(f64),
    #[error("sensor sigma must be non-negative and finite, got {0}")]
    NegativeSigma(f64),
    #[error("visual covariance is not invertible (determinant {0})")]
    SingularCovariance(f64),
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("{runs} seeds starting at {base} run past u64::MAX")]
    SeedOverflow { base: u64, runs: u64 },
}

/// A belief, action or process value stopped being finite.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("non-finite {quantity} at tick {tick}")]
pub struct NumericalDivergence {
    pub quantity: &'static str,
    pub tick: u64,
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Divergence(#[from] NumericalDivergence),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Checks that `value` is strictly positive and finite.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigurationError::NonPositive { name, value })
    }
}
