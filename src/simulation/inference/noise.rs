//! Noise model of the agent: variances of each sensory channel and the
//! precisions derived from them.
//!
//! Precision (inverse variance) weights how strongly a channel's prediction
//! error moves the belief. Every derived quantity is rebuilt together, so the
//! visual precision can never go stale relative to its covariance.

use nalgebra::{Matrix2, Vector2};

use crate::simulation::error::ConfigurationError;

/// Variances and precisions the generative model assumes.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseModel {
    sigma: f64,
    proprioceptive_variance: f64,
    visual_covariance: Matrix2<f64>,
    visual_precision: Matrix2<f64>,
    visual_cholesky: Matrix2<f64>,
    velocity_variance: f64,
}

impl NoiseModel {
    /// Isotropic noise model with standard deviation `sigma` on every channel.
    ///
    /// # Errors
    /// [`ConfigurationError::NonPositiveSigma`] when `sigma <= 0` or not finite.
    pub fn new(sigma: f64) -> Result<Self, ConfigurationError> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(ConfigurationError::NonPositiveSigma(sigma));
        }
        let variance = sigma * sigma;
        let visual_covariance = Matrix2::from_diagonal_element(variance);
        let singular = ConfigurationError::SingularCovariance(visual_covariance.determinant());
        let visual_precision = visual_covariance.try_inverse().ok_or(singular)?;
        let visual_cholesky = visual_covariance.cholesky().ok_or(singular)?.l();

        Ok(Self {
            sigma,
            proprioceptive_variance: variance,
            visual_covariance,
            visual_precision,
            visual_cholesky,
            velocity_variance: variance,
        })
    }

    /// Replaces every derived quantity, or nothing at all on error.
    ///
    /// # Errors
    /// See [`NoiseModel::new`].
    pub fn set_sigma(&mut self, sigma: f64) -> Result<(), ConfigurationError> {
        *self = Self::new(sigma)?;
        Ok(())
    }

    #[must_use]
    pub const fn sigma(&self) -> f64 {
        self.sigma
    }

    #[must_use]
    pub const fn proprioceptive_variance(&self) -> f64 {
        self.proprioceptive_variance
    }

    #[must_use]
    pub const fn velocity_variance(&self) -> f64 {
        self.velocity_variance
    }

    #[must_use]
    pub const fn visual_covariance(&self) -> &Matrix2<f64> {
        &self.visual_covariance
    }

    /// Inverse of the visual covariance.
    #[must_use]
    pub const fn visual_precision(&self) -> &Matrix2<f64> {
        &self.visual_precision
    }

    /// Lower Cholesky factor of the visual covariance, for sampling.
    #[must_use]
    pub const fn visual_cholesky(&self) -> &Matrix2<f64> {
        &self.visual_cholesky
    }

    #[must_use]
    pub fn proprioceptive_std(&self) -> f64 {
        self.proprioceptive_variance.sqrt()
    }

    /// Correlated visual noise from independent standard normals `z`.
    #[must_use]
    pub fn visual_sample(&self, z: Vector2<f64>) -> Vector2<f64> {
        self.visual_cholesky * z
    }
}
