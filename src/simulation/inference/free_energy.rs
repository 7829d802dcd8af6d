//! Variational free energy of the arm model and its gradients.
//!
//! Laplace-encoded free energy, factorised as
//! `p(s, μ) = p(sp | μ) · p(sv | μ) · p(μ' | f)`:
//!
//! ```text
//! F = ½ εpᵀ Πp εp + ½ εvᵀ Πv εv + ½ (μ' − f0)ᵀ Πd (μ' − f0)
//! εp = sp − μ
//! εv = sv − L·g(μ)
//! ```
//!
//! Perception descends `F` along `μ` and `μ'`; action descends the same
//! sensory errors through an estimate of how sensations respond to action.

use nalgebra::Vector2;

use crate::simulation::kinematics::{forward_jacobian, hand_position};
use crate::simulation::observation::Observation;

use super::beliefs::{BeliefGradient, BeliefState};
use super::noise::NoiseModel;

/// Sensory prediction errors of a belief.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PredictionErrors {
    /// `sp − μ`
    pub proprioceptive: f64,
    /// `sv − L·g(μ)`
    pub visual: Vector2<f64>,
}

/// Estimate of how much each sensory channel moves per unit of action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActionSensitivity {
    /// Constant `h / k` on every channel.
    #[default]
    FixedGain,
    /// Magnitude of change between the current and previous observation.
    ObservedChange,
}

impl ActionSensitivity {
    /// Returns `(dsp, dsv)`.
    #[must_use]
    pub fn sensitivities(
        self,
        observation: &Observation,
        previous: &Observation,
        h: f64,
        k: f64,
    ) -> (f64, Vector2<f64>) {
        match self {
            Self::FixedGain => {
                let gain = h / k;
                (gain, Vector2::repeat(gain))
            }
            Self::ObservedChange => (
                (observation.proprioceptive - previous.proprioceptive).abs(),
                (Vector2::from(observation.visual) - Vector2::from(previous.visual)).abs(),
            ),
        }
    }
}

/// Prediction errors of `observation` under the believed angle `mu`.
#[must_use]
pub fn prediction_errors(observation: &Observation, mu: f64, arm_length: f64) -> PredictionErrors {
    PredictionErrors {
        proprioceptive: observation.proprioceptive - mu,
        visual: Vector2::from(observation.visual) - Vector2::from(hand_position(mu, arm_length)),
    }
}

/// Free energy of the belief (up to constants).
#[must_use]
pub fn variational_free_energy(
    errors: &PredictionErrors,
    belief: &BeliefState,
    noise: &NoiseModel,
) -> f64 {
    let proprioceptive = 0.5 * errors.proprioceptive.powi(2) / noise.proprioceptive_variance();
    let visual = 0.5 * errors.visual.dot(&(noise.visual_precision() * errors.visual));
    let prior = 0.5 * (belief.dmu - belief.trajectory.position).powi(2) / noise.velocity_variance();
    proprioceptive + visual + prior
}

/// Descent direction of free energy for angle, motion and action.
///
/// * `∂μ  = εp/σp² + g'(μ)ᵀ Πv εv + f1 (μ' − f0)/σd²`
/// * `∂μ' = (f0 − μ')/σd²`
/// * `∂a  = −dsp εp/σp² − (Πv dsv)ᵀ εv`
#[must_use]
pub fn vfe_gradient(
    errors: &PredictionErrors,
    belief: &BeliefState,
    noise: &NoiseModel,
    sensitivity: (f64, Vector2<f64>),
) -> BeliefGradient {
    let precision = noise.visual_precision();
    let weighted_proprioceptive = errors.proprioceptive / noise.proprioceptive_variance();
    let f = belief.trajectory;

    // Sensory evidence
    let d_mu_proprioceptive = weighted_proprioceptive;
    let weighted_visual = precision * errors.visual;
    let d_mu_visual = Vector2::from(forward_jacobian(belief.mu)).dot(&weighted_visual);
    // Prior dynamics
    let d_mu_prior = f.velocity * (belief.dmu - f.position) / noise.velocity_variance();

    let (dsp, dsv) = sensitivity;
    let d_action = -dsp * weighted_proprioceptive - (precision * dsv).dot(&errors.visual);

    BeliefGradient {
        mu: d_mu_proprioceptive + d_mu_visual + d_mu_prior,
        dmu: (f.position - belief.dmu) / noise.velocity_variance(),
        action: d_action,
    }
}
