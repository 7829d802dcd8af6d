//! Damped second-order (proportional-derivative) dynamics.
//!
//! ```text
//! m·ẍ = target − k·x − φ·ẋ
//! ```
//!
//! The same system is used as a free-standing controller ([`ProportionalDerivative::step`])
//! and as a prior whose caller owns the integration ([`ProportionalDerivative::derivative`]).

use crate::simulation::params::{PD_DAMPING, PD_GAIN, PD_MASS, PD_STEP};

/// A `(position, velocity)` pair.
///
/// When returned by [`ProportionalDerivative::derivative`] the fields hold the
/// rates of change of position and velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhaseState {
    pub position: f64,
    pub velocity: f64,
}

impl PhaseState {
    #[must_use]
    pub const fn new(position: f64, velocity: f64) -> Self {
        Self { position, velocity }
    }

    /// Explicit Euler step: `self + h * rate`.
    #[must_use]
    pub fn integrate(self, rate: Self, h: f64) -> Self {
        Self {
            position: self.position + h * rate.position,
            velocity: self.velocity + h * rate.velocity,
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

/// Proportional-derivative system with stiffness `k`, damping `phi` and mass `m`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProportionalDerivative {
    pub k: f64,
    pub phi: f64,
    pub m: f64,
    /// Step of the self-integrating form
    pub h: f64,
}

impl Default for ProportionalDerivative {
    fn default() -> Self {
        Self::new(PD_GAIN, PD_DAMPING, PD_MASS)
    }
}

impl ProportionalDerivative {
    #[must_use]
    pub const fn new(k: f64, phi: f64, m: f64) -> Self {
        Self {
            k,
            phi,
            m,
            h: PD_STEP,
        }
    }

    /// Same system with a different internal step for [`Self::step`].
    #[must_use]
    pub const fn with_step(mut self, h: f64) -> Self {
        self.h = h;
        self
    }

    #[inline]
    fn acceleration(&self, position: f64, velocity: f64, target: f64) -> f64 {
        (target - self.k * position - self.phi * velocity) / self.m
    }

    /// Advances `state` by one internal step towards `target`.
    ///
    /// Velocity Euler: the position moves first and the velocity update sees
    /// the new position.
    #[must_use]
    pub fn step(&self, state: PhaseState, target: f64) -> PhaseState {
        let position = state.position + self.h * state.velocity;
        let velocity =
            state.velocity + self.h * self.acceleration(position, state.velocity, target);
        PhaseState { position, velocity }
    }

    /// Instantaneous `(ẋ, ẍ)` at `state`; nothing is advanced.
    #[must_use]
    pub fn derivative(&self, state: PhaseState, target: f64) -> PhaseState {
        PhaseState {
            position: state.velocity,
            velocity: self.acceleration(state.position, state.velocity, target),
        }
    }

    /// Equilibrium reached for a constant target.
    #[must_use]
    pub fn fixed_point(&self, target: f64) -> PhaseState {
        PhaseState::new(target / self.k, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivative_does_not_move_state() {
        let pd = ProportionalDerivative::new(1.0, 2.0, 1.0);
        let state = PhaseState::new(0.3, -0.1);
        let rate = pd.derivative(state, 0.5);

        assert!((rate.position - -0.1).abs() < 1e-12);
        // (0.5 - 0.3 + 0.2) / 1
        assert!((rate.velocity - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_derivative_zero_at_fixed_point() {
        let pd = ProportionalDerivative::new(2.0, 0.7, 3.0);
        let rest = pd.fixed_point(0.8);
        let rate = pd.derivative(rest, 0.8);
        assert!(rate.position.abs() < 1e-12);
        assert!(rate.velocity.abs() < 1e-12);
    }

    #[test]
    fn test_step_uses_advanced_position() {
        let pd = ProportionalDerivative::new(1.0, 0.0, 1.0).with_step(0.5);
        let next = pd.step(PhaseState::new(0.0, 1.0), 0.0);
        assert!((next.position - 0.5).abs() < 1e-12);
        // velocity sees position 0.5, not 0.0
        assert!((next.velocity - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_mass_scales_acceleration() {
        let light = ProportionalDerivative::new(1.0, 1.0, 1.0);
        let heavy = ProportionalDerivative::new(1.0, 1.0, 4.0);
        let state = PhaseState::new(0.0, 0.0);
        let a = light.derivative(state, 1.0).velocity;
        let b = heavy.derivative(state, 1.0).velocity;
        assert!((a - 4.0 * b).abs() < 1e-12);
    }
}
