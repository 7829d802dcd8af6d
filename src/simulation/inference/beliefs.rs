//! Belief state of the agent.
//!
//! Under the Laplace approximation the posterior is summarised by its central
//! values: the believed angle `μ` and its first-order motion `μ'`. The belief
//! also carries the internal goal trajectory `f` and the current action.

use crate::simulation::dynamics::PhaseState;
use crate::simulation::observation::LatentState;

/// Central values updated by one gradient step per observation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BeliefState {
    /// Believed joint angle `μ`
    pub mu: f64,
    /// Believed motion of the angle `μ'`
    pub dmu: f64,
    /// Internal trajectory `f = (f0, f1)` relaxing towards the goal
    pub trajectory: PhaseState,
    /// Current angular-velocity command
    pub action: f64,
}

/// Step of gradient descent on free energy, one entry per updated quantity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BeliefGradient {
    pub mu: f64,
    pub dmu: f64,
    pub action: f64,
}

impl BeliefState {
    #[must_use]
    pub fn new(mu: f64, dmu: f64) -> Self {
        Self {
            mu,
            dmu,
            ..Self::default()
        }
    }

    /// Angle and motion as a latent state.
    #[must_use]
    pub const fn latent(&self) -> LatentState {
        LatentState::new(self.mu, self.dmu)
    }

    /// Applies one explicit Euler step.
    ///
    /// `μ'` moves first; `μ` then follows the new motion plus its own
    /// correction `h·∂μ`. The trajectory advances along `trajectory_rate`.
    pub fn integrate(&mut self, gradient: &BeliefGradient, trajectory_rate: PhaseState, h: f64) {
        self.dmu += h * gradient.dmu;
        self.action += h * gradient.action;
        self.mu += self.dmu + h * gradient.mu;
        self.trajectory = self.trajectory.integrate(trajectory_rate, h);
    }

    /// First non-finite quantity, if any.
    #[must_use]
    pub fn non_finite(&self) -> Option<&'static str> {
        if !self.mu.is_finite() {
            Some("belief angle")
        } else if !self.dmu.is_finite() {
            Some("belief velocity")
        } else if !self.trajectory.is_finite() {
            Some("goal trajectory")
        } else if !self.action.is_finite() {
            Some("action")
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.non_finite().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_belief_state_new() {
        let belief = BeliefState::new(0.5, -0.1);
        assert!((belief.mu - 0.5).abs() < 1e-12);
        assert!((belief.dmu + 0.1).abs() < 1e-12);
        assert_eq!(belief.trajectory, PhaseState::default());
        assert!(belief.action.abs() < 1e-12);
    }

    #[test]
    fn test_integrate_moves_mu_with_new_motion() {
        let mut belief = BeliefState::new(0.0, 0.0);
        let gradient = BeliefGradient {
            mu: 1.0,
            dmu: 2.0,
            action: -1.0,
        };
        belief.integrate(&gradient, PhaseState::new(0.5, 0.25), 0.1);

        assert!((belief.dmu - 0.2).abs() < 1e-12);
        assert!((belief.action + 0.1).abs() < 1e-12);
        // new dmu (0.2) + h * grad mu (0.1)
        assert!((belief.mu - 0.3).abs() < 1e-12);
        assert!((belief.trajectory.position - 0.05).abs() < 1e-12);
        assert!((belief.trajectory.velocity - 0.025).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_reports_quantity() {
        let mut belief = BeliefState::new(0.0, 0.0);
        assert!(belief.is_finite());

        belief.action = f64::NAN;
        assert_eq!(belief.non_finite(), Some("action"));

        belief.mu = f64::INFINITY;
        assert_eq!(belief.non_finite(), Some("belief angle"));
    }
}
