//! Generative model of the one-joint arm: `p(s, μ) = p(sp|μ) · p(sv|μ) · p(μ'|f)`.
//!
//! The agent's prior about motion comes from an internal proportional-derivative
//! trajectory `f` relaxing towards the goal. Perception and action descend the
//! same free energy once per observation.

use nalgebra::Vector2;

use crate::simulation::config::ModelConfig;
use crate::simulation::dynamics::{PhaseState, ProportionalDerivative};
use crate::simulation::error::ConfigurationError;
use crate::simulation::kinematics::hand_position;
use crate::simulation::observation::{Observation, SharedRng, standard_normals};

use super::beliefs::BeliefState;
use super::free_energy::{
    ActionSensitivity, prediction_errors, variational_free_energy, vfe_gradient,
};
use super::noise::NoiseModel;

/// How the goal enters the prior trajectory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GoalFrame {
    /// Target `gain · ρ`.
    Absolute,
    /// Target `gain · (ρ − μ)`: the prior rests once the belief sits on the goal.
    #[default]
    Relative,
}

/// The agent.
#[derive(Debug)]
pub struct GenerativeModel {
    belief: BeliefState,
    /// Last consumed observation, `None` before the first update
    previous: Option<Observation>,
    noise: NoiseModel,
    goal: f64,
    goal_frame: GoalFrame,
    goal_gain: f64,
    step: f64,
    arm_length: f64,
    dynamics: ProportionalDerivative,
    sensitivity: ActionSensitivity,
    rng: SharedRng,
}

impl GenerativeModel {
    /// Creates an agent believing the arm rests at `mu`.
    ///
    /// # Errors
    /// Non-positive model sigma.
    pub fn new(
        rng: SharedRng,
        config: &ModelConfig,
        goal: f64,
        mu: f64,
        arm_length: f64,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            belief: BeliefState::new(mu, 0.0),
            previous: None,
            noise: NoiseModel::new(config.sigma)?,
            goal,
            goal_frame: config.goal_frame,
            goal_gain: config.goal_gain,
            step: config.step,
            arm_length,
            dynamics: config.dynamics,
            sensitivity: config.sensitivity,
            rng,
        })
    }

    /// Target driving the internal trajectory this step.
    fn trajectory_target(&self) -> f64 {
        match self.goal_frame {
            GoalFrame::Absolute => self.goal_gain * self.goal,
            GoalFrame::Relative => self.goal_gain * (self.goal - self.belief.mu),
        }
    }

    /// Fictive observation sampled from the current belief with the model's own noise.
    ///
    /// Draws from the shared stream but never touches the belief.
    pub fn generate(&self) -> Observation {
        let [zp, zx, zy] = standard_normals::<3>(&self.rng);
        let hand = Vector2::from(hand_position(self.belief.mu, self.arm_length));
        let visual = hand + self.noise.visual_sample(Vector2::new(zx, zy));
        Observation::new(
            self.belief.mu + zp * self.noise.proprioceptive_std(),
            visual.into(),
        )
    }

    /// One gradient-descent step of free energy; returns the new action.
    pub fn update(&mut self, observation: &Observation) -> f64 {
        let previous = self.previous.unwrap_or(*observation);

        let trajectory_rate: PhaseState = self
            .dynamics
            .derivative(self.belief.trajectory, self.trajectory_target());

        let errors = prediction_errors(observation, self.belief.mu, self.arm_length);
        let sensitivity =
            self.sensitivity
                .sensitivities(observation, &previous, self.step, self.dynamics.k);
        let gradient = vfe_gradient(&errors, &self.belief, &self.noise, sensitivity);

        self.belief.integrate(&gradient, trajectory_rate, self.step);
        self.previous = Some(*observation);

        self.belief.action
    }

    /// Replaces the assumed noise on every channel at once.
    ///
    /// # Errors
    /// `sigma <= 0` or not finite; nothing changes.
    pub fn set_sigma(&mut self, sigma: f64) -> Result<(), ConfigurationError> {
        self.noise.set_sigma(sigma)
    }

    /// Free energy of `observation` under the current belief.
    #[must_use]
    pub fn free_energy(&self, observation: &Observation) -> f64 {
        let errors = prediction_errors(observation, self.belief.mu, self.arm_length);
        variational_free_energy(&errors, &self.belief, &self.noise)
    }

    #[must_use]
    pub const fn belief(&self) -> &BeliefState {
        &self.belief
    }

    #[must_use]
    pub const fn noise(&self) -> &NoiseModel {
        &self.noise
    }

    #[must_use]
    pub const fn goal(&self) -> f64 {
        self.goal
    }

    #[must_use]
    pub const fn sensitivity(&self) -> ActionSensitivity {
        self.sensitivity
    }
}
