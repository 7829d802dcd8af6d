//! Run configuration and named presets.

use crate::simulation::dynamics::ProportionalDerivative;
use crate::simulation::error::{ConfigurationError, require_positive};
use crate::simulation::inference::{ActionSensitivity, GoalFrame};
use crate::simulation::params::{
    ARM_LENGTH, DEFAULT_GOAL, DYNAMICS_STEP, INTEGRATION_STEP, MODEL_SIGMA, PD_DAMPING, PD_GAIN,
    PD_MASS, PROCESS_SIGMA, REFERENCE_GOAL_GAIN, REFERENCE_TICKS, RENDER_EVERY,
    TRACKING_GOAL_GAIN, TRACKING_MODEL_SIGMA, TRACKING_PROCESS_SIGMA, TRACKING_TICKS,
};

/// Named parameter bundles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    /// Numbers of the first reaching experiments: absolute goal target,
    /// tight model noise, noisier sensors.
    Reference,
    /// Goal-relative prior that settles on the goal.
    #[default]
    Tracking,
}

/// What the driver does when a value stops being finite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DivergencePolicy {
    /// Stop and report [`NumericalDivergence`](crate::simulation::error::NumericalDivergence).
    #[default]
    Abort,
    /// Rebuild the agent and put the arm back at its initial state.
    Reset,
}

/// The simulated arm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProcessConfig {
    /// Sensor noise standard deviation (zero gives noiseless sensors)
    pub sigma: f64,
    /// Integration step `fh`
    pub step: f64,
    pub dynamics: ProportionalDerivative,
}

/// The agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelConfig {
    /// Assumed noise standard deviation on every channel
    pub sigma: f64,
    /// Gradient-descent step `h`
    pub step: f64,
    /// Prior dynamics of the internal goal trajectory
    pub dynamics: ProportionalDerivative,
    pub sensitivity: ActionSensitivity,
    pub goal_frame: GoalFrame,
    /// Scale applied to the goal before it drives the prior
    pub goal_gain: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    /// `None` seeds from OS entropy
    pub seed: Option<u64>,
    pub ticks: u64,
    pub render_every: u64,
    /// Goal angle `rho`
    pub goal: f64,
    pub initial_angle: f64,
    pub initial_velocity: f64,
    /// Starting belief about the angle
    pub model_initial_angle: f64,
    pub arm_length: f64,
    pub process: ProcessConfig,
    pub model: ModelConfig,
    pub divergence: DivergencePolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn preset(preset: Preset) -> Self {
        let dynamics = ProportionalDerivative::new(PD_GAIN, PD_DAMPING, PD_MASS);
        let reference = Self {
            seed: None,
            ticks: REFERENCE_TICKS,
            render_every: RENDER_EVERY,
            goal: DEFAULT_GOAL,
            initial_angle: 0.0,
            initial_velocity: 0.0,
            model_initial_angle: 0.0,
            arm_length: ARM_LENGTH,
            process: ProcessConfig {
                sigma: PROCESS_SIGMA,
                step: DYNAMICS_STEP,
                dynamics,
            },
            model: ModelConfig {
                sigma: MODEL_SIGMA,
                step: INTEGRATION_STEP,
                dynamics,
                sensitivity: ActionSensitivity::FixedGain,
                goal_frame: GoalFrame::Absolute,
                goal_gain: REFERENCE_GOAL_GAIN,
            },
            divergence: DivergencePolicy::Abort,
        };

        match preset {
            Preset::Reference => reference,
            Preset::Tracking => Self {
                ticks: TRACKING_TICKS,
                process: ProcessConfig {
                    sigma: TRACKING_PROCESS_SIGMA,
                    ..reference.process
                },
                model: ModelConfig {
                    sigma: TRACKING_MODEL_SIGMA,
                    goal_frame: GoalFrame::Relative,
                    goal_gain: TRACKING_GOAL_GAIN,
                    ..reference.model
                },
                ..reference
            },
        }
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks every field the components would otherwise reject later.
    ///
    /// # Errors
    /// The first offending field as a [`ConfigurationError`].
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.process.sigma.is_finite() && self.process.sigma >= 0.0) {
            return Err(ConfigurationError::NegativeSigma(self.process.sigma));
        }
        if !(self.model.sigma.is_finite() && self.model.sigma > 0.0) {
            return Err(ConfigurationError::NonPositiveSigma(self.model.sigma));
        }
        require_positive("process step", self.process.step)?;
        require_positive("model step", self.model.step)?;
        require_positive("process mass", self.process.dynamics.m)?;
        require_positive("model mass", self.model.dynamics.m)?;
        require_positive("model gain", self.model.dynamics.k)?;
        require_positive("arm length", self.arm_length)?;
        #[allow(clippy::cast_precision_loss)]
        require_positive("render cadence", self.render_every as f64)?;
        for (name, value) in [
            ("goal", self.goal),
            ("goal gain", self.model.goal_gain),
            ("initial angle", self.initial_angle),
            ("initial velocity", self.initial_velocity),
            ("model initial angle", self.model_initial_angle),
        ] {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFinite { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(SimulationConfig::preset(Preset::Reference).validate().is_ok());
        assert!(SimulationConfig::preset(Preset::Tracking).validate().is_ok());
    }

    #[test]
    fn test_reference_uses_absolute_goal() {
        let config = SimulationConfig::preset(Preset::Reference);
        assert_eq!(config.model.goal_frame, GoalFrame::Absolute);
        assert!((config.model.goal_gain - config.process.step).abs() < 1e-12);
        assert!((config.process.sigma - 0.2).abs() < 1e-12);
        assert!((config.model.sigma - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_fields() {
        let mut config = SimulationConfig::default();
        config.model.sigma = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigurationError::NonPositiveSigma(0.0))
        );

        let mut config = SimulationConfig::default();
        config.process.sigma = -0.1;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.process.sigma = 0.0;
        assert!(config.validate().is_ok());

        let mut config = SimulationConfig::default();
        config.render_every = 0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.model.step = f64::NAN;
        assert!(config.validate().is_err());
    }
}
