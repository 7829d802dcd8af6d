use crate::simulation::config::ProcessConfig;
use crate::simulation::dynamics::{PhaseState, ProportionalDerivative};
use crate::simulation::error::ConfigurationError;
use crate::simulation::kinematics::hand_position;
use crate::simulation::observation::{LatentState, Observation, SharedRng, standard_normals};

/// Standard deviations of the arm's sensors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorNoise {
    pub proprioceptive: f64,
    pub visual: f64,
}

impl SensorNoise {
    /// Same noise on every channel. Zero is allowed and gives exact readings.
    ///
    /// # Errors
    /// [`ConfigurationError::NegativeSigma`] for negative or non-finite `sigma`.
    pub fn isotropic(sigma: f64) -> Result<Self, ConfigurationError> {
        if sigma.is_finite() && sigma >= 0.0 {
            Ok(Self {
                proprioceptive: sigma,
                visual: sigma,
            })
        } else {
            Err(ConfigurationError::NegativeSigma(sigma))
        }
    }
}

/// The simulated one-joint arm (the generative process).
///
/// Velocity-controlled through a proportional-derivative system: the action
/// is the target the joint is pulled towards. Every step yields a noisy
/// proprioceptive reading of the angle and a noisy visual reading of the hand.
#[derive(Debug)]
pub struct GenerativeProcess {
    state: LatentState,
    noise: SensorNoise,
    arm_length: f64,
    step: f64,
    dynamics: ProportionalDerivative,
    rng: SharedRng,
    expected: Observation,
}

impl GenerativeProcess {
    /// Creates the arm at rest at angle zero.
    ///
    /// # Errors
    /// Negative sensor sigma.
    pub fn new(
        rng: SharedRng,
        config: &ProcessConfig,
        arm_length: f64,
    ) -> Result<Self, ConfigurationError> {
        let state = LatentState::default();
        Ok(Self {
            state,
            noise: SensorNoise::isotropic(config.sigma)?,
            arm_length,
            step: config.step,
            dynamics: config.dynamics,
            rng,
            expected: Self::expected_for(state, arm_length),
        })
    }

    fn expected_for(state: LatentState, arm_length: f64) -> Observation {
        Observation::new(state.angle, hand_position(state.angle, arm_length))
    }

    /// Noiseless reading plus independent Gaussian noise on each channel.
    fn sense(&mut self) -> Observation {
        self.expected = Self::expected_for(self.state, self.arm_length);
        let [zp, zx, zy] = standard_normals::<3>(&self.rng);
        Observation::new(
            self.expected.proprioceptive + zp * self.noise.proprioceptive,
            [
                self.expected.visual[0] + zx * self.noise.visual,
                self.expected.visual[1] + zy * self.noise.visual,
            ],
        )
    }

    /// Moves the arm to `(angle, angular_velocity)` and senses it.
    pub fn reset(&mut self, angle: f64, angular_velocity: f64) -> Observation {
        self.state = LatentState::new(angle, angular_velocity);
        self.sense()
    }

    /// Integrates the arm one step under `action` and senses it.
    pub fn step(&mut self, action: f64) -> Observation {
        let current = PhaseState::from(self.state);
        let rate = self.dynamics.derivative(current, action);
        self.state = current.integrate(rate, self.step).into();
        self.sense()
    }

    /// Sets both sensor standard deviations.
    ///
    /// # Errors
    /// Negative or non-finite `sigma`; the previous noise is kept.
    pub fn set_sigma(&mut self, sigma: f64) -> Result<(), ConfigurationError> {
        self.noise = SensorNoise::isotropic(sigma)?;
        Ok(())
    }

    #[must_use]
    pub const fn state(&self) -> LatentState {
        self.state
    }

    #[must_use]
    pub const fn noise(&self) -> SensorNoise {
        self.noise
    }

    /// Noiseless reading of the current state (the true arm pose).
    #[must_use]
    pub const fn expected_observation(&self) -> Observation {
        self.expected
    }

    #[must_use]
    pub const fn arm_length(&self) -> f64 {
        self.arm_length
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.state.is_finite()
    }
}
