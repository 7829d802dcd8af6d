//! Closed-loop driver: the agent acts, the arm moves, the arm is sensed.

use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::simulation::config::{DivergencePolicy, SimulationConfig};
use crate::simulation::environment::GenerativeProcess;
use crate::simulation::error::{NumericalDivergence, SimulationError};
use crate::simulation::inference::{BeliefState, GenerativeModel};
use crate::simulation::kinematics::hand_position;
use crate::simulation::observation::{Observation, SharedRng, shared_rng};

/// An arm drawn as a joint angle plus a hand position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ArmPose {
    pub angle: f64,
    pub hand: [f64; 2],
}

impl From<Observation> for ArmPose {
    fn from(obs: Observation) -> Self {
        Self {
            angle: obs.proprioceptive,
            hand: obs.visual,
        }
    }
}

/// Everything a renderer is handed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ArmView {
    pub tick: u64,
    /// True arm (noiseless)
    pub real: ArmPose,
    /// Last noisy observation
    pub sensed: ArmPose,
    /// Fictive observation sampled from the belief
    pub generated: ArmPose,
    /// Goal pose
    pub target: ArmPose,
    /// Believed angle `μ`
    pub belief: f64,
    pub goal: f64,
    pub action: f64,
}

/// Periodic observer of the simulation.
///
/// Called every `render_every` ticks and after the last one; the simulation
/// never waits on anything a renderer does.
pub trait Renderer {
    fn render(&mut self, view: &ArmView);

    /// Called once when a run ends.
    fn finish(&mut self) {}
}

impl<A: Renderer, B: Renderer> Renderer for (A, B) {
    fn render(&mut self, view: &ArmView) {
        self.0.render(view);
        self.1.render(view);
    }

    fn finish(&mut self) {
        self.0.finish();
        self.1.finish();
    }
}

/// Discards every view.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _view: &ArmView) {}
}

/// Emits each view as a tracing event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TraceRenderer;

impl Renderer for TraceRenderer {
    fn render(&mut self, view: &ArmView) {
        info!(
            tick = view.tick,
            real = view.real.angle,
            belief = view.belief,
            goal = view.goal,
            action = view.action,
            "arm"
        );
    }
}

/// State at the end of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub goal: f64,
    pub belief: BeliefState,
    pub true_angle: f64,
    /// Number of divergence resets
    pub resets: u32,
}

impl RunSummary {
    /// `|μ − ρ|`
    #[must_use]
    pub fn belief_error(&self) -> f64 {
        (self.belief.mu - self.goal).abs()
    }

    /// `|true angle − μ|`
    #[must_use]
    pub fn tracking_error(&self) -> f64 {
        (self.true_angle - self.belief.mu).abs()
    }
}

/// Owns the random stream, the arm and the agent of one run.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    rng: SharedRng,
    process: GenerativeProcess,
    model: GenerativeModel,
    observation: Observation,
    /// Fictive observation drawn by the agent on the last tick
    generated: Observation,
    tick: u64,
    resets: u32,
}

impl Simulation {
    /// Builds both sides on one stream and senses the initial arm.
    ///
    /// # Errors
    /// Invalid configuration.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let rng = shared_rng(config.seed);
        let mut process = GenerativeProcess::new(Rc::clone(&rng), &config.process, config.arm_length)?;
        let model = Self::build_model(&config, &rng)?;
        let observation = process.reset(config.initial_angle, config.initial_velocity);
        let generated = Self::prediction(&model, config.arm_length);

        debug!(seed = ?config.seed, goal = config.goal, "simulation ready");
        Ok(Self {
            config,
            rng,
            process,
            model,
            observation,
            generated,
            tick: 0,
            resets: 0,
        })
    }

    fn build_model(
        config: &SimulationConfig,
        rng: &SharedRng,
    ) -> Result<GenerativeModel, SimulationError> {
        Ok(GenerativeModel::new(
            Rc::clone(rng),
            &config.model,
            config.goal,
            config.model_initial_angle,
            config.arm_length,
        )?)
    }

    /// Noiseless observation the agent expects before it has drawn a sample.
    fn prediction(model: &GenerativeModel, arm_length: f64) -> Observation {
        let mu = model.belief().mu;
        Observation::new(mu, hand_position(mu, arm_length))
    }

    fn check_finite(&self) -> Result<(), NumericalDivergence> {
        let quantity = self.model.belief().non_finite().or_else(|| {
            if !self.process.is_finite() {
                Some("arm state")
            } else if !self.observation.is_finite() {
                Some("observation")
            } else {
                None
            }
        });
        match quantity {
            Some(quantity) => Err(NumericalDivergence {
                quantity,
                tick: self.tick,
            }),
            None => Ok(()),
        }
    }

    /// Agent sample and update, then arm step.
    ///
    /// The fictive sample is drawn every tick whether or not anything renders
    /// it; the random stream is independent of the render cadence.
    ///
    /// # Errors
    /// Divergence under [`DivergencePolicy::Abort`].
    pub fn tick(&mut self) -> Result<(), SimulationError> {
        self.generated = self.model.generate();
        let action = self.model.update(&self.observation);
        self.observation = self.process.step(action);
        self.tick += 1;

        if let Err(divergence) = self.check_finite() {
            match self.config.divergence {
                DivergencePolicy::Abort => return Err(divergence.into()),
                DivergencePolicy::Reset => {
                    warn!(%divergence, "resetting agent and arm");
                    self.model = Self::build_model(&self.config, &self.rng)?;
                    self.generated = Self::prediction(&self.model, self.config.arm_length);
                    self.observation = self
                        .process
                        .reset(self.config.initial_angle, self.config.initial_velocity);
                    self.resets += 1;
                }
            }
        }
        Ok(())
    }

    /// Runs `ticks` ticks, rendering at the configured cadence.
    ///
    /// # Errors
    /// See [`Simulation::tick`].
    pub fn advance<R: Renderer + ?Sized>(
        &mut self,
        ticks: u64,
        renderer: &mut R,
    ) -> Result<(), SimulationError> {
        for i in 0..ticks {
            self.tick()?;
            if self.tick % self.config.render_every == 0 || i + 1 == ticks {
                renderer.render(&self.view());
            }
        }
        Ok(())
    }

    /// Runs the remaining configured ticks.
    ///
    /// # Errors
    /// See [`Simulation::tick`].
    pub fn run<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
    ) -> Result<RunSummary, SimulationError> {
        let remaining = self.remaining();
        info!(ticks = remaining, "running");
        self.advance(remaining, renderer)?;
        renderer.finish();

        let summary = self.summary();
        info!(
            belief_error = summary.belief_error(),
            tracking_error = summary.tracking_error(),
            resets = summary.resets,
            "run finished"
        );
        Ok(summary)
    }

    /// Snapshot for renderers. Reads state only; never draws from the stream.
    #[must_use]
    pub fn view(&self) -> ArmView {
        let goal = self.model.goal();
        ArmView {
            tick: self.tick,
            real: self.process.expected_observation().into(),
            sensed: self.observation.into(),
            generated: self.generated.into(),
            target: ArmPose {
                angle: goal,
                hand: hand_position(goal, self.config.arm_length),
            },
            belief: self.model.belief().mu,
            goal,
            action: self.model.belief().action,
        }
    }

    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.tick,
            goal: self.model.goal(),
            belief: *self.model.belief(),
            true_angle: self.process.state().angle,
            resets: self.resets,
        }
    }

    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.config.ticks.saturating_sub(self.tick)
    }

    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub const fn process(&self) -> &GenerativeProcess {
        &self.process
    }

    #[must_use]
    pub const fn model(&self) -> &GenerativeModel {
        &self.model
    }

    #[must_use]
    pub const fn observation(&self) -> Observation {
        self.observation
    }
}
