pub mod canvas;
pub mod recorder;
pub mod render;
pub mod trace;

use crate::simulation::driver::{ArmView, Renderer};
use crate::simulation::params::TRACE_WINDOW;
use trace::{AngleTrace, TraceSample};

/// Renderer state of the terminal dashboard: the latest view and the
/// history of true and believed angle.
#[derive(Debug, Clone)]
pub struct Dashboard {
    latest: Option<ArmView>,
    trace: AngleTrace<TRACE_WINDOW>,
    arm_length: f64,
}

impl Dashboard {
    #[must_use]
    pub fn new(arm_length: f64) -> Self {
        Self {
            latest: None,
            trace: AngleTrace::new(),
            arm_length,
        }
    }

    #[must_use]
    pub const fn latest(&self) -> Option<&ArmView> {
        self.latest.as_ref()
    }

    #[must_use]
    pub const fn trace(&self) -> &AngleTrace<TRACE_WINDOW> {
        &self.trace
    }

    #[must_use]
    pub const fn arm_length(&self) -> f64 {
        self.arm_length
    }

    /// One-line status for the top of the screen.
    #[must_use]
    pub fn hud(&self) -> String {
        match &self.latest {
            Some(view) => format!(
                "Tick: {} | Real: {:.3} | Belief: {:.3} | Goal: {:.3} | Err: {:.3} | Act: {:.3} | q quits",
                view.tick,
                view.real.angle,
                view.belief,
                view.goal,
                view.belief - view.goal,
                view.action
            ),
            None => "Waiting for the first tick | q quits".to_string(),
        }
    }
}

impl Renderer for Dashboard {
    fn render(&mut self, view: &ArmView) {
        self.trace.push(TraceSample {
            tick: view.tick,
            real: view.real.angle,
            belief: view.belief,
        });
        self.latest = Some(*view);
    }
}
