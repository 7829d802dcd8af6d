//! Simulation hyperparameters.

use std::f64::consts::PI;

// === Arm ===
/// Length of the single link (scales the visual forward model)
pub const ARM_LENGTH: f64 = 1.0;
/// Goal angle the agent reaches for
pub const DEFAULT_GOAL: f64 = -0.35 * PI;

// === Proportional-derivative dynamics ===
pub const PD_GAIN: f64 = 1.0;
pub const PD_DAMPING: f64 = 2.0;
pub const PD_MASS: f64 = 1.0;
/// Internal step used by the self-integrating controller form
pub const PD_STEP: f64 = 0.01;

// === Integration ===
/// Step of the model's gradient descent (dt / decay)
pub const INTEGRATION_STEP: f64 = 0.008;
/// Step of the arm's physical dynamics
pub const DYNAMICS_STEP: f64 = 0.008;

// === Noise (standard deviations) ===
/// Sensor noise of the reference environment
pub const PROCESS_SIGMA: f64 = 0.2;
/// Noise the reference agent assumes
pub const MODEL_SIGMA: f64 = 0.1;
/// Sensor noise of the tracking preset
pub const TRACKING_PROCESS_SIGMA: f64 = 0.1;
/// Noise the tracking agent assumes (wider than the sensors, smooths `mu`)
pub const TRACKING_MODEL_SIGMA: f64 = 0.5;

// === Goal prior ===
/// Scale of the absolute goal target (`rho * fh` in the reference runs)
pub const REFERENCE_GOAL_GAIN: f64 = DYNAMICS_STEP;
/// Scale of the goal-relative target
pub const TRACKING_GOAL_GAIN: f64 = 0.05;

// === Run length ===
pub const REFERENCE_TICKS: u64 = 50_000;
pub const TRACKING_TICKS: u64 = 20_000;
/// Ticks between two renderer invocations
pub const RENDER_EVERY: u64 = 1_000;

// === Dashboard ===
/// Number of samples kept in the angle trace
pub const TRACE_WINDOW: usize = 2_048;
/// Half extent of the square world drawn on the canvas
pub const CANVAS_EXTENT: f64 = 1.5;
/// Distance (world units) under which a cell belongs to an arm segment
pub const SEGMENT_THICKNESS: f64 = 0.06;
/// Radius (world units) of the hand marker
pub const HAND_RADIUS: f64 = 0.1;
/// Simulation ticks advanced per dashboard frame
pub const TICKS_PER_FRAME: u64 = 40;
