//! Continuous active inference for the one-joint arm.
//!
//! # Mathematical Foundation
//!
//! Laplace-encoded free energy:
//! ```text
//! F = ½ εpᵀ Πp εp + ½ εvᵀ Πv εv + ½ (μ' − f0)ᵀ Πd (μ' − f0)
//! ```
//!
//! One explicit Euler step per observation:
//! ```text
//! μ' ← μ' + h·(f0 − μ')/σd²
//! a  ← a  − h·∂F/∂a
//! μ  ← μ  + μ' − h·∂F/∂μ
//! f  ← f  + h·PD(f, target)
//! ```

mod beliefs;
mod free_energy;
mod generative_model;
pub mod noise;

pub use beliefs::{BeliefGradient, BeliefState};
pub use free_energy::{
    ActionSensitivity, PredictionErrors, prediction_errors, variational_free_energy, vfe_gradient,
};
pub use generative_model::{GenerativeModel, GoalFrame};
pub use noise::NoiseModel;
