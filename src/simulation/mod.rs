pub mod batch;
pub mod config;
pub mod driver;
pub mod dynamics;
pub mod environment;
pub mod error;
pub mod inference;
pub mod kinematics;
pub mod observation;
pub mod params;

pub use config::{DivergencePolicy, Preset, SimulationConfig};
pub use driver::{ArmPose, ArmView, Renderer, RunSummary, Simulation};
pub use error::{ConfigurationError, NumericalDivergence, SimulationError};
pub use observation::{LatentState, Observation, SharedRng, shared_rng};
