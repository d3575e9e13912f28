pub mod config;
pub mod engine;
pub mod params;
pub mod scenario;
pub mod snapshot;
pub mod state;

// Re-export key types for easier use by dependent crates
pub use config::{OutputConfig, PhysicalConfig, SimulationConfig, TimingConfig};
pub use engine::{RodSimulation, MAX_FRAME_DT, SLOW_MOTION_SCALE};
pub use params::PhysicalParams;
pub use scenario::{current_sense, RestPolicy, Scenario};
pub use snapshot::Snapshot;
pub use state::RodState;
