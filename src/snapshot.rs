use serde::{Deserialize, Serialize};

/// A read-only view of the simulation at a specific time, consumed by
/// rendering/readout collaborators and by the recorded-data exporters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Scenario tag active when the snapshot was taken.
    pub scenario: String,
    /// Elapsed simulation time (s).
    pub t: f64,
    /// Rod position along the track (m).
    pub x: f64,
    /// Rod velocity (m/s).
    pub u: f64,
    /// Acceleration (m/s²).
    pub a: f64,
    /// Induced EMF (V).
    pub emf: f64,
    /// Induced current (A).
    pub current: f64,
    /// Magnetic braking force magnitude (N).
    pub f_mag: f64,
    /// Net force (N).
    pub f_net: f64,
    /// Back-solved external force (N).
    pub f_ext_dynamic: f64,
    /// Terminal velocity F/k when the regime defines one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal_velocity: Option<f64>,
    /// Display classification: both the terminal-force and terminal-accel
    /// epsilons are currently satisfied.
    pub at_terminal: bool,
    /// Lenz's-law circulation sense: +1 clockwise, -1 counter-clockwise, 0 none.
    pub current_sense: i8,
    /// Track length of the active scenario (m), for position scaling.
    pub track_length: f64,
    /// |Fnet| reference captured at play-start, for vector-diagram scaling.
    pub f_net0_abs: f64,
    /// Whether the engine was advancing time.
    pub playing: bool,
}
