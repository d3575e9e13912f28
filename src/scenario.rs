use serde::{Deserialize, Serialize};

use crate::params::PhysicalParams;

/// Horizontal track length (m).
pub const TRACK_LENGTH: f64 = 60.0;
/// Track length for the vertical free-fall arrangement (m).
pub const VERTICAL_TRACK_LENGTH: f64 = 180.0;
/// Gravitational acceleration used by the vertical scenario (m/s²), a
/// deliberate classroom simplification.
pub const G: f64 = 10.0;
/// |Fnet| threshold below which the rod is classified as at terminal velocity (N).
pub const ZERO_FORCE_EPS: f64 = 0.01;
/// |a| threshold below which the rod is classified as at terminal velocity (m/s²).
pub const ZERO_ACCEL_EPS: f64 = 0.01;
/// |I| below this carries no displayable direction (A).
pub const CURRENT_SENSE_FLOOR: f64 = 1e-4;

/// Named driving-force regime, each with its own governing equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    /// Magnetic braking only; decelerates from u0 toward rest.
    NoForce,
    /// Constant external force against magnetic drag; approaches terminal velocity.
    WithForce,
    /// Commanded constant acceleration; the external force is back-solved.
    UniformAccel,
    /// Velocity pinned to u0; the engine reports the force needed to hold it.
    ConstantSpeed,
    /// Weight m·g drives the rod down a longer vertical track from rest.
    VerticalGravity,
}

/// How a scenario treats velocities that have decayed to (near) rest.
/// Every exact-ODE scenario snaps asymptotic creep to exactly zero; only the
/// drag-only regime additionally halts playback once the rod is effectively
/// stationary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestPolicy {
    /// |u| below this snaps to exactly 0 after a step (m/s).
    pub snap_eps: f64,
    /// |u| below this zeroes the velocity and auto-pauses, when set (m/s).
    pub halt_below: Option<f64>,
}

impl Scenario {
    /// Length of the track the rod may travel before the boundary clamp (m).
    pub fn track_length(self) -> f64 {
        match self {
            Scenario::VerticalGravity => VERTICAL_TRACK_LENGTH,
            _ => TRACK_LENGTH,
        }
    }

    /// Rod velocity applied by a reset.
    pub fn initial_velocity(self, params: &PhysicalParams) -> f64 {
        match self {
            Scenario::VerticalGravity => 0.0,
            _ => params.u0,
        }
    }

    /// Constant driving force F of the ODE `m·du/dt = F − k·u`. The kinematic
    /// scenarios (uniform-accel, constant-speed) invert the causality and
    /// never consult this.
    pub fn driving_force(self, params: &PhysicalParams) -> f64 {
        match self {
            Scenario::VerticalGravity => params.m * G,
            Scenario::WithForce => params.f_ext,
            _ => 0.0,
        }
    }

    /// Asymptotic velocity F/k, defined only for regimes with a constant
    /// positive driving force and nonzero damping.
    pub fn terminal_velocity(self, params: &PhysicalParams) -> Option<f64> {
        match self {
            Scenario::WithForce | Scenario::VerticalGravity => {
                let f = self.driving_force(params);
                let k = params.damping_coefficient();
                if f <= 0.0 || k <= 0.0 {
                    None
                } else {
                    Some(f / k)
                }
            }
            _ => None,
        }
    }

    pub fn rest_policy(self) -> RestPolicy {
        match self {
            Scenario::NoForce => RestPolicy {
                snap_eps: 0.0005,
                halt_below: Some(0.02),
            },
            _ => RestPolicy {
                snap_eps: 0.0005,
                halt_below: None,
            },
        }
    }

    /// Tag string matching the serde representation, for logs and exports.
    pub fn tag(self) -> &'static str {
        match self {
            Scenario::NoForce => "no-force",
            Scenario::WithForce => "with-force",
            Scenario::UniformAccel => "uniform-accel",
            Scenario::ConstantSpeed => "constant-speed",
            Scenario::VerticalGravity => "vertical-gravity",
        }
    }
}

/// Lenz's-law circulation sense of the induced current, for display:
/// +1 clockwise, -1 counter-clockwise, 0 when the rod is at rest or the
/// current is below the display floor.
pub fn current_sense(b_dir: f64, u: f64, current: f64) -> i8 {
    if u == 0.0 || current.abs() < CURRENT_SENSE_FLOOR {
        return 0;
    }
    let sign_u = if u > 0.0 { 1.0 } else { -1.0 };
    (-b_dir * sign_u) as i8
}
