use serde::{Deserialize, Serialize};

/// Mutable simulation state, owned exclusively by the engine. Integrated
/// quantities (t, x, u) advance only inside `step`; the derived quantities are
/// recomputed every frame so the two are never observably out of sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RodState {
    /// Elapsed simulation time (s).
    pub t: f64,
    /// Rod position along the track (m), clamped to [0, track_length].
    pub x: f64,
    /// Rod velocity (m/s), sign-carrying.
    pub u: f64,
    /// Acceleration (m/s²), derived.
    pub a: f64,
    /// Induced EMF ε = B·ℓ·|u| (V), derived, non-negative.
    pub emf: f64,
    /// Induced current I = ε/R (A), derived, non-negative.
    pub current: f64,
    /// Magnetic braking force magnitude k·|u| (N), derived, non-negative.
    pub f_mag: f64,
    /// Net force (N), derived, signed.
    pub f_net: f64,
    /// Externally-acting force implied by the current dynamics (N), a
    /// diagnostic back-solved quantity with no feedback into the integration.
    pub f_ext_dynamic: f64,
    /// |Fnet| captured at play-start, a reference for vector-diagram scaling.
    pub f_net0_abs: f64,
    /// Whether steps currently advance time.
    pub playing: bool,
    /// Multiplier applied to each externally supplied dt (1.0, or the
    /// slow-motion factor).
    pub time_scale: f64,
}

impl RodState {
    /// Fresh paused state at the track origin with the given initial velocity.
    /// Derived fields start at zero; the engine recomputes them immediately.
    pub fn new(initial_velocity: f64, time_scale: f64) -> Self {
        Self {
            t: 0.0,
            x: 0.0,
            u: initial_velocity,
            a: 0.0,
            emf: 0.0,
            current: 0.0,
            f_mag: 0.0,
            f_net: 0.0,
            f_ext_dynamic: 0.0,
            f_net0_abs: 0.0,
            playing: false,
            time_scale,
        }
    }
}
