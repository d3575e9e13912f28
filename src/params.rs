use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Physical parameters of the rod-on-rails circuit, read by the engine on
/// every step. Collaborators may replace them between frames via
/// [`crate::engine::RodSimulation::set_params`]; they take effect on the next
/// frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalParams {
    /// Magnetic flux density B (T).
    pub b: f64,
    /// Rod length between the rails (m).
    pub ell: f64,
    /// Circuit resistance (Ω). Must stay positive (divided by every step).
    pub r: f64,
    /// Rod mass (kg). Must stay positive (divided by every step).
    pub m: f64,
    /// Initial / reference speed u0 (m/s).
    pub u0: f64,
    /// External force magnitude (N), only read in the with-force scenario.
    pub f_ext: f64,
    /// Commanded acceleration (m/s²), only read in the uniform-accel scenario.
    pub a_set: f64,
    /// Field polarity sign, +1.0 or -1.0.
    pub b_dir: f64,
}

impl PhysicalParams {
    /// Linear drag coefficient k = B²ℓ²/R (N·s/m) of the governing ODE
    /// `m·du/dt = F − k·u`. Zero when B or ℓ is zero, which is a valid
    /// configuration, not an error.
    pub fn damping_coefficient(&self) -> f64 {
        (self.b * self.b * self.ell * self.ell) / self.r
    }

    /// Rejects configurations that would divide by zero inside the engine or
    /// carry a malformed polarity sign. R=0 and m=0 are disallowed here rather
    /// than guarded per-step.
    pub fn validate(&self) -> Result<()> {
        if self.r <= 0.0 {
            anyhow::bail!("circuit resistance must be positive, got {}", self.r);
        }
        if self.m <= 0.0 {
            anyhow::bail!("rod mass must be positive, got {}", self.m);
        }
        if self.b < 0.0 {
            anyhow::bail!("flux density must be non-negative, got {}", self.b);
        }
        if self.ell < 0.0 {
            anyhow::bail!("rod length must be non-negative, got {}", self.ell);
        }
        if self.b_dir != 1.0 && self.b_dir != -1.0 {
            anyhow::bail!("field polarity must be +1 or -1, got {}", self.b_dir);
        }
        Ok(())
    }
}
