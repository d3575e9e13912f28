use anyhow::Result;
use log::{debug, info};

use crate::params::PhysicalParams;
use crate::scenario::{current_sense, Scenario, ZERO_ACCEL_EPS, ZERO_FORCE_EPS};
use crate::snapshot::Snapshot;
use crate::state::RodState;

/// Largest elapsed-time increment accepted per frame (s). A stalled or
/// backgrounded host may deliver one huge delta; anything above this would
/// overshoot the track and defeat the low-speed snap logic.
pub const MAX_FRAME_DT: f64 = 0.033;
/// Time-scale multiplier while slow motion is engaged.
pub const SLOW_MOTION_SCALE: f64 = 0.35;

/// Manages the state and execution of the sliding-rod induction simulation.
///
/// The engine owns the mutable [`RodState`] and the active [`Scenario`];
/// everything else reaches it through an externally driven [`frame`] call
/// carrying a wall-clock delta. It performs no scheduling of its own.
///
/// [`frame`]: RodSimulation::frame
pub struct RodSimulation {
    params: PhysicalParams,
    scenario: Scenario,
    state: RodState,
    /// Stores collected snapshots at record intervals.
    recorded_snapshots: Vec<Snapshot>,
}

impl RodSimulation {
    /// Creates a paused simulation in the given scenario with derived
    /// quantities already consistent with the initial velocity.
    pub fn new(params: PhysicalParams, scenario: Scenario) -> Result<Self> {
        params.validate()?;
        let state = RodState::new(scenario.initial_velocity(&params), 1.0);
        let mut sim = Self {
            params,
            scenario,
            state,
            recorded_snapshots: Vec::new(),
        };
        sim.recompute_derived();
        sim.state.f_net0_abs = sim.state.f_net.abs();
        Ok(sim)
    }

    /// Advances the simulation by one externally supplied frame. The raw
    /// elapsed time is clamped to [`MAX_FRAME_DT`] and scaled by the
    /// slow-motion factor before it reaches the integrator. While paused the
    /// derived quantities are still recomputed so parameter edits show up
    /// immediately.
    pub fn frame(&mut self, elapsed_s: f64) {
        let dt = elapsed_s.clamp(0.0, MAX_FRAME_DT) * self.state.time_scale;
        if self.state.playing {
            self.step(dt);
        } else {
            self.recompute_derived();
        }
    }

    /// Advances position and velocity over `dt` with the scenario's
    /// integration rule, applies rest snapping and the track-boundary clamp,
    /// and leaves the derived quantities consistent with the new velocity.
    pub fn step(&mut self, dt: f64) {
        match self.scenario {
            Scenario::UniformAccel => {
                let old_u = self.state.u;
                // Velocity is floor-clamped: this regime does not reverse
                // through zero.
                self.state.u = (old_u + self.params.a_set * dt).max(0.0);
                self.state.x += old_u * dt + 0.5 * self.params.a_set * dt * dt;
                self.state.t += dt;
            }
            Scenario::ConstantSpeed => {
                // Velocity is pinned, not integrated.
                self.state.u = self.params.u0;
                self.state.x += self.state.u * dt;
                self.state.t += dt;
            }
            Scenario::NoForce | Scenario::WithForce | Scenario::VerticalGravity => {
                self.step_exact_ode(dt);
            }
        }

        self.clamp_to_track();
        self.recompute_derived();
    }

    /// Closed-form step of `m·du/dt = F − k·u` with F, k constant over the
    /// interval. Exact for any dt, so frame-rate jitter cannot destabilize
    /// the solution. k = 0 degenerates to constant acceleration F/m and is
    /// handled without the time constant τ = m/k.
    fn step_exact_ode(&mut self, dt: f64) {
        let k = self.params.damping_coefficient();
        let f = self.scenario.driving_force(&self.params);
        let old_u = self.state.u;

        if k > 0.0 {
            let tau = self.params.m / k;
            let u_inf = f / k;
            let decay = (-dt / tau).exp();
            self.state.u = u_inf + (old_u - u_inf) * decay;
            self.state.x += u_inf * dt + (old_u - u_inf) * tau * (1.0 - decay);
        } else {
            // Undamped sub-case: B or ℓ is zero, plain constant acceleration.
            let a0 = f / self.params.m;
            self.state.u = old_u + a0 * dt;
            self.state.x += old_u * dt + 0.5 * a0 * dt * dt;
        }

        let policy = self.scenario.rest_policy();
        if self.state.u.abs() < policy.snap_eps {
            self.state.u = 0.0;
        }
        if let Some(halt_eps) = policy.halt_below {
            if self.state.u.abs() < halt_eps {
                self.state.u = 0.0;
                if self.state.playing {
                    debug!("Rod decayed to rest; pausing playback.");
                    self.state.playing = false;
                }
            }
        }

        self.state.t += dt;
    }

    /// Keeps the rod on the track. Reaching either end zeroes the offending
    /// velocity component and pauses playback; this is the simulation's sole
    /// terminal stop, not an error.
    fn clamp_to_track(&mut self) {
        let track_len = self.scenario.track_length();
        if self.state.x > track_len {
            self.state.x = track_len;
            if self.state.u > 0.0 {
                self.state.u = 0.0;
            }
            if self.state.playing {
                debug!("Rod reached the far track limit at x = {:.2} m.", track_len);
                self.state.playing = false;
            }
        } else if self.state.x < 0.0 {
            self.state.x = 0.0;
            if self.state.u < 0.0 {
                self.state.u = 0.0;
            }
            if self.state.playing {
                debug!("Rod reached the near track limit at x = 0.");
                self.state.playing = false;
            }
        }
    }

    /// Recomputes EMF, current and the force balance from the current
    /// velocity. Drag-dependent terms come first; the scenario branch second,
    /// because the kinematic regimes solve for force from imposed motion
    /// rather than the other way around.
    pub fn recompute_derived(&mut self) {
        let state = &mut self.state;
        state.emf = self.params.b * self.params.ell * state.u.abs();
        state.current = state.emf / self.params.r;
        state.f_mag = self.params.damping_coefficient() * state.u.abs();
        let sign_u = if state.u > 0.0 {
            1.0
        } else if state.u < 0.0 {
            -1.0
        } else {
            0.0
        };
        let magnetic_signed = -sign_u * state.f_mag;

        match self.scenario {
            Scenario::UniformAccel => {
                state.f_net = self.params.m * self.params.a_set;
                state.a = self.params.a_set;
                state.f_ext_dynamic = state.f_net - magnetic_signed;
            }
            Scenario::ConstantSpeed => {
                state.f_net = 0.0;
                state.a = 0.0;
                state.f_ext_dynamic = -magnetic_signed;
            }
            _ => {
                let f = self.scenario.driving_force(&self.params);
                state.f_net = f + magnetic_signed;
                state.a = state.f_net / self.params.m;
                state.f_ext_dynamic = if self.scenario == Scenario::WithForce {
                    f
                } else {
                    0.0
                };
            }
        }
    }

    /// Starts (or resumes) playback. Playing from t = 0 captures |Fnet| as
    /// the reference magnitude for vector-diagram scaling.
    pub fn play(&mut self) {
        if self.state.t == 0.0 {
            self.recompute_derived();
            self.state.f_net0_abs = self.state.f_net.abs();
        }
        self.state.playing = true;
    }

    pub fn pause(&mut self) {
        self.state.playing = false;
    }

    /// Returns to the paused initial state of the active scenario: t = 0,
    /// x = 0, velocity at the scenario default, derived quantities and the
    /// vector-scaling reference recomputed.
    pub fn reset(&mut self) {
        let time_scale = self.state.time_scale;
        self.state = RodState::new(self.scenario.initial_velocity(&self.params), time_scale);
        self.recompute_derived();
        self.state.f_net0_abs = self.state.f_net.abs();
        debug!(
            "Reset to scenario '{}' (u = {:.2} m/s).",
            self.scenario.tag(),
            self.state.u
        );
    }

    /// Switches the governing regime. Forces an implicit reset.
    pub fn set_scenario(&mut self, scenario: Scenario) {
        if scenario != self.scenario {
            info!(
                "Switching scenario '{}' -> '{}'.",
                self.scenario.tag(),
                scenario.tag()
            );
        }
        self.scenario = scenario;
        self.reset();
    }

    /// Replaces the physical parameters between frames. Rejected parameter
    /// sets leave the previous ones in place.
    pub fn set_params(&mut self, params: PhysicalParams) -> Result<()> {
        params.validate()?;
        let u0_changed = params.u0 != self.params.u0;
        self.params = params;
        // A paused edit of the reference speed re-applies the scenario default
        // so it is visible before the next play.
        if u0_changed && !self.state.playing {
            self.state.u = self.scenario.initial_velocity(&self.params);
        }
        self.recompute_derived();
        Ok(())
    }

    /// Engages or releases slow motion. Orthogonal to play/pause.
    pub fn set_slow_motion(&mut self, on: bool) {
        self.state.time_scale = if on { SLOW_MOTION_SCALE } else { 1.0 };
    }

    /// Display classification: the driven, damped rod currently satisfies
    /// both terminal-velocity epsilons. Integration continues regardless.
    pub fn has_reached_terminal(&self) -> bool {
        self.scenario.terminal_velocity(&self.params).is_some()
            && self.state.f_net.abs() <= ZERO_FORCE_EPS
            && self.state.a.abs() <= ZERO_ACCEL_EPS
    }

    /// Read-only view of the full simulation state for rendering and export.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            scenario: self.scenario.tag().to_string(),
            t: self.state.t,
            x: self.state.x,
            u: self.state.u,
            a: self.state.a,
            emf: self.state.emf,
            current: self.state.current,
            f_mag: self.state.f_mag,
            f_net: self.state.f_net,
            f_ext_dynamic: self.state.f_ext_dynamic,
            terminal_velocity: self.scenario.terminal_velocity(&self.params),
            at_terminal: self.has_reached_terminal(),
            current_sense: current_sense(self.params.b_dir, self.state.u, self.state.current),
            track_length: self.scenario.track_length(),
            f_net0_abs: self.state.f_net0_abs,
            playing: self.state.playing,
        }
    }

    /// Captures and stores a snapshot. Called at record intervals by the driver.
    pub fn record_snapshot(&mut self) {
        let snapshot = self.snapshot();
        debug!(
            "Recording snapshot at t = {:.2} s (x = {:.2} m, u = {:.2} m/s).",
            snapshot.t, snapshot.x, snapshot.u
        );
        self.recorded_snapshots.push(snapshot);
    }

    /// Provides access to the recorded snapshots.
    pub fn get_recorded_snapshots(&self) -> &Vec<Snapshot> {
        &self.recorded_snapshots
    }

    pub fn state(&self) -> &RodState {
        &self.state
    }

    pub fn params(&self) -> &PhysicalParams {
        &self.params
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing
    }
}
