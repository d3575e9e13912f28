//! Integration tests: configuration + engine + snapshot export
//!
//! These tests drive the full pipeline the binary uses, and verify the
//! integrator against closed-form solutions independent of frame timing.

use induction_engine::{PhysicalParams, RodSimulation, Scenario, SimulationConfig};

fn params() -> PhysicalParams {
    PhysicalParams {
        b: 1.0,
        ell: 1.0,
        r: 1.0,
        m: 1.0,
        u0: 0.0,
        f_ext: 5.0,
        a_set: 2.0,
        b_dir: 1.0,
    }
}

// =================================================================================================
// Integrator exactness
// =================================================================================================

#[test]
fn exact_ode_is_invariant_under_frame_granularity() {
    // Same 2 s of simulated time at three different frame rates must land on
    // identical (u, x) within floating tolerance, for every exact-ODE regime.
    for scenario in [
        Scenario::NoForce,
        Scenario::WithForce,
        Scenario::VerticalGravity,
    ] {
        let mut p = params();
        p.u0 = 3.0;

        let mut coarse = RodSimulation::new(p.clone(), scenario).unwrap();
        let mut medium = RodSimulation::new(p.clone(), scenario).unwrap();
        let mut fine = RodSimulation::new(p, scenario).unwrap();
        coarse.play();
        medium.play();
        fine.play();

        coarse.step(2.0);
        for _ in 0..8 {
            medium.step(0.25);
        }
        for _ in 0..200 {
            fine.step(0.01);
        }

        let tol = 1e-9;
        assert!(
            (coarse.state().u - fine.state().u).abs() < tol,
            "{:?}: coarse u {} vs fine u {}",
            scenario,
            coarse.state().u,
            fine.state().u
        );
        assert!((coarse.state().x - fine.state().x).abs() < tol);
        assert!((medium.state().u - fine.state().u).abs() < tol);
        assert!((medium.state().x - fine.state().x).abs() < tol);
    }
}

#[test]
fn with_force_follows_the_analytic_velocity_curve() {
    // B = ℓ = R = m = 1, F = 5 from rest: u(t) = 5(1 − e^−t), per-step decay e^−1.
    let mut sim = RodSimulation::new(params(), Scenario::WithForce).unwrap();
    sim.play();
    for step in 1..=10 {
        sim.step(1.0);
        let expected = 5.0 * (1.0 - (-(step as f64)).exp());
        assert!(
            (sim.state().u - expected).abs() < 1e-9,
            "step {}: u = {}, expected {}",
            step,
            sim.state().u,
            expected
        );
    }
}

#[test]
fn uniform_accel_matches_closed_form_kinematics_at_any_rate() {
    // x(t) = u0·t + ½·a·t² regardless of how t is sliced into frames.
    let mut p = params();
    p.u0 = 1.0;
    p.a_set = 2.0;
    let mut sim = RodSimulation::new(p, Scenario::UniformAccel).unwrap();
    sim.play();
    let dts = [0.013, 0.2, 0.007, 0.33, 0.05];
    let mut t = 0.0;
    for dt in dts {
        sim.step(dt);
        t += dt;
        let expected_x = 1.0 * t + 0.5 * 2.0 * t * t;
        assert!((sim.state().x - expected_x).abs() < 1e-12);
        assert!((sim.state().u - (1.0 + 2.0 * t)).abs() < 1e-12);
    }
}

#[test]
fn terminal_velocity_law_from_rest() {
    let mut p = params();
    p.b = 2.0;
    p.ell = 0.5;
    p.r = 0.5;
    p.m = 2.0;
    p.f_ext = 4.0;
    // k = B²ℓ²/R = 2, terminal = F/k = 2 m/s.
    let mut sim = RodSimulation::new(p, Scenario::WithForce).unwrap();
    assert_eq!(sim.snapshot().terminal_velocity, Some(2.0));
    sim.play();
    for _ in 0..400 {
        sim.step(0.033);
    }
    let s = sim.state();
    assert!((s.u - 2.0).abs() < 1e-3);
    assert!(s.f_net.abs() < 0.01);
    assert!(s.a.abs() < 0.01);
    assert!(sim.snapshot().at_terminal);
}

// =================================================================================================
// Terminal states
// =================================================================================================

#[test]
fn vertical_gravity_halts_at_the_long_track_end() {
    let mut p = params();
    p.b = 0.1; // weak braking so the rod actually reaches the end
    let mut sim = RodSimulation::new(p, Scenario::VerticalGravity).unwrap();
    assert_eq!(sim.snapshot().track_length, 180.0);
    sim.play();
    for _ in 0..20_000 {
        sim.frame(0.033);
        if !sim.is_playing() {
            break;
        }
    }
    assert!(!sim.is_playing());
    assert_eq!(sim.state().x, 180.0);
    assert_eq!(sim.state().u, 0.0);
    // Derived quantities were recomputed after the clamp: no residual drag.
    assert_eq!(sim.state().f_mag, 0.0);
}

#[test]
fn reversing_uniform_accel_clamps_at_the_near_end() {
    let mut p = params();
    p.u0 = 0.5;
    p.a_set = -3.0;
    let mut sim = RodSimulation::new(p, Scenario::UniformAccel).unwrap();
    sim.play();
    // The velocity floor stops reversal through zero, so the rod can halt on
    // the track without ever crossing x < 0.
    for _ in 0..200 {
        sim.step(0.033);
        assert!(sim.state().x >= 0.0);
    }
    assert_eq!(sim.state().u, 0.0);
}

// =================================================================================================
// Config → engine pipeline
// =================================================================================================

#[test]
fn config_drives_the_concrete_reference_scenario() {
    let toml_str = r#"
        scenario = "with-force"

        [physical]
        flux_density_t = 1.0
        rod_length_m = 1.0
        resistance_ohm = 1.0
        rod_mass_kg = 1.0
        external_force_n = 5.0

        [timing]
        frame_dt_s = 0.016
        total_time_s = 10.0
        record_interval_s = 1.0

        [output]
        base_filename = "rod"
    "#;
    let config: SimulationConfig = toml::from_str(toml_str).unwrap();
    config.validate().unwrap();

    let mut sim = RodSimulation::new(config.get_params(), config.scenario).unwrap();
    sim.play();
    sim.step(1.0);
    let expected = 5.0 * (1.0 - (-1.0f64).exp());
    assert!((sim.state().u - expected).abs() < 1e-12);
}

#[test]
fn snapshots_serialize_and_deserialize() {
    let mut sim = RodSimulation::new(params(), Scenario::WithForce).unwrap();
    sim.record_snapshot();
    sim.play();
    for _ in 0..5 {
        sim.frame(0.016);
    }
    sim.record_snapshot();

    let snapshots = sim.get_recorded_snapshots();
    assert_eq!(snapshots.len(), 2);

    let json = serde_json::to_string(snapshots).unwrap();
    let back: Vec<induction_engine::Snapshot> = serde_json::from_str(&json).unwrap();
    assert_eq!(back.len(), 2);
    assert_eq!(back[0].t, 0.0);
    assert!(back[1].t > 0.0);
    assert_eq!(back[1].scenario, "with-force");
    assert_eq!(back[1].terminal_velocity, Some(5.0));

    let bytes = rmp_serde::to_vec(snapshots).unwrap();
    let back: Vec<induction_engine::Snapshot> = rmp_serde::from_slice(&bytes).unwrap();
    assert_eq!(back.len(), 2);
}

#[test]
fn paused_engine_never_advances_time() {
    let mut sim = RodSimulation::new(params(), Scenario::WithForce).unwrap();
    for _ in 0..100 {
        sim.frame(0.016);
    }
    assert_eq!(sim.state().t, 0.0);
    assert_eq!(sim.state().x, 0.0);
}
