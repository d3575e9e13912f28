use anyhow::Result;
use log::{error, info, trace};
use std::fs::File;
use std::io::Write;
use std::time::Instant;

use induction_engine::{RodSimulation, SimulationConfig};

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    info!("Starting induction rod simulation...");

    // --- Load Configuration ---
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = SimulationConfig::load(&config_path)?;

    // --- Initialize Simulation ---
    let mut sim = RodSimulation::new(config.get_params(), config.scenario)?;
    sim.set_slow_motion(config.timing.slow_motion);
    info!(
        "Scenario '{}' on a {:.0} m track.",
        sim.scenario().tag(),
        sim.scenario().track_length()
    );

    let frame_dt = config.timing.frame_dt_s;
    let total_frames = (config.timing.total_time_s / frame_dt).ceil() as u64;
    let record_interval_frames = if config.timing.record_interval_s > 0.0 {
        ((config.timing.record_interval_s / frame_dt).round() as u64).max(1)
    } else {
        1
    };
    info!(
        "Driving {} frames at dt = {:.4} s, recording every {} frames.",
        total_frames, frame_dt, record_interval_frames
    );

    // --- Simulation Loop ---
    let start_time = Instant::now();

    // Initial snapshot (t = 0)
    sim.record_snapshot();
    sim.play();

    for frame in 0..total_frames {
        sim.frame(frame_dt);

        let is_record_frame = (frame + 1) % record_interval_frames == 0;
        let is_last_frame = frame == total_frames - 1;
        let halted = !sim.is_playing();
        if is_record_frame || is_last_frame || halted {
            let state = sim.state();
            info!(
                "Frame [{}/{}] | t = {:6.2} s | x = {:6.2} m | u = {:6.2} m/s | Fnet = {:6.2} N",
                frame + 1,
                total_frames,
                state.t,
                state.x,
                state.u,
                state.f_net
            );
            sim.record_snapshot();
        } else {
            trace!("Frame [{}/{}] completed.", frame + 1, total_frames);
        }

        if halted {
            let state = sim.state();
            info!(
                "Simulation halted at frame {} (t = {:.2} s, x = {:.2} m): {}.",
                frame + 1,
                state.t,
                state.x,
                if state.x >= sim.scenario().track_length() || state.x <= 0.0 {
                    "track limit reached"
                } else {
                    "rod decayed to rest"
                }
            );
            break;
        }
    }

    let total_duration = start_time.elapsed();
    info!(
        "Simulation finished in {:.3} seconds ({} snapshots recorded).",
        total_duration.as_secs_f64(),
        sim.get_recorded_snapshots().len()
    );

    // --- Save Recorded Data ---
    if config.output.save_snapshots {
        let output_format = config.output.format.as_deref().unwrap_or("json");
        let snapshots = sim.get_recorded_snapshots();

        match output_format {
            "json" => {
                let filename = format!("{}_snapshots.json", config.output.base_filename);
                match File::create(&filename) {
                    Ok(mut file) => match serde_json::to_string(snapshots) {
                        Ok(json_string) => {
                            if let Err(e) = file.write_all(json_string.as_bytes()) {
                                error!("Error writing snapshot JSON to file '{}': {}", filename, e);
                            } else {
                                info!("All snapshots saved to {}", filename);
                            }
                        }
                        Err(e) => error!("Error serializing snapshots to JSON: {}", e),
                    },
                    Err(e) => error!("Error creating snapshot file '{}': {}", filename, e),
                }
            }
            "bincode" => {
                let filename = format!("{}_snapshots.bin", config.output.base_filename);
                match File::create(&filename) {
                    Ok(file) => match bincode::serialize_into(file, snapshots) {
                        Ok(_) => info!("All snapshots saved to {} (binary format)", filename),
                        Err(e) => error!("Error serializing snapshots to bincode: {}", e),
                    },
                    Err(e) => error!("Error creating snapshot file '{}': {}", filename, e),
                }
            }
            "messagepack" => {
                let filename = format!("{}_snapshots.msgpack", config.output.base_filename);
                match &mut File::create(&filename) {
                    Ok(file) => match rmp_serde::encode::write(file, snapshots) {
                        Ok(_) => info!("All snapshots saved to {} (MessagePack format)", filename),
                        Err(e) => error!("Error serializing snapshots to MessagePack: {}", e),
                    },
                    Err(e) => error!("Error creating snapshot file '{}': {}", filename, e),
                }
            }
            _ => {
                error!("Unknown output format: {}. Using JSON instead.", output_format);
                let filename = format!("{}_snapshots.json", config.output.base_filename);
                match File::create(&filename) {
                    Ok(mut file) => match serde_json::to_string(snapshots) {
                        Ok(json_string) => {
                            if let Err(e) = file.write_all(json_string.as_bytes()) {
                                error!("Error writing snapshot JSON to file '{}': {}", filename, e);
                            } else {
                                info!("All snapshots saved to {}", filename);
                            }
                        }
                        Err(e) => error!("Error serializing snapshots to JSON: {}", e),
                    },
                    Err(e) => error!("Error creating snapshot file '{}': {}", filename, e),
                }
            }
        }
    } else {
        info!("Skipping snapshot dump as per config (save_snapshots is false).");
    }

    // Save the time series as CSV (separate from the full snapshot dump)
    if config.output.save_timeseries {
        let filename = format!("{}_timeseries.csv", config.output.base_filename);

        match csv::Writer::from_path(&filename) {
            Ok(mut writer) => {
                writer.write_record([
                    "t_s",
                    "x_m",
                    "u_m_per_s",
                    "a_m_per_s2",
                    "emf_v",
                    "current_a",
                    "f_mag_n",
                    "f_net_n",
                    "f_ext_dynamic_n",
                    "current_sense",
                ])?;
                for snap in sim.get_recorded_snapshots() {
                    writer.write_record(&[
                        format!("{:.4}", snap.t),
                        format!("{:.4}", snap.x),
                        format!("{:.4}", snap.u),
                        format!("{:.4}", snap.a),
                        format!("{:.4}", snap.emf),
                        format!("{:.4}", snap.current),
                        format!("{:.4}", snap.f_mag),
                        format!("{:.4}", snap.f_net),
                        format!("{:.4}", snap.f_ext_dynamic),
                        format!("{}", snap.current_sense),
                    ])?;
                }
                writer.flush()?;
                info!("Time series saved to {}", filename);
            }
            Err(e) => error!("Error saving CSV file '{}': {}", filename, e),
        }
    } else {
        info!("Skipping time series CSV as per config.");
    }

    info!("Simulation Complete.");
    Ok(())
}
