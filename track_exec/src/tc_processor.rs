//! # Telecommand processor module
//!
//! The telecommand processor passes each TC to the tracking controller, at
//! the time it was scheduled for.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};

// Internal
use crate::{data_store::DataStore, loc::Pose};
use comms_if::tc::Tc;
use util::script_interpreter::Command;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a telecommand.
///
/// Mutates the datastore to pass the TC to the controller and collect its
/// outputs. Rejected TCs are logged and counted, they never stop execution.
pub fn exec(ds: &mut DataStore, cmd: &Command) {
    let time_s = cmd.exec_time_s;

    // Handle different Tcs
    match &cmd.tc {
        Tc::Odom(odom) => {
            let pose = match Pose::from_odometry(odom) {
                Ok(p) => p,
                Err(e) => {
                    warn!("Discarding odometry at {:.3} s: {}", time_s, e);
                    ds.num_rejected_tcs += 1;
                    return;
                }
            };

            let (out, rpt) = ds.track_ctrl.on_pose_update(&pose, &odom.twist(), time_s);

            if let Some(twist) = out {
                ds.emit_cmd(time_s, twist);
            }
            ds.track_ctrl_status_rpts.push(rpt);
        }
        Tc::Waypoints(wps) => {
            debug!("Recieved {} waypoints", wps.len());

            if let Err(e) = ds.track_ctrl.on_waypoints_received(wps.clone()) {
                warn!("Could not load waypoints: {}", e);
                ds.num_rejected_tcs += 1;
            }
        }
        Tc::Config(config) => {
            debug!("Recieved configuration update");

            if let Err(e) = ds.track_ctrl.on_config_update(*config) {
                warn!("Configuration update rejected, previous configuration kept: {}", e);
                ds.num_rejected_tcs += 1;
            }
        }
        Tc::Stop => {
            info!("Recieved Stop command");

            let twist = ds.track_ctrl.on_stop();
            ds.emit_cmd(time_s, twist);
            ds.stop_requested = true;
        }
    }
}
