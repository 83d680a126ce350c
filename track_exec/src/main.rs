//! Main tracking executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and the tracking controller
//!     - Main loop:
//!         - Telecommand processing, each TC executed at its scripted time:
//!             - Odometry, producing a velocity command
//!             - Waypoint lists
//!             - Configuration updates
//!             - Stop requests
//!         - Archiving of the cycle's commands and status reports
//!     - Stop the robot at the end of the script
//!
//! # Usage
//!
//! ```text
//! track_exec <script_path>
//! ```
//!
//! The `TRACK_SW_ROOT` environment variable must point at the root of the
//! software, which contains the `params` directory.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use track_lib::{
    data_store::DataStore,
    tc_processor,
    track_ctrl::TrackCtrl,
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    archive::Archiver,
    logger::{logger_init, LevelFilter},
    script_interpreter::{PendingTcs, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.05;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("track_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Waypoint Tracking Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD SCRIPT ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    let script_path = script_path_from_args(&args)?;

    info!("Loading script from \"{}\"", script_path);

    let mut si = ScriptInterpreter::new(script_path).wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} TCs\n",
        si.get_duration(),
        si.get_num_tcs()
    );

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let track_ctrl =
        TrackCtrl::init("track_ctrl.toml", 0.0).wrap_err("Failed to initialise TrackCtrl")?;
    info!("TrackCtrl init complete");

    let mut ds = DataStore::new(track_ctrl);

    let mut cmd_archiver = Archiver::from_path(&session, "track_ctrl_cmds.csv")
        .map_err(|e| eyre!("Failed to create the command archive: {}", e))?;
    let mut status_archiver = Archiver::from_path(&session, "track_ctrl_status.csv")
        .map_err(|e| eyre!("Failed to create the status report archive: {}", e))?;

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start();

        // ---- TELECOMMAND PROCESSING ----

        let end_of_script = match si.get_pending_tcs(ds.time_s) {
            PendingTcs::None => false,
            PendingTcs::Some(cmd_vec) => {
                for cmd in cmd_vec.iter() {
                    tc_processor::exec(&mut ds, cmd);

                    // Anything scheduled after a stop is dropped
                    if ds.stop_requested {
                        break;
                    }
                }
                false
            }
            PendingTcs::EndOfScript => {
                info!("End of TC script reached, stopping");

                let stop = ds.track_ctrl.on_stop();
                let time_s = ds.time_s;
                ds.emit_cmd(time_s, stop);
                true
            }
        };

        // ---- WRITE ARCHIVES ----

        for cmd in ds.cmds.iter() {
            if let Err(e) = cmd_archiver.serialise(cmd) {
                warn!("Could not archive command: {}", e);
            }
        }

        for rpt in ds.track_ctrl_status_rpts.iter() {
            if let Err(e) = status_archiver.serialise(rpt) {
                warn!("Could not archive TrackCtrl status report: {}", e);
            }
        }

        if end_of_script || ds.stop_requested {
            break;
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    info!(
        "End of execution after {} cycles, {} TCs rejected, {} stop commands sent",
        ds.num_cycles, ds.num_rejected_tcs, ds.num_stop_cmds
    );

    Ok(())
}

/// Get the script path from the command line arguments, which must contain
/// exactly one argument after the executable name.
fn script_path_from_args(args: &[String]) -> Result<&str, Report> {
    match args {
        [_, path] => Ok(path.as_str()),
        _ => Err(eyre!(
            "Expected one argument, the path to the script, found {}",
            args.len().saturating_sub(1)
        )),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(a: &[&str]) -> Vec<String> {
        a.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_script_path_from_args() {
        assert_eq!(
            script_path_from_args(&args(&["track_exec", "scripts/square.tcs"])).unwrap(),
            "scripts/square.tcs"
        );

        assert!(script_path_from_args(&args(&["track_exec"])).is_err());
        assert!(script_path_from_args(&args(&["track_exec", "a", "b"])).is_err());

        // Some platforms allow an empty argv
        let err = script_path_from_args(&[]).unwrap_err();
        assert!(format!("{}", err).ends_with("found 0"));
    }
}
