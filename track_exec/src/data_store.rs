//! # Data Store

use log::debug;
use serde::Serialize;

use comms_if::eqpt::odom::Twist;

use crate::track_ctrl::{StatusReport, TrackCtrl};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// Time since the start of the session
    pub time_s: f64,

    // TrackCtrl
    pub track_ctrl: TrackCtrl,

    /// Commands emitted during this cycle, in the order they were produced
    pub cmds: Vec<CmdRecord>,

    /// Status reports produced during this cycle
    pub track_ctrl_status_rpts: Vec<StatusReport>,

    /// Set once a stop has been requested, ending execution
    pub stop_requested: bool,

    /// Number of stop commands emitted over the whole execution
    pub num_stop_cmds: u64,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    /// Number of TCs which could not be executed
    pub num_rejected_tcs: u64,
}

/// A velocity command sent to the drive base, as archived.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct CmdRecord {
    pub time_s: f64,
    pub linear_ms: f64,
    pub angular_rads: f64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    pub fn new(track_ctrl: TrackCtrl) -> Self {
        Self {
            num_cycles: 0,
            time_s: 0f64,
            track_ctrl,
            cmds: Vec::new(),
            track_ctrl_status_rpts: Vec::new(),
            stop_requested: false,
            num_stop_cmds: 0,
            num_consec_cycle_overruns: 0,
            num_rejected_tcs: 0,
        }
    }

    /// Perform actions required at the start of a cycle.
    ///
    /// Clears the outputs of the previous cycle and updates the current time.
    /// The previous outputs must have been archived before this is called.
    pub fn cycle_start(&mut self) {
        self.cmds.clear();
        self.track_ctrl_status_rpts.clear();

        self.time_s = util::session::get_elapsed_seconds();
    }

    /// Record a command to be sent to the drive base.
    pub fn emit_cmd(&mut self, time_s: f64, cmd: Twist) {
        if cmd.is_stop() {
            self.num_stop_cmds += 1;
            debug!("Stop command at {:.3} s", time_s);
        } else {
            debug!(
                "Command at {:.3} s: {:.3} m/s, {:.3} rad/s",
                time_s, cmd.linear_ms, cmd.angular_rads
            );
        }

        self.cmds.push(CmdRecord {
            time_s,
            linear_ms: cmd.linear_ms,
            angular_rads: cmd.angular_rads,
        });
    }

    /// The most recently emitted command this cycle, if any.
    pub fn last_cmd(&self) -> Option<&CmdRecord> {
        self.cmds.last()
    }
}
