//! Tracking control module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use serde::Serialize;

// Internal
use super::*;
use crate::loc::Pose;
use comms_if::{eqpt::odom::Twist, tc::track_ctrl::Waypoint};
use util::params as param_loader;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The tracking controller.
///
/// Driven by the executable's telecommand processor, which guarantees that
/// pose updates, waypoint lists and configuration changes are never handled
/// concurrently.
pub struct TrackCtrl {
    params: Params,

    /// Executing mode
    mode: TrackCtrlMode,

    /// The waypoints to visit
    queue: WaypointQueue,

    /// Controller on the bearing to the target, producing the turn rate
    angular_ctrl: PidController,

    /// Controller on the forward error, producing the speed
    linear_ctrl: PidController,
}

/// The status report containing the errors, controller terms and events of a
/// single pose update.
///
/// This is kept flat so it can be archived directly as a CSV row.
#[derive(Debug, Default, Copy, Clone, Serialize)]
pub struct StatusReport {
    /// Time of the update
    pub time_s: f64,

    /// Mode at the end of the update
    pub mode: TrackCtrlMode,

    /// Measured velocity of the robot
    pub meas_linear_ms: f64,
    pub meas_angular_rads: f64,

    /// Position of the target the errors were calculated against
    pub target_x_m: f64,
    pub target_y_m: f64,

    pub angular_error_rad: f64,
    pub linear_error: f64,
    pub distance_m: f64,

    pub ang_p: f64,
    pub ang_i: f64,
    pub ang_d: f64,
    pub ang_output: f64,

    pub lin_p: f64,
    pub lin_i: f64,
    pub lin_d: f64,
    pub lin_output: f64,

    /// Either controller saw a non-positive time step
    pub dt_non_positive: bool,

    /// The bearing error was too large so the speed was overriden
    pub heading_override: bool,

    /// The target was reached on this update
    pub waypoint_reached: bool,

    /// The last waypoint was reached on this update
    pub queue_exhausted: bool,

    /// Waypoints left after the current one
    pub num_remaining: usize,

    /// The emitted command, zero if none was emitted
    pub cmd_linear_ms: f64,
    pub cmd_angular_rads: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that can occur during processing of the module.
#[derive(Debug, thiserror::Error)]
pub enum TrackCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(param_loader::LoadError),

    /// The parameters were rejected, the previous ones remain in use.
    #[error("Invalid parameters: {0}")]
    InvalidParams(ParamsError),

    /// Attempted to load a waypoint list with nothing in it.
    #[error("Attempted to load an empty waypoint list")]
    EmptyWaypointList,
}

/// The possible modes of execution of TrackCtrl. Each mode is handled by a
/// `mode_xyz` function.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum TrackCtrlMode {
    /// No valid waypoint, no commands are produced
    AwaitingWaypoint,

    /// Driving towards the current waypoint
    Tracking,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for TrackCtrlMode {
    fn default() -> Self {
        TrackCtrlMode::AwaitingWaypoint
    }
}

impl TrackCtrl {
    /// Initialise the TrackCtrl module from a parameter file, relative to the
    /// software's params directory.
    pub fn init(params_path: &str, time_s: f64) -> Result<Self, TrackCtrlError> {
        let params = param_loader::load(params_path).map_err(TrackCtrlError::ParamLoadError)?;

        Self::new(params, time_s)
    }

    /// Create the controller with the given parameters, with both PID
    /// controllers starting from `time_s`.
    pub fn new(params: Params, time_s: f64) -> Result<Self, TrackCtrlError> {
        validate(&params).map_err(TrackCtrlError::InvalidParams)?;

        Ok(Self {
            mode: TrackCtrlMode::AwaitingWaypoint,
            queue: WaypointQueue::new(),
            angular_ctrl: PidController::new("Angular", params.angular, time_s),
            linear_ctrl: PidController::new("Linear", params.linear, time_s),
            params,
        })
    }

    /// Process a new pose of the robot.
    ///
    /// Returns the velocity command to send to the drive base, or `None` while
    /// awaiting waypoints. The stop command sent when the last waypoint is
    /// reached is expected to hold the robot until new waypoints arrive.
    pub fn on_pose_update(
        &mut self,
        pose: &Pose,
        twist: &Twist,
        time_s: f64,
    ) -> (Option<Twist>, StatusReport) {
        let mut report = StatusReport {
            time_s,
            meas_linear_ms: twist.linear_ms,
            meas_angular_rads: twist.angular_rads,
            ..Default::default()
        };

        let cmd = match self.mode {
            TrackCtrlMode::AwaitingWaypoint => self.mode_awaiting(),
            TrackCtrlMode::Tracking => self.mode_tracking(pose, time_s, &mut report),
        };

        report.mode = self.mode;
        report.num_remaining = self.queue.num_remaining();
        if let Some(c) = cmd {
            report.cmd_linear_ms = c.linear_ms;
            report.cmd_angular_rads = c.angular_rads;
        }

        (cmd, report)
    }

    /// Replace the waypoints being followed and start tracking the first one.
    ///
    /// The controllers are not reset, so the output slew limits smooth the
    /// switch to the new target.
    pub fn on_waypoints_received(&mut self, waypoints: Vec<Waypoint>) -> Result<(), TrackCtrlError> {
        let num_waypoints = waypoints.len();

        self.queue
            .push_all(waypoints)
            .map_err(|_| TrackCtrlError::EmptyWaypointList)?;

        info!("Received {} waypoints", num_waypoints);
        self.mode = TrackCtrlMode::Tracking;

        Ok(())
    }

    /// Apply a new configuration, which takes effect from the next pose
    /// update.
    ///
    /// Either the whole configuration is applied or, if it is invalid, none of
    /// it is.
    pub fn on_config_update(&mut self, params: Params) -> Result<(), TrackCtrlError> {
        validate(&params).map_err(TrackCtrlError::InvalidParams)?;

        self.angular_ctrl.set_config(params.angular);
        self.linear_ctrl.set_config(params.linear);
        self.params = params;

        info!("Configuration updated");
        debug!("New configuration: {:?}", self.params);

        Ok(())
    }

    /// Get the command to send when stopping, regardless of mode.
    pub fn on_stop(&mut self) -> Twist {
        info!("Stop requested in {:?} mode", self.mode);
        Twist::stop()
    }

    pub fn mode(&self) -> TrackCtrlMode {
        self.mode
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn queue(&self) -> &WaypointQueue {
        &self.queue
    }

    pub fn angular_ctrl(&self) -> &PidController {
        &self.angular_ctrl
    }

    pub fn linear_ctrl(&self) -> &PidController {
        &self.linear_ctrl
    }

    /// Mode awaiting waypoint.
    ///
    /// No actions are taken in this mode. To move to `Tracking` a waypoint
    /// list must be received.
    fn mode_awaiting(&mut self) -> Option<Twist> {
        None
    }

    /// Mode tracking.
    ///
    /// Drive towards the current waypoint, moving on to the next when it has
    /// been reached.
    fn mode_tracking(
        &mut self,
        pose: &Pose,
        time_s: f64,
        report: &mut StatusReport,
    ) -> Option<Twist> {
        // Validate the target, stopping if there somehow isn't one
        let target = match (self.queue.is_awaiting(), self.queue.current()) {
            (false, Some(wp)) => *wp,
            _ => {
                warn!("Tracking without a valid waypoint, stopping");
                self.mode = TrackCtrlMode::AwaitingWaypoint;
                return Some(Twist::stop());
            }
        };
        report.target_x_m = target.x_m;
        report.target_y_m = target.y_m;

        // ---- COMMAND GENERATION ----

        let errs = compute_errors(pose, &target);
        report.angular_error_rad = errs.angular_error_rad;
        report.linear_error = errs.linear_error;
        report.distance_m = errs.distance_m;

        let ang = self.angular_ctrl.update_terms(errs.angular_error_rad, time_s);
        let lin = self.linear_ctrl.update_terms(errs.linear_error, time_s);

        report.ang_p = ang.proportional;
        report.ang_i = ang.integral;
        report.ang_d = ang.derivative;
        report.ang_output = ang.output;
        report.lin_p = lin.proportional;
        report.lin_i = lin.integral;
        report.lin_d = lin.derivative;
        report.lin_output = lin.output;
        report.dt_non_positive = ang.dt_non_positive || lin.dt_non_positive;

        if self.params.verbose {
            debug!("{}", format_terms("Angular", &ang));
            debug!("{}", format_terms("Linear", &lin));
        }

        let mut cmd = Twist::new(lin.output, ang.output);

        // Turn towards the target before making progress towards it
        if errs.angular_error_rad.abs() > self.params.angular_tolerance_rad {
            cmd.linear_ms = self.params.rotate_in_place_speed_ms;
            report.heading_override = true;
        }

        debug!(
            "Pose ({:.2}, {:.2}), distance: {:.2} m, command: {:.3} m/s, {:.3} rad/s",
            pose.x_m(),
            pose.y_m(),
            errs.distance_m,
            cmd.linear_ms,
            cmd.angular_rads
        );

        // ---- TARGET MANAGEMENT ----

        if errs.distance_m < self.params.arrival_radius_m {
            report.waypoint_reached = true;

            match self.queue.advance().map(|wp| *wp) {
                Ok(next) => info!(
                    "Waypoint {} reached, moving to ({:.2}, {:.2})",
                    self.queue.num_consumed(),
                    next.x_m,
                    next.y_m
                ),
                Err(QueueError::Exhausted) | Err(QueueError::EmptyList) => {
                    info!("Final waypoint reached, stopping and awaiting new waypoints");

                    // The robot is stopped, so restart both controllers from a
                    // zero output to match.
                    self.angular_ctrl.reset(time_s);
                    self.linear_ctrl.reset(time_s);

                    self.mode = TrackCtrlMode::AwaitingWaypoint;
                    report.queue_exhausted = true;
                    cmd = Twist::stop();
                }
            }
        }

        Some(cmd)
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Format the terms of one controller update as a single aligned log line.
fn format_terms(name: &str, terms: &PidTerms) -> String {
    format!(
        "{:<7} error {:+.2} | P {:+.2} | I {:+.2} | D {:+.2} | output {:+.2}",
        name, terms.error, terms.proportional, terms.integral, terms.derivative, terms.output
    )
}
