//! # Tracking control telecommands
//!
//! Waypoints produced by the planner and the runtime configuration of the tracking controller.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A target state for the robot to drive towards.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Waypoint {
    /// X coordinate of the target in the world frame.
    pub x_m: f64,

    /// Y coordinate of the target in the world frame.
    pub y_m: f64,

    /// Desired heading at the target.
    #[serde(default)]
    pub yaw_rad: f64,

    /// Feedforward forward speed supplied by the planner.
    #[serde(default)]
    pub ff_linear_ms: f64,

    /// Feedforward turn rate supplied by the planner.
    #[serde(default)]
    pub ff_angular_rads: f64,
}

/// Gains and limits of a single axis PID controller.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct PidConfig {
    /// Proportional gain
    pub k_p: f64,

    /// Integral gain
    pub k_i: f64,

    /// Derivative gain
    pub k_d: f64,

    /// Lower limit on the output
    pub min_output: f64,

    /// Upper limit on the output
    pub max_output: f64,

    /// Lower limit on the accumulated integral
    pub min_integral: f64,

    /// Upper limit on the accumulated integral
    pub max_integral: f64,

    /// Largest change in output allowed between two consecutive updates
    pub max_output_delta: f64,
}

/// Full configuration of the tracking controller.
///
/// This is applied as a whole, either at startup from the parameter file or at runtime through
/// the `CONFIG` telecommand.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackCtrlConfig {
    /// Controller acting on the bearing to the target, producing the turn rate demand.
    pub angular: PidConfig,

    /// Controller acting on the forward error, producing the speed demand.
    pub linear: PidConfig,

    /// Bearing error above which the robot turns on the spot rather than driving forwards.
    ///
    /// Units: radians
    pub angular_tolerance_rad: f64,

    /// Distance to the target under which it is considered reached.
    ///
    /// Units: meters
    pub arrival_radius_m: f64,

    /// Forward speed used while turning on the spot.
    ///
    /// Units: meters/second
    pub rotate_in_place_speed_ms: f64,

    /// If true the individual controller terms are logged on every update.
    #[serde(default)]
    pub verbose: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Waypoint {
    pub fn new(x_m: f64, y_m: f64) -> Self {
        Self {
            x_m,
            y_m,
            ..Default::default()
        }
    }
}

impl Default for TrackCtrlConfig {
    fn default() -> Self {
        Self {
            angular: PidConfig {
                k_p: 1.0,
                k_i: 0.0,
                k_d: 0.0,
                min_output: -1.0,
                max_output: 1.0,
                min_integral: 0.0,
                max_integral: 0.0,
                max_output_delta: 0.01,
            },
            linear: PidConfig {
                k_p: 1.0,
                k_i: 0.0,
                k_d: 0.0,
                min_output: -0.5,
                max_output: 0.5,
                min_integral: 0.0,
                max_integral: 0.0,
                max_output_delta: 0.05,
            },
            angular_tolerance_rad: 0.2,
            arrival_radius_m: 0.2,
            rotate_in_place_speed_ms: 0.2,
            verbose: false,
        }
    }
}
