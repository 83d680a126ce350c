//! # Odometry Equipment Communications Module

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single odometry sample produced by the pose estimator.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct Odometry {
    /// Position of the robot body in the world frame.
    ///
    /// Units: meters
    pub position_m: [f64; 3],

    /// Attitude of the robot body in the world frame as a quaternion, ordered `[x, y, z, w]`.
    pub orientation_q: [f64; 4],

    /// Current forward speed of the robot.
    ///
    /// Units: meters/second
    #[serde(default)]
    pub linear_ms: f64,

    /// Current turn rate of the robot about its Z+ (upwards) axis.
    ///
    /// Units: radians/second
    #[serde(default)]
    pub angular_rads: f64,
}

/// A velocity demand for a differential drive base, or a measured velocity of one.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Twist {
    /// The forward speed in meters/second.
    ///
    /// Positive speeds are "forwards", negative speeds are "backwards"
    pub linear_ms: f64,

    /// The turn rate in radians/second.
    ///
    /// Follows the right hand rule about the robot's Z+ (upwards) axis, so that a positive turn
    /// rate will rotate the robot to the left, and a negative turn rate to the right.
    pub angular_rads: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Twist {
    pub fn new(linear_ms: f64, angular_rads: f64) -> Self {
        Self {
            linear_ms,
            angular_rads,
        }
    }

    /// The stop command, zero speed and zero turn rate.
    pub fn stop() -> Self {
        Self::default()
    }

    pub fn is_stop(&self) -> bool {
        self.linear_ms == 0.0 && self.angular_rads == 0.0
    }
}

impl Odometry {
    /// The velocity part of the sample.
    pub fn twist(&self) -> Twist {
        Twist::new(self.linear_ms, self.angular_rads)
    }
}
