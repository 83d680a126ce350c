//! # Tracking error calculations
//!
//! Transforms the world frame offset between the robot and its target into the robot body frame
//! and derives the error signals fed to the controllers.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Rotation2, Vector2};
use serde::Serialize;

// Internal
use crate::loc::Pose;
use comms_if::tc::track_ctrl::Waypoint;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Errors between the robot's pose and a waypoint.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct TrackErrors {
    /// Bearing to the target in the robot frame, in (-pi, pi]. Positive when
    /// the target is to the left.
    pub angular_error_rad: f64,

    /// Saturating measure of how far ahead the target is, in (-1, 1).
    pub linear_error: f64,

    /// Straight line distance to the target
    pub distance_m: f64,

    /// Distance to the target along the robot's forward axis
    pub forward_m: f64,

    /// Distance to the target along the robot's left axis
    pub lateral_m: f64,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Calculate the tracking errors from the pose to the waypoint.
///
/// The linear error is `tanh` of the forward distance rather than the
/// distance itself, so the linear controller's demand doesn't grow with the
/// distance to far away targets.
pub fn compute_errors(pose: &Pose, waypoint: &Waypoint) -> TrackErrors {
    let delta_m_world = Vector2::new(waypoint.x_m, waypoint.y_m) - pose.position_m;

    // Rotate from the world frame into the robot frame
    let delta_m_robot = Rotation2::new(-pose.yaw_rad) * delta_m_world;
    let forward_m = delta_m_robot[0];
    let lateral_m = delta_m_robot[1];

    TrackErrors {
        angular_error_rad: lateral_m.atan2(forward_m),
        linear_error: forward_m.tanh(),
        distance_m: delta_m_world.norm(),
        forward_m,
        lateral_m,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn test_target_ahead() {
        let errs = compute_errors(&Pose::new(0.0, 0.0, 0.0), &Waypoint::new(2.0, 0.0));

        assert!(errs.angular_error_rad.abs() < 1e-12);
        assert!((errs.distance_m - 2.0).abs() < 1e-12);
        assert!((errs.forward_m - 2.0).abs() < 1e-12);
        assert!((errs.linear_error - 2f64.tanh()).abs() < 1e-12);
    }

    #[test]
    fn test_target_behind() {
        let errs = compute_errors(&Pose::new(0.0, 0.0, 0.0), &Waypoint::new(-1.0, 0.0));

        assert!((errs.angular_error_rad.abs() - PI).abs() < 1e-9);
        assert!(errs.linear_error < 0.0);
        assert!((errs.distance_m - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotated_robot() {
        // Facing +Y with the target on +X, so the target is to the right
        let errs = compute_errors(&Pose::new(0.0, 0.0, FRAC_PI_2), &Waypoint::new(1.0, 0.0));
        assert!((errs.angular_error_rad + FRAC_PI_2).abs() < 1e-9);
        assert!(errs.forward_m.abs() < 1e-9);
        assert!((errs.lateral_m + 1.0).abs() < 1e-9);

        // Offset robot facing +Y with the target ahead and to the left
        let errs = compute_errors(&Pose::new(1.0, 1.0, FRAC_PI_2), &Waypoint::new(0.0, 2.0));
        assert!((errs.angular_error_rad - FRAC_PI_4).abs() < 1e-9);
        assert!((errs.distance_m - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_linear_error_saturates() {
        let errs = compute_errors(&Pose::new(0.0, 0.0, 0.0), &Waypoint::new(1000.0, 0.0));

        assert!(errs.linear_error <= 1.0);
        assert!(errs.linear_error > 0.999);
    }
}
