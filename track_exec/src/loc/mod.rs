//! # Localisation module
//!
//! This module converts odometry samples from the pose estimator into the
//! planar pose the tracking controller works with.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::odom::Odometry;
use nalgebra::{Quaternion, UnitQuaternion, Vector2};
use serde::{Deserialize, Serialize};
use util::maths::wrap_pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The current planar pose (position and heading in the world frame) of the
/// robot.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Pose {
    /// The position in the world frame
    pub position_m: Vector2<f64>,

    /// Heading of the robot, the angle to the positive world X axis, in the
    /// range (-pi, pi].
    pub yaw_rad: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LocError {
    #[error("Odometry orientation {0:?} is not a valid rotation")]
    InvalidOrientation([f64; 4]),

    #[error("Odometry position {0:?} is not finite")]
    InvalidPosition([f64; 3]),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    /// Create a new pose, wrapping the heading into (-pi, pi].
    pub fn new(x_m: f64, y_m: f64, yaw_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            yaw_rad: wrap_pi(yaw_rad),
        }
    }

    /// Build the planar pose from an odometry sample.
    ///
    /// The heading is the yaw (rotation about Z) of the sample's attitude.
    pub fn from_odometry(odom: &Odometry) -> Result<Self, LocError> {
        if odom.position_m.iter().any(|p| !p.is_finite()) {
            return Err(LocError::InvalidPosition(odom.position_m));
        }

        let [x, y, z, w] = odom.orientation_q;
        let q = Quaternion::new(w, x, y, z);

        // A zero or non-finite quaternion cannot be normalised
        let norm = q.norm();
        if !norm.is_finite() || norm < std::f64::EPSILON {
            return Err(LocError::InvalidOrientation(odom.orientation_q));
        }

        let attitude = UnitQuaternion::from_quaternion(q);

        Ok(Self::new(
            odom.position_m[0],
            odom.position_m[1],
            attitude.euler_angles().2,
        ))
    }

    pub fn x_m(&self) -> f64 {
        self.position_m[0]
    }

    pub fn y_m(&self) -> f64 {
        self.position_m[1]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn odom_with_yaw(yaw: f64) -> Odometry {
        let q = UnitQuaternion::from_euler_angles(0.0, 0.0, yaw);
        Odometry {
            position_m: [1.0, -2.0, 0.3],
            orientation_q: [q.i, q.j, q.k, q.w],
            linear_ms: 0.0,
            angular_rads: 0.0,
        }
    }

    #[test]
    fn test_from_odometry() {
        let pose = Pose::from_odometry(&odom_with_yaw(FRAC_PI_2)).unwrap();

        assert_eq!(pose.x_m(), 1.0);
        assert_eq!(pose.y_m(), -2.0);
        assert!((pose.yaw_rad - FRAC_PI_2).abs() < 1e-9);

        let pose = Pose::from_odometry(&odom_with_yaw(-3.0)).unwrap();
        assert!((pose.yaw_rad + 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_unnormalised_quaternion() {
        // Scaled identity rotation
        let odom = Odometry {
            position_m: [0.0; 3],
            orientation_q: [0.0, 0.0, 0.0, 2.0],
            linear_ms: 0.0,
            angular_rads: 0.0,
        };

        assert!(Pose::from_odometry(&odom).unwrap().yaw_rad.abs() < 1e-12);
    }

    #[test]
    fn test_invalid_odometry() {
        let mut odom = odom_with_yaw(0.0);
        odom.orientation_q = [0.0; 4];
        assert!(matches!(
            Pose::from_odometry(&odom),
            Err(LocError::InvalidOrientation(_))
        ));

        let mut odom = odom_with_yaw(0.0);
        odom.position_m[0] = std::f64::NAN;
        assert!(matches!(
            Pose::from_odometry(&odom),
            Err(LocError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_new_wraps_yaw() {
        assert!((Pose::new(0.0, 0.0, 2.5 * PI).yaw_rad - FRAC_PI_2).abs() < 1e-9);
        assert!((Pose::new(0.0, 0.0, -1.5 * PI).yaw_rad - FRAC_PI_2).abs() < 1e-9);
    }
}
