//! Tracking control parameters
//!
//! The parameter structures themselves are defined in `comms_if` so that the
//! same types can be loaded from the parameter file at startup and received
//! in a `CONFIG` telecommand at runtime. This module adds the validation which
//! is run before any set of parameters is applied.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use thiserror::Error;

// Internal
pub use comms_if::tc::track_ctrl::{PidConfig, TrackCtrlConfig as Params};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A reason a set of parameters was rejected.
#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("{axis} {name} limits are inverted (min {min} > max {max})")]
    InvertedLimits {
        axis: &'static str,
        name: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{0} must not be negative, found {1}")]
    Negative(&'static str, f64),

    #[error("{0} must be finite, found {1}")]
    NotFinite(&'static str, f64),
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Check that the parameters can be safely applied to the controller.
pub fn validate(params: &Params) -> Result<(), ParamsError> {
    validate_pid("angular", &params.angular)?;
    validate_pid("linear", &params.linear)?;

    check_non_negative("angular_tolerance_rad", params.angular_tolerance_rad)?;
    check_non_negative("arrival_radius_m", params.arrival_radius_m)?;
    check_finite("rotate_in_place_speed_ms", params.rotate_in_place_speed_ms)?;

    Ok(())
}

/// Check the gains and limits of a single axis.
pub fn validate_pid(axis: &'static str, pid: &PidConfig) -> Result<(), ParamsError> {
    check_finite("k_p", pid.k_p)?;
    check_finite("k_i", pid.k_i)?;
    check_finite("k_d", pid.k_d)?;

    check_limits(axis, "output", pid.min_output, pid.max_output)?;
    check_limits(axis, "integral", pid.min_integral, pid.max_integral)?;

    check_non_negative("max_output_delta", pid.max_output_delta)
}

fn check_limits(axis: &'static str, name: &'static str, min: f64, max: f64) -> Result<(), ParamsError> {
    check_finite(name, min)?;
    check_finite(name, max)?;

    if min > max {
        return Err(ParamsError::InvertedLimits {
            axis,
            name,
            min,
            max,
        });
    }

    Ok(())
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ParamsError> {
    check_finite(name, value)?;

    if value < 0.0 {
        return Err(ParamsError::Negative(name, value));
    }

    Ok(())
}

fn check_finite(name: &'static str, value: f64) -> Result<(), ParamsError> {
    if !value.is_finite() {
        return Err(ParamsError::NotFinite(name, value));
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_params_valid() {
        assert_eq!(validate(&Params::default()), Ok(()));
    }

    #[test]
    fn test_inverted_limits() {
        let mut params = Params::default();
        params.linear.min_output = 1.0;
        params.linear.max_output = -1.0;

        assert_eq!(
            validate(&params),
            Err(ParamsError::InvertedLimits {
                axis: "linear",
                name: "output",
                min: 1.0,
                max: -1.0
            })
        );

        let mut params = Params::default();
        params.angular.min_integral = 0.5;
        assert!(matches!(
            validate(&params),
            Err(ParamsError::InvertedLimits {
                name: "integral",
                ..
            })
        ));
    }

    #[test]
    fn test_bad_scalars() {
        let mut params = Params::default();
        params.arrival_radius_m = -0.1;
        assert_eq!(
            validate(&params),
            Err(ParamsError::Negative("arrival_radius_m", -0.1))
        );

        let mut params = Params::default();
        params.angular.max_output_delta = -0.01;
        assert!(matches!(
            validate(&params),
            Err(ParamsError::Negative("max_output_delta", _))
        ));

        let mut params = Params::default();
        params.linear.k_d = std::f64::INFINITY;
        assert!(matches!(
            validate(&params),
            Err(ParamsError::NotFinite("k_d", _))
        ));
    }
}
