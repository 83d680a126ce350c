//! # Telecommand module
//!
//! This module provides telecommand functionality to the communications
//! interface. A telecommand is any event delivered to the tracking executable
//! from outside: odometry samples, waypoint lists, configuration changes and
//! the stop request.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod track_ctrl;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use serde_json::{self, Value};
use thiserror::Error;

// Internal
use crate::eqpt::odom::Odometry;
use track_ctrl::{TrackCtrlConfig, Waypoint};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A telecommand.
///
/// Serialised as `{"type": "<TYPE>", "payload": <payload>}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tc {
    /// A new odometry sample from the pose estimator.
    Odom(Odometry),

    /// A fresh list of waypoints, replacing any being followed.
    Waypoints(Vec<Waypoint>),

    /// A new controller configuration.
    Config(TrackCtrlConfig),

    /// Stop the robot and end execution.
    Stop,
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("TC has an invalid type ({0})")]
    InvalidType(String),

    #[error("TC of type {0} has an invalid payload: {1}")]
    InvalidPayload(String, serde_json::Error),
}

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

static TC_TYPES: [&str; 4] = ["ODOM", "WAYPOINTS", "CONFIG", "STOP"];

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Tc {
    /// Parse a new TC from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, TcParseError> {
        // Parse the JSON string into a value
        let val: Value = match serde_json::from_str(json_str) {
            Ok(v) => v,
            Err(e) => return Err(TcParseError::InvalidJson(e)),
        };

        // Check the type first so that an unknown type isn't reported as a payload error
        let tc_type = match val["type"].as_str() {
            Some(s) => s.to_string(),
            None => {
                return Err(TcParseError::InvalidType(String::from(
                    "Expected \"type\" to be a string",
                )))
            }
        };

        if !TC_TYPES.contains(&tc_type.as_str()) {
            return Err(TcParseError::InvalidType(tc_type));
        }

        serde_json::from_value(val).map_err(|e| TcParseError::InvalidPayload(tc_type, e))
    }

    /// Serialise the TC into a JSON packet
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_odom() {
        let tc = Tc::from_json(
            r#"{"type": "ODOM", "payload": {
                "position_m": [1.0, 2.0, 0.0],
                "orientation_q": [0.0, 0.0, 0.0, 1.0],
                "linear_ms": 0.1
            }}"#,
        )
        .unwrap();

        match tc {
            Tc::Odom(o) => {
                assert_eq!(o.position_m, [1.0, 2.0, 0.0]);
                assert_eq!(o.linear_ms, 0.1);
                assert_eq!(o.angular_rads, 0.0);
            }
            t => panic!("Expected an ODOM TC, got {:?}", t),
        }
    }

    #[test]
    fn test_parse_waypoints() {
        let tc = Tc::from_json(
            r#"{"type": "WAYPOINTS", "payload": [
                {"x_m": 1.0, "y_m": 0.0},
                {"x_m": 1.0, "y_m": 1.0, "yaw_rad": 1.57, "ff_linear_ms": 0.2}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            tc,
            Tc::Waypoints(vec![
                Waypoint::new(1.0, 0.0),
                Waypoint {
                    x_m: 1.0,
                    y_m: 1.0,
                    yaw_rad: 1.57,
                    ff_linear_ms: 0.2,
                    ff_angular_rads: 0.0
                }
            ])
        );
    }

    #[test]
    fn test_parse_stop() {
        assert_eq!(Tc::from_json(r#"{"type": "STOP"}"#).unwrap(), Tc::Stop);
    }

    #[test]
    fn test_config_json_round_trip() {
        let tc = Tc::Config(TrackCtrlConfig::default());
        let json = tc.to_json().unwrap();

        assert_eq!(Tc::from_json(&json).unwrap(), tc);
    }

    #[test]
    fn test_invalid_tcs() {
        assert!(matches!(
            Tc::from_json("not json"),
            Err(TcParseError::InvalidJson(_))
        ));
        assert!(matches!(
            Tc::from_json(r#"{"type": "WARP"}"#),
            Err(TcParseError::InvalidType(_))
        ));
        assert!(matches!(
            Tc::from_json(r#"{"payload": 1.0}"#),
            Err(TcParseError::InvalidType(_))
        ));
        assert!(matches!(
            Tc::from_json(r#"{"type": "WAYPOINTS", "payload": 3}"#),
            Err(TcParseError::InvalidPayload(_, _))
        ));
    }
}
