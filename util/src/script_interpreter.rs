//! # Script interpreter module
//!
//! This module provides an interpreter for tracking scripts, allowing
//! telecommands (odometry samples, waypoint lists, configuration changes) to
//! be replayed from a file.
//!
//! A script is a sequence of entries of the form `<time_s>: <tc json>;`, for
//! example
//!
//! ```text
//! 0.0: {"type": "WAYPOINTS", "payload": [{"x_m": 1.0, "y_m": 0.0}]};
//! 0.1: {"type": "ODOM", "payload": {"position_m": [0, 0, 0], "orientation_q": [0, 0, 0, 1]}};
//! ```
//!
//! Anything not matching an entry (such as `#` comment lines) is ignored.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use regex::RegexBuilder;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use comms_if::tc::{Tc, TcParseError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command which is scripted to occur at a specific time.
#[derive(Debug, Clone)]
pub struct Command {
    /// The time the command is supposed to execute at
    pub exec_time_s: f64,

    /// The Telecommand to run
    pub tc: Tc,
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use
/// `.get_pending_tcs` to acquire a list of telecommands that need executing.
pub struct ScriptInterpreter {
    _script_path: PathBuf,
    cmds: VecDeque<Command>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)"
    )]
    InvalidTimestamp(String),

    #[error("Script timestamps must not decrease, found {1} s after {0} s")]
    TimestampsOutOfOrder(f64, f64),

    #[error("Script contains an invalid TC at {0} s: {1}")]
    InvalidTc(f64, TcParseError),

    #[error("Could not build the script pattern: {0}")]
    InvalidPattern(regex::Error),
}

pub enum PendingTcs {
    None,
    Some(Vec<Command>),
    EndOfScript,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {
    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());

        // Check that the script file exists.
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        // Load the script into a string
        let script = fs::read_to_string(&path).map_err(ScriptError::ScriptLoadError)?;

        let cmds = Self::parse(&script)?;

        Ok(ScriptInterpreter {
            _script_path: path,
            cmds,
        })
    }

    /// Create a new interpreter directly from the script's contents.
    pub fn from_script_str(script: &str) -> Result<Self, ScriptError> {
        Ok(ScriptInterpreter {
            _script_path: PathBuf::new(),
            cmds: Self::parse(script)?,
        })
    }

    /// Return a vector of pending TCs, i.e. all commands scheduled at or
    /// before `current_time_s`, or `None` if no TCs need executing now.
    pub fn get_pending_tcs(&mut self, current_time_s: f64) -> PendingTcs {
        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.cmds.is_empty() {
            return PendingTcs::EndOfScript;
        }

        let mut tc_vec: Vec<Command> = vec![];

        // Pop commands from the front of the queue until the head is
        // scheduled in the future.
        while let Some(cmd) = self.cmds.front() {
            if cmd.exec_time_s > current_time_s {
                break;
            }

            if let Some(cmd) = self.cmds.pop_front() {
                tc_vec.push(cmd);
            }
        }

        if tc_vec.is_empty() {
            PendingTcs::None
        } else {
            PendingTcs::Some(tc_vec)
        }
    }

    /// Get the number of TCs remaining in the script
    pub fn get_num_tcs(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64,
        }
    }

    fn parse(script: &str) -> Result<VecDeque<Command>, ScriptError> {
        // Empty queue of commands
        let mut tc_queue: VecDeque<Command> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .map_err(ScriptError::InvalidPattern)?;

        for cap in re.captures_iter(script) {
            let time_str = cap.get(1).map(|m| m.as_str()).unwrap_or_default();
            let tc_str = cap.get(3).map(|m| m.as_str()).unwrap_or_default();

            // Parse the exec time
            let exec_time_s: f64 = time_str
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            // Scripts are replayed in order, so reject time going backwards
            if let Some(prev) = tc_queue.back() {
                if exec_time_s < prev.exec_time_s {
                    return Err(ScriptError::TimestampsOutOfOrder(
                        prev.exec_time_s,
                        exec_time_s,
                    ));
                }
            }

            // Parse the TC from the payload. The scripts contain JSON only.
            let tc = Tc::from_json(tc_str).map_err(|e| ScriptError::InvalidTc(exec_time_s, e))?;

            tc_queue.push_back(Command { exec_time_s, tc });
        }

        if tc_queue.is_empty() {
            return Err(ScriptError::ScriptEmpty);
        }

        Ok(tc_queue)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SCRIPT: &str = r#"
# Drive to a single point
0.0: {"type": "WAYPOINTS", "payload": [{"x_m": 1.0, "y_m": 0.0}]};
0.1: {"type": "ODOM", "payload": {"position_m": [0.0, 0.0, 0.0], "orientation_q": [0.0, 0.0, 0.0, 1.0]}};
0.2: {"type": "ODOM", "payload": {"position_m": [0.1, 0.0, 0.0], "orientation_q": [0.0, 0.0, 0.0, 1.0]}};
1.5: {"type": "STOP"};
"#;

    #[test]
    fn test_parse_script() {
        let si = ScriptInterpreter::from_script_str(SCRIPT).unwrap();

        assert_eq!(si.get_num_tcs(), 4);
        assert_eq!(si.get_duration(), 1.5);
    }

    #[test]
    fn test_pending_tcs() {
        let mut si = ScriptInterpreter::from_script_str(SCRIPT).unwrap();

        match si.get_pending_tcs(0.15) {
            PendingTcs::Some(cmds) => {
                assert_eq!(cmds.len(), 2);
                assert!(matches!(cmds[0].tc, Tc::Waypoints(_)));
                assert_eq!(cmds[1].exec_time_s, 0.1);
            }
            _ => panic!("Expected pending TCs"),
        }

        assert!(matches!(si.get_pending_tcs(0.15), PendingTcs::None));

        match si.get_pending_tcs(10.0) {
            PendingTcs::Some(cmds) => {
                assert_eq!(cmds.len(), 2);
                assert_eq!(cmds[1].tc, Tc::Stop);
            }
            _ => panic!("Expected pending TCs"),
        }

        assert!(matches!(si.get_pending_tcs(10.0), PendingTcs::EndOfScript));
    }

    #[test]
    fn test_bad_scripts() {
        assert!(matches!(
            ScriptInterpreter::from_script_str("# nothing here"),
            Err(ScriptError::ScriptEmpty)
        ));
        assert!(matches!(
            ScriptInterpreter::from_script_str(r#"0.5: {"type": "NOPE"};"#),
            Err(ScriptError::InvalidTc(_, _))
        ));
        assert!(matches!(
            ScriptInterpreter::from_script_str("1.0: {\"type\": \"STOP\"};\n0.5: {\"type\": \"STOP\"};"),
            Err(ScriptError::TimestampsOutOfOrder(_, _))
        ));
        assert!(matches!(
            ScriptInterpreter::new("/no/such/script.trk"),
            Err(ScriptError::ScriptNotFound(_))
        ));
    }
}
