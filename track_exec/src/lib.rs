//! # Tracking library.
//!
//! This library allows other crates in the workspace (and the benchmarks) to access items
//! defined inside the tracking executable.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Localisation module - converts odometry samples into the planar pose used for control
pub mod loc;

/// Tracking control module - drives the robot through the given waypoints
pub mod track_ctrl;

/// Data store - holds the state and outputs shared across a cycle of the executable
pub mod data_store;

/// Telecommand processor - dispatches telecommands to the tracking controller
pub mod tc_processor;
