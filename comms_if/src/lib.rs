//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the tracking software.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod tc;

/// Message definitions for equipment (the odometry source and the drive base)
pub mod eqpt;
