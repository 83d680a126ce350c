//! # Equipment Interface
//!
//! This module defines the interface structures exchanged with equipment, i.e. the odometry
//! source feeding the controller and the drive base receiving velocity commands.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod odom;
