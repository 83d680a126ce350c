//! Tracking control module
//!
//! Drives the robot through a list of waypoints. On each new pose the bearing
//! and forward errors to the current waypoint are calculated in the robot
//! frame and passed through a pair of PID controllers, one giving the turn
//! rate and one the forward speed. Waypoints are consumed in order as the
//! robot comes within the arrival radius of them, and once the last is reached
//! the robot is stopped until a new list is received.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod frame;
mod params;
mod pid;
mod queue;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use frame::*;
pub use params::*;
pub use pid::*;
pub use queue::*;
pub use state::*;
