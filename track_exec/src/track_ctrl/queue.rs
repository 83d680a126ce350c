//! # Waypoint queue
//!
//! Holds the waypoints the robot has still to visit, and the one it is currently driving towards.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::collections::VecDeque;

use comms_if::tc::track_ctrl::Waypoint;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An ordered, consumable sequence of waypoints.
#[derive(Debug, Clone)]
pub struct WaypointQueue {
    /// Waypoints after the current one, in the order they will be visited
    remaining: VecDeque<Waypoint>,

    /// The waypoint currently being tracked. Stale while `awaiting` is set.
    current: Option<Waypoint>,

    /// Set until the first list is received, and again once the list is used up
    awaiting: bool,

    /// Number of waypoints reached since the last list was received
    num_consumed: usize,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum QueueError {
    /// Attempted to load a list with no waypoints in it.
    #[error("Attempted to load an empty waypoint list")]
    EmptyList,

    /// Attempted to advance past the last waypoint.
    #[error("No waypoints remain in the queue")]
    Exhausted,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for WaypointQueue {
    fn default() -> Self {
        Self {
            remaining: VecDeque::new(),
            current: None,
            awaiting: true,
            num_consumed: 0,
        }
    }
}

impl WaypointQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents of the queue with a new list of waypoints.
    ///
    /// The first waypoint becomes the current one. An empty list is rejected
    /// and leaves the queue as it was.
    pub fn push_all(&mut self, waypoints: Vec<Waypoint>) -> Result<(), QueueError> {
        let mut remaining: VecDeque<Waypoint> = waypoints.into();

        let first = remaining.pop_front().ok_or(QueueError::EmptyList)?;

        self.current = Some(first);
        self.remaining = remaining;
        self.awaiting = false;
        self.num_consumed = 0;

        Ok(())
    }

    /// Move on to the next waypoint.
    ///
    /// If there are no waypoints left the queue starts awaiting a new list
    /// and `QueueError::Exhausted` is returned.
    pub fn advance(&mut self) -> Result<&Waypoint, QueueError> {
        match self.remaining.pop_front() {
            Some(wp) => {
                self.num_consumed += 1;
                Ok(self.current.insert(wp))
            }
            None => {
                if !self.awaiting {
                    self.num_consumed += 1;
                }
                self.awaiting = true;
                Err(QueueError::Exhausted)
            }
        }
    }

    /// The waypoint currently being tracked, `None` if no list has ever been
    /// received.
    ///
    /// While awaiting this still returns the last tracked waypoint, which must
    /// not be used for control.
    pub fn current(&self) -> Option<&Waypoint> {
        self.current.as_ref()
    }

    /// Return true if there is no valid current waypoint.
    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    /// Number of waypoints after the current one.
    pub fn num_remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Number of waypoints reached since the last list was received.
    pub fn num_consumed(&self) -> usize {
        self.num_consumed
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn wps(n: usize) -> Vec<Waypoint> {
        (0..n).map(|i| Waypoint::new(i as f64, 0.0)).collect()
    }

    #[test]
    fn test_initially_awaiting() {
        let q = WaypointQueue::new();

        assert!(q.is_awaiting());
        assert!(q.current().is_none());
        assert_eq!(q.num_remaining(), 0);
    }

    #[test]
    fn test_push_and_advance() {
        let mut q = WaypointQueue::new();
        q.push_all(wps(3)).unwrap();

        assert!(!q.is_awaiting());
        assert_eq!(q.current(), Some(&Waypoint::new(0.0, 0.0)));
        assert_eq!(q.num_remaining(), 2);

        assert_eq!(q.advance(), Ok(&Waypoint::new(1.0, 0.0)));
        assert_eq!(q.advance(), Ok(&Waypoint::new(2.0, 0.0)));
        assert_eq!(q.num_consumed(), 2);
        assert!(!q.is_awaiting());

        assert_eq!(q.advance(), Err(QueueError::Exhausted));
        assert!(q.is_awaiting());
        assert_eq!(q.num_consumed(), 3);

        // Current is stale but still populated
        assert_eq!(q.current(), Some(&Waypoint::new(2.0, 0.0)));

        // Advancing an exhausted queue is still handled
        assert_eq!(q.advance(), Err(QueueError::Exhausted));
        assert_eq!(q.num_consumed(), 3);
    }

    #[test]
    fn test_push_replaces() {
        let mut q = WaypointQueue::new();
        q.push_all(wps(3)).unwrap();
        q.advance().unwrap();

        q.push_all(vec![Waypoint::new(5.0, 5.0)]).unwrap();
        assert_eq!(q.current(), Some(&Waypoint::new(5.0, 5.0)));
        assert_eq!(q.num_remaining(), 0);
        assert_eq!(q.num_consumed(), 0);
    }

    #[test]
    fn test_empty_list_rejected() {
        let mut q = WaypointQueue::new();
        assert_eq!(q.push_all(vec![]), Err(QueueError::EmptyList));
        assert!(q.is_awaiting());

        q.push_all(wps(2)).unwrap();
        assert_eq!(q.push_all(vec![]), Err(QueueError::EmptyList));
        assert!(!q.is_awaiting());
        assert_eq!(q.num_remaining(), 1);
    }
}
