//! # PID controller module
//!
//! A single axis PID controller with integral anti-windup, output saturation and output slew
//! limiting. Two of these are used by [`super::TrackCtrl`], one acting on the bearing to the
//! target and one on the forward error.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use serde::Serialize;

// Internal
use super::params::PidConfig;
use util::maths::clamp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller
#[derive(Debug, Clone)]
pub struct PidController {
    /// Name of the controlled axis, used in log messages
    name: &'static str,

    /// Gains and limits
    config: PidConfig,

    /// Internal state, only ever modified by `update` and `reset`
    state: PidState,
}

/// The internal state of a [`PidController`].
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct PidState {
    /// The integral accumulation, always within the integral limits after an update
    pub integral: f64,

    /// Error passed into the previous update, `None` after construction or reset
    pub prev_error: Option<f64>,

    /// Output of the previous update
    pub prev_output: f64,

    /// Time of the previous update (or of construction/reset)
    pub prev_time_s: f64,
}

/// The terms computed by a single controller update.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct PidTerms {
    pub error: f64,
    pub proportional: f64,
    pub integral: f64,
    pub derivative: f64,
    pub output: f64,
    pub dt_s: f64,

    /// Set if time did not advance since the previous update, in which case
    /// the derivative term was skipped
    pub dt_non_positive: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {
    /// Create a new controller with the given configuration. `time_s` is used
    /// as the time of the "previous" update for the first call to `update`.
    pub fn new(name: &'static str, config: PidConfig, time_s: f64) -> Self {
        Self {
            name,
            config,
            state: PidState::new(time_s),
        }
    }

    /// Get the output of the controller for the given error at the given time.
    pub fn update(&mut self, error: f64, time_s: f64) -> f64 {
        self.update_terms(error, time_s).output
    }

    /// Update the controller, returning all the computed terms.
    pub fn update_terms(&mut self, error: f64, time_s: f64) -> PidTerms {
        let cfg = &self.config;
        let dt_s = time_s - self.state.prev_time_s;

        let proportional = cfg.k_p * error;

        // On the first update there's no previous error, so use the current
        // one to get a zero derivative.
        let prev_error = self.state.prev_error.unwrap_or(error);

        // Without a time difference the derivative is undefined, so it's
        // skipped for this update only.
        let dt_non_positive = dt_s <= 0f64;
        let derivative = if dt_non_positive {
            warn!(
                "{} PID: non-positive time step ({:.6} s), skipping derivative",
                self.name, dt_s
            );
            0f64
        } else {
            cfg.k_d * (error - prev_error) / dt_s
        };

        // Anti-windup
        self.state.integral += error * dt_s;
        self.state.integral = clamp(&self.state.integral, &cfg.min_integral, &cfg.max_integral);
        let integral = cfg.k_i * self.state.integral;

        // Saturate then slew limit
        let mut output = clamp(
            &(proportional + integral + derivative),
            &cfg.min_output,
            &cfg.max_output,
        );
        output = clamp(
            &output,
            &(self.state.prev_output - cfg.max_output_delta),
            &(self.state.prev_output + cfg.max_output_delta),
        );

        self.state.prev_error = Some(error);
        self.state.prev_time_s = time_s;
        self.state.prev_output = output;

        PidTerms {
            error,
            proportional,
            integral,
            derivative,
            output,
            dt_s,
            dt_non_positive,
        }
    }

    /// Clear the accumulated state, as if the controller had just been
    /// created at `time_s`.
    pub fn reset(&mut self, time_s: f64) {
        self.state = PidState::new(time_s);
    }

    /// Replace the gains and limits. The state is kept, so the new
    /// configuration takes effect from the next update.
    pub fn set_config(&mut self, config: PidConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &PidConfig {
        &self.config
    }

    pub fn state(&self) -> &PidState {
        &self.state
    }
}

impl PidState {
    fn new(time_s: f64) -> Self {
        Self {
            integral: 0f64,
            prev_error: None,
            prev_output: 0f64,
            prev_time_s: time_s,
        }
    }
}
