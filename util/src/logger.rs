//! Logger setup for the tracking executables
//!
//! Every line is stamped with the seconds elapsed since the session epoch, so
//! the log can be lined up against the archived status reports, which use the
//! same time base.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::{self, info};
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level of at least `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// Log lines go to both stdout and the session's log file.
///
/// # Notes
///
/// - `min_level` must be at least `log::Level::Info`.
///
/// # Safety
///
/// - This function must only be called once to prevent corrupting logs.
pub fn logger_init(
    min_level: self::LevelFilter,
    session: &session::Session,
) -> Result<(), LoggerInitError> {
    if min_level < log::Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level));
    }

    let log_file = fern::log_file(session.log_file_path.clone())
        .map_err(LoggerInitError::LogFileInitError)?;

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}",
                format_line(
                    session::get_elapsed_seconds(),
                    record.level(),
                    record.target(),
                    &message.to_string()
                )
            ))
        })
        .level(min_level)
        .chain(std::io::stdout())
        .chain(log_file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised at {:?}", min_level);
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Session root:  {:?}", session.session_root);
    info!("    Log file:      {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Build a single log line.
///
/// Debug and trace lines are tagged with the module they came from, with the
/// crate name dropped to keep the lines short.
fn format_line(elapsed_s: f64, level: log::Level, target: &str, message: &str) -> String {
    if level > log::Level::Info {
        let module = match target.find("::") {
            Some(i) => &target[i + 2..],
            None => target,
        };

        format!(
            "{:>9.3} s {} [{}] {}",
            elapsed_s,
            level_to_str(level),
            module,
            message
        )
    } else {
        format!("{:>9.3} s {} {}", elapsed_s, level_to_str(level), message)
    }
}

/// Get the string representation of a log level
fn level_to_str(level: log::Level) -> ColoredString {
    match level {
        log::Level::Trace => "TRC".dimmed().italic(),
        log::Level::Debug => "DBG".dimmed(),
        log::Level::Info => "INF".normal(),
        log::Level::Warn => "WRN".yellow(),
        log::Level::Error => "ERR".red().bold(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_line() {
        colored::control::set_override(false);

        assert_eq!(
            format_line(1.5, log::Level::Info, "track_exec", "Waypoint reached"),
            "    1.500 s INF Waypoint reached"
        );

        assert_eq!(
            format_line(
                12.25,
                log::Level::Debug,
                "track_lib::track_ctrl::state",
                "Distance: 0.10 m"
            ),
            "   12.250 s DBG [track_ctrl::state] Distance: 0.10 m"
        );

        // Targets without a module path are kept whole
        assert!(format_line(0.0, log::Level::Trace, "main", "x").contains("[main] x"));
    }
}
