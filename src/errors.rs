// Error types for undercut

use snafu::Snafu;
use std::{io, path::PathBuf};

#[derive(Debug, Snafu)]
pub enum UndercutError {
    // Errors for the season schedule store
    #[snafu(display("No schedule file for the {year} season, expected {path:?}"))]
    ScheduleNotFound { year: u16, path: PathBuf },
    #[snafu(display("Error reading schedule file {path:?}"))]
    ScheduleIo { path: PathBuf, source: io::Error },
    #[snafu(display("Malformed schedule file {path:?}"))]
    ScheduleParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    // Errors for recorded session files
    #[snafu(display("No recorded session at {path:?}"))]
    SessionNotFound { path: PathBuf },
    #[snafu(display("Error reading session file {path:?}"))]
    SessionIo { path: PathBuf, source: io::Error },
    #[snafu(display("Invalid session file {path:?}: {reason}"))]
    InvalidSessionFile { path: PathBuf, reason: String },

    // Config management errors
    #[snafu(display("Could not find application data directory"))]
    NoDataDir,
    #[snafu(display("Could not find application config directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error writing config file"))]
    ConfigIo { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerialize { source: serde_json::Error },

    // User input errors
    #[snafu(display("Unknown session type code: {code} (expected R, Q, or S)"))]
    UnknownSessionType { code: String },
}
