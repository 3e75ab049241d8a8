pub mod store;

use std::fmt;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

pub use store::FileScheduleStore;

use crate::UndercutError;

/// First season with published schedules.
pub const FIRST_SEASON: u16 = 2018;

/// Latest selectable season.
pub fn current_season() -> u16 {
    chrono::Local::now().year() as u16
}

/// One scheduled race weekend within a season.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// Round number within the season, starting at 1
    pub round: u32,
    /// Grand prix name (e.g., "Monaco Grand Prix")
    pub name: String,
    /// Whether the weekend includes a sprint session
    pub has_sprint: bool,
}

/// Which session of a race weekend to replay.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SessionType {
    #[default]
    Race,
    Qualifying,
    Sprint,
}

impl SessionType {
    pub const ALL: [SessionType; 3] = [
        SessionType::Race,
        SessionType::Qualifying,
        SessionType::Sprint,
    ];

    /// Single-character code used in file names and on the command line.
    pub fn code(&self) -> char {
        match self {
            SessionType::Race => 'R',
            SessionType::Qualifying => 'Q',
            SessionType::Sprint => 'S',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionType::Race => "Race",
            SessionType::Qualifying => "Qualifying",
            SessionType::Sprint => "Sprint",
        }
    }

    pub fn from_code(code: &str) -> Result<Self, UndercutError> {
        match code.trim() {
            "R" | "r" => Ok(SessionType::Race),
            "Q" | "q" => Ok(SessionType::Qualifying),
            "S" | "s" => Ok(SessionType::Sprint),
            other => Err(UndercutError::UnknownSessionType {
                code: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Source of season calendars. The menu only ever talks to this trait, so it
/// can be driven by the file store or by test stubs.
pub trait SeasonProvider {
    fn season_events(&self, year: u16) -> Result<Vec<Event>, UndercutError>;
}
