// Library interface for undercut
// This allows integration tests to access internal modules

pub mod config;
pub mod errors;
pub mod replay;
pub mod schedule;
pub mod ui;

// Re-export commonly used types
pub use errors::UndercutError;
pub use replay::{ReplayFrame, ReplaySession, SessionHeader, TrackStatus, load_session};
pub use schedule::{Event, FileScheduleStore, SeasonProvider, SessionType};
pub use ui::menu::Selection;
