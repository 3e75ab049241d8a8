// File-backed season schedules and recorded session naming

use std::fs;
use std::path::PathBuf;

use log::info;

use super::{Event, SeasonProvider, SessionType};
use crate::errors::UndercutError;

const SCHEDULES_DIR: &str = "schedules";
const SESSIONS_DIR: &str = "sessions";

/// Reads season calendars and locates recorded sessions under a data
/// directory laid out as `schedules/<year>.json` and
/// `sessions/<year>_<round>_<code>.jsonl`.
#[derive(Clone, Debug)]
pub struct FileScheduleStore {
    data_dir: PathBuf,
}

impl FileScheduleStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Create a store rooted in the default application data directory.
    pub fn new_default() -> Result<Self, UndercutError> {
        let app_data_dir = dirs::data_dir().ok_or(UndercutError::NoDataDir)?;
        Ok(Self::new(app_data_dir.join("undercut")))
    }

    pub fn schedule_path(&self, year: u16) -> PathBuf {
        self.data_dir
            .join(SCHEDULES_DIR)
            .join(format!("{year}.json"))
    }

    pub fn session_path(&self, year: u16, round: u32, session_type: SessionType) -> PathBuf {
        self.data_dir.join(SESSIONS_DIR).join(format!(
            "{year}_{round:02}_{code}.jsonl",
            code = session_type.code()
        ))
    }
}

impl SeasonProvider for FileScheduleStore {
    fn season_events(&self, year: u16) -> Result<Vec<Event>, UndercutError> {
        let path = self.schedule_path(year);
        if !path.exists() {
            return Err(UndercutError::ScheduleNotFound { year, path });
        }

        let content = fs::read_to_string(&path).map_err(|e| UndercutError::ScheduleIo {
            path: path.clone(),
            source: e,
        })?;
        let events: Vec<Event> =
            serde_json::from_str(&content).map_err(|e| UndercutError::ScheduleParse {
                path: path.clone(),
                source: e,
            })?;

        info!(
            "Loaded {} events for the {} season from {:?}",
            events.len(),
            year,
            path
        );
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_schedule(dir: &TempDir, year: u16, content: &str) {
        let schedules = dir.path().join(SCHEDULES_DIR);
        fs::create_dir_all(&schedules).unwrap();
        let mut file = fs::File::create(schedules.join(format!("{year}.json"))).unwrap();
        write!(file, "{content}").unwrap();
    }

    #[test]
    fn loads_events_for_a_season() {
        let dir = TempDir::new().unwrap();
        write_schedule(
            &dir,
            2024,
            r#"[{"round":1,"name":"Bahrain Grand Prix","has_sprint":false},
                {"round":2,"name":"Saudi Arabian Grand Prix","has_sprint":false},
                {"round":5,"name":"Chinese Grand Prix","has_sprint":true}]"#,
        );

        let store = FileScheduleStore::new(dir.path().to_path_buf());
        let events = store.season_events(2024).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].round, 1);
        assert_eq!(events[2].name, "Chinese Grand Prix");
        assert!(events[2].has_sprint);
    }

    #[test]
    fn missing_season_is_schedule_not_found() {
        let dir = TempDir::new().unwrap();
        let store = FileScheduleStore::new(dir.path().to_path_buf());
        match store.season_events(2019) {
            Err(UndercutError::ScheduleNotFound { year, .. }) => assert_eq!(year, 2019),
            other => panic!("Expected ScheduleNotFound, got {:?}", other),
        }
    }

    #[test]
    fn malformed_schedule_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        write_schedule(&dir, 2023, r#"[{"round": "not a number"}]"#);

        let store = FileScheduleStore::new(dir.path().to_path_buf());
        assert!(matches!(
            store.season_events(2023),
            Err(UndercutError::ScheduleParse { .. })
        ));
    }

    #[test]
    fn session_paths_embed_round_and_code() {
        let store = FileScheduleStore::new(PathBuf::from("/data"));
        let path = store.session_path(2024, 5, SessionType::Sprint);
        assert_eq!(
            path,
            PathBuf::from("/data").join("sessions").join("2024_05_S.jsonl")
        );
    }
}
