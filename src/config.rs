use serde::{Deserialize, Serialize};

use crate::UndercutError;
use crate::schedule::SessionType;

const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_PLAYBACK_SPEED: f64 = 1.0;

/// Persisted UI preferences, restored between runs.
#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct AppConfig {
    /// Season shown when the menu opens
    pub last_year: Option<u16>,
    pub session_type: SessionType,
    pub visible_hud: bool,
    pub playback_speed: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            last_year: None,
            session_type: SessionType::Race,
            visible_hud: true,
            playback_speed: DEFAULT_PLAYBACK_SPEED,
        }
    }
}

impl AppConfig {
    pub fn from_local_file() -> Option<Self> {
        let config_path = dirs::config_dir()?.join("undercut").join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let file = std::fs::File::open(config_path).ok()?;
            match serde_json::from_reader(file) {
                Ok(config) => Some(config),
                Err(e) => {
                    log::warn!("Ignoring unreadable config file: {}", e);
                    None
                }
            }
        } else {
            None
        }
    }

    pub fn save(&self) -> Result<(), UndercutError> {
        let config_path = dirs::config_dir()
            .ok_or(UndercutError::NoConfigDir)?
            .join("undercut")
            .join(CONFIG_FILE_NAME);

        if !config_path.exists()
            && let Some(parent) = config_path.parent()
        {
            std::fs::create_dir_all(parent).map_err(|e| UndercutError::ConfigIo { source: e })?;
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| UndercutError::ConfigIo { source: e })?;
        serde_json::to_writer(file, self).map_err(|e| UndercutError::ConfigSerialize { source: e })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_json() {
        let config = AppConfig {
            last_year: Some(2023),
            session_type: SessionType::Sprint,
            visible_hud: false,
            playback_speed: 4.0,
        };
        let json = serde_json::to_string(&config).unwrap();
        let restored: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.last_year, Some(2023));
        assert_eq!(restored.session_type, SessionType::Sprint);
        assert!(!restored.visible_hud);
        assert_eq!(restored.playback_speed, 4.0);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let restored: AppConfig = serde_json::from_str(r#"{"last_year": 2022}"#).unwrap();
        assert_eq!(restored.last_year, Some(2022));
        assert_eq!(restored.session_type, SessionType::Race);
        assert!(restored.visible_hud);
        assert_eq!(restored.playback_speed, DEFAULT_PLAYBACK_SPEED);
    }
}
