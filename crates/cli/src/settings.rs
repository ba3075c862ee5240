use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use facekeeper_core::notification::domain::greeting::DEFAULT_GREETING;
use facekeeper_core::notification::infrastructure::command_speech_sink::DEFAULT_SPEECH_COMMAND;
use facekeeper_core::shared::constants::DEFAULT_COOLDOWN_MS;

/// Persisted defaults for the `facekeeper` command. Flags win over these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub threshold: Option<f64>,
    pub cooldown_ms: u64,
    pub database: Option<PathBuf>,
    pub speech_enabled: bool,
    pub speech_command: String,
    pub greeting: String,
    pub model_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold: None,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            database: None,
            speech_enabled: true,
            speech_command: DEFAULT_SPEECH_COMMAND.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            model_path: None,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FaceKeeper").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Reads `path`, falling back to defaults when it is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring invalid settings in {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Where the signature database lives when neither `--db` nor the
    /// settings file names one.
    pub fn default_database() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("FaceKeeper").join("faces"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load_from(&tmp.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.cooldown_ms, 10_000);
        assert!(settings.threshold.is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{ "threshold": 0.6, "speech_enabled": false }"#).unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.threshold, Some(0.6));
        assert!(!settings.speech_enabled);
        assert_eq!(settings.greeting, "Hello {name}");
        assert_eq!(settings.speech_command, "espeak");
    }

    #[test]
    fn test_invalid_json_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "{ threshold: ").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_serialized_defaults_load_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        let mut settings = Settings::default();
        settings.database = Some(PathBuf::from("/srv/faces"));
        fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();

        assert_eq!(Settings::load_from(&path), settings);
    }
}
