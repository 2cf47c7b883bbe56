use crate::files::{read_optional, write_atomic};
use std::path::PathBuf;
use virtuoso_ports::storage::{SettingsDto, StorageError, StoragePort};

const APP_DIR: &str = "Virtuoso";
const SETTINGS_FILE: &str = "settings.json";

/// Settings persisted as pretty JSON in one file under `base_dir`.
pub struct FsStorage {
    base_dir: PathBuf,
}

impl FsStorage {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// `<platform config dir>/Virtuoso`, falling back to the working directory.
    pub fn in_config_dir() -> Self {
        match dirs_next::config_dir() {
            Some(dir) => Self::new(dir.join(APP_DIR)),
            None => {
                log::warn!("no platform config dir, keeping settings in the working directory");
                Self::new(PathBuf::from("."))
            }
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.base_dir.join(SETTINGS_FILE)
    }
}

impl StoragePort for FsStorage {
    fn load_settings(&self) -> Result<SettingsDto, StorageError> {
        let path = self.settings_path();
        let Some(data) = read_optional(&path).map_err(|e| StorageError::Io(e.to_string()))?
        else {
            log::debug!("no settings at {}, using defaults", path.display());
            return Ok(SettingsDto::default());
        };
        let settings: SettingsDto =
            serde_json::from_str(&data).map_err(|e| StorageError::Serde(e.to_string()))?;
        Ok(normalized(settings))
    }

    fn save_settings(&self, s: &SettingsDto) -> Result<(), StorageError> {
        let path = self.settings_path();
        let data = serde_json::to_vec_pretty(s).map_err(|e| StorageError::Serde(e.to_string()))?;
        write_atomic(&path, &data).map_err(|e| StorageError::Io(e.to_string()))?;
        log::debug!("saved settings to {}", path.display());
        Ok(())
    }
}

/// Repairs values a hand-edited file can get wrong. Volume is already
/// clamped by its own deserializer.
fn normalized(mut settings: SettingsDto) -> SettingsDto {
    let topic = settings.generation_topic.trim();
    if topic.is_empty() {
        settings.generation_topic = SettingsDto::default().generation_topic;
    } else if topic.len() != settings.generation_topic.len() {
        settings.generation_topic = topic.to_string();
    }
    settings.frame_interval_ms = settings.frame_interval_ms.max(1);
    settings
}
