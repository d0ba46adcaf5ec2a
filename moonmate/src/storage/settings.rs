//! Settings store
//!
//! Manages settings persistence using JSON file storage.

use super::json_file::{read_json, write_json};
use super::models::Settings;
use crate::config::SETTINGS_FILE_NAME;
use crate::error::Result;
use std::path::PathBuf;

/// Store for the settings singleton
#[derive(Clone)]
pub struct SettingsStore {
    settings_path: PathBuf,
}

impl SettingsStore {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            settings_path: app_data_dir.join(SETTINGS_FILE_NAME),
        }
    }

    /// Load settings from disk, falling back to defaults on any failure
    pub async fn load(&self) -> Settings {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, using default settings");
            return Settings::default();
        }

        match read_json(&self.settings_path).await {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to load settings, using defaults: {}", e);
                Settings::default()
            }
        }
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &Settings) -> Result<()> {
        write_json(&self.settings_path, settings).await?;
        tracing::debug!("Settings saved to {:?}", self.settings_path);
        Ok(())
    }

    pub fn path(&self) -> &std::path::Path {
        &self.settings_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Theme;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn create_test_store() -> (SettingsStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SettingsStore::new(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_missing_file_returns_defaults() {
        let (store, _temp) = create_test_store();

        let settings = store.load().await;

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.font_size, 16.0);
        assert_eq!(settings.font_name, "SF Pro");
        assert_eq!(settings.theme, Theme::Light);
        assert!(settings.show_word_count);
        assert!(!settings.show_character_count);
        assert!(settings.last_opened_document_id.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_returns_defaults() {
        let (store, _temp) = create_test_store();
        std::fs::write(store.path(), "{ this is not json").unwrap();

        assert_eq!(store.load().await, Settings::default());
    }

    #[tokio::test]
    async fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().to_path_buf();
        let last_opened = Uuid::new_v4();

        {
            let store = SettingsStore::new(settings_path.clone());
            let updated = Settings {
                font_size: 20.0,
                font_name: "Menlo".to_string(),
                theme: Theme::Dark,
                show_word_count: false,
                show_character_count: true,
                last_opened_document_id: Some(last_opened),
            };
            store.save(&updated).await.unwrap();
        }

        {
            let store = SettingsStore::new(settings_path);
            let loaded = store.load().await;
            assert_eq!(loaded.font_size, 20.0);
            assert_eq!(loaded.font_name, "Menlo");
            assert_eq!(loaded.theme, Theme::Dark);
            assert!(!loaded.show_word_count);
            assert!(loaded.show_character_count);
            assert_eq!(loaded.last_opened_document_id, Some(last_opened));
        }
    }

    #[tokio::test]
    async fn test_save_to_unwritable_location_fails() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where the data directory should be
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "file").unwrap();
        let store = SettingsStore::new(blocker);

        assert!(store.save(&Settings::default()).await.is_err());
    }
}
