//! Workspace settings and initialization.
//!
//! A workspace is a directory with an `.anvil/` subdirectory holding
//! `settings.json` (model + tool permissions) and saved conversations.
//! Corrupted settings are backed up and replaced with defaults rather
//! than aborting the session.

use anvil_core::permissions::PermissionSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Directory name created inside the workspace.
const ANVIL_DIR: &str = ".anvil";

/// The model used when settings are created from scratch.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Settings file not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Contents of `.anvil/settings.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    /// The model to use for this workspace
    pub model: String,

    /// Tool permission grants
    #[serde(default)]
    pub permissions: PermissionSet,

    /// When this workspace was initialized
    pub created_at: DateTime<Utc>,

    /// Refreshed on every save
    pub last_updated: DateTime<Utc>,
}

impl WorkspaceSettings {
    /// Fresh settings with default permissions (everything off).
    pub fn new(model: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            model: model.into(),
            permissions: PermissionSet::default(),
            created_at: now,
            last_updated: now,
        }
    }
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

/// Manages one workspace's `.anvil/` directory.
pub struct WorkspaceConfig {
    workspace_dir: PathBuf,
    anvil_dir: PathBuf,
}

impl WorkspaceConfig {
    /// A config rooted at the given workspace directory.
    pub fn new(workspace_dir: impl Into<PathBuf>) -> Self {
        let workspace_dir = workspace_dir.into();
        let anvil_dir = workspace_dir.join(ANVIL_DIR);
        Self {
            workspace_dir,
            anvil_dir,
        }
    }

    /// A config rooted at the current working directory.
    pub fn current_dir() -> Result<Self, ConfigError> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn workspace_dir(&self) -> &Path {
        &self.workspace_dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.anvil_dir.join("settings.json")
    }

    pub fn conversations_dir(&self) -> PathBuf {
        self.anvil_dir.join("conversations")
    }

    /// Create the `.anvil/` directory structure if it doesn't exist.
    ///
    /// Returns `true` if the workspace was created, `false` if it
    /// already existed.
    pub fn initialize_workspace(&self) -> Result<bool, ConfigError> {
        if self.anvil_dir.exists() {
            return Ok(false);
        }

        std::fs::create_dir_all(&self.anvil_dir)?;
        std::fs::create_dir_all(self.conversations_dir())?;
        Ok(true)
    }

    /// Load settings from `settings.json`.
    ///
    /// A missing file is an error; a corrupted file is backed up to
    /// `settings.json.bak` and replaced with defaults.
    pub fn load_settings(&self) -> Result<WorkspaceSettings, ConfigError> {
        let path = self.settings_path();
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }

        let raw = std::fs::read_to_string(&path)?;
        match serde_json::from_str(&raw) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                let backup = path.with_extension("json.bak");
                std::fs::copy(&path, &backup)?;
                warn!(
                    backup = %backup.display(),
                    error = %e,
                    "Corrupted settings.json backed up, writing defaults"
                );

                let mut defaults = WorkspaceSettings::default();
                self.save_settings(&mut defaults)?;
                Ok(defaults)
            }
        }
    }

    /// Save settings, refreshing `last_updated`.
    pub fn save_settings(&self, settings: &mut WorkspaceSettings) -> Result<(), ConfigError> {
        settings.last_updated = Utc::now();
        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(self.settings_path(), json)?;
        Ok(())
    }

    /// Update the model in settings and save.
    pub fn update_model(&self, model: impl Into<String>) -> Result<(), ConfigError> {
        let mut settings = self.load_settings()?;
        settings.model = model.into();
        self.save_settings(&mut settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> (tempfile::TempDir, WorkspaceConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkspaceConfig::new(dir.path());
        (dir, config)
    }

    #[test]
    fn initialize_creates_directories_once() {
        let (_dir, config) = config();

        assert!(config.initialize_workspace().unwrap());
        assert!(config.conversations_dir().is_dir());

        // Second call is a no-op.
        assert!(!config.initialize_workspace().unwrap());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (_dir, config) = config();
        config.initialize_workspace().unwrap();

        let mut settings = WorkspaceSettings::new("gpt-4o");
        settings.permissions.allow_file_operations = true;
        config.save_settings(&mut settings).unwrap();

        let loaded = config.load_settings().unwrap();
        assert_eq!(loaded.model, "gpt-4o");
        assert!(loaded.permissions.allow_file_operations);
        assert!(!loaded.permissions.allow_shell_commands);
    }

    #[test]
    fn load_missing_settings_is_not_found() {
        let (_dir, config) = config();
        config.initialize_workspace().unwrap();
        assert!(matches!(
            config.load_settings(),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn corrupted_settings_backed_up_and_replaced() {
        let (_dir, config) = config();
        config.initialize_workspace().unwrap();
        std::fs::write(config.settings_path(), "{ this is not json").unwrap();

        let settings = config.load_settings().unwrap();
        assert_eq!(settings.model, DEFAULT_MODEL);

        // Backup holds the corrupt original; settings.json is valid again.
        let backup = config.settings_path().with_extension("json.bak");
        assert_eq!(
            std::fs::read_to_string(backup).unwrap(),
            "{ this is not json"
        );
        assert!(config.load_settings().is_ok());
    }

    #[test]
    fn update_model_persists() {
        let (_dir, config) = config();
        config.initialize_workspace().unwrap();
        config
            .save_settings(&mut WorkspaceSettings::default())
            .unwrap();

        config.update_model("gpt-4o").unwrap();
        assert_eq!(config.load_settings().unwrap().model, "gpt-4o");
    }

    #[test]
    fn save_refreshes_last_updated() {
        let (_dir, config) = config();
        config.initialize_workspace().unwrap();

        let mut settings = WorkspaceSettings::default();
        let before = settings.last_updated;
        config.save_settings(&mut settings).unwrap();
        assert!(settings.last_updated >= before);
    }
}
