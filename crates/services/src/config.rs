//! Client configuration: backend base URL and download directory.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Backend origin, no trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Where exported history and generated reports land. Falls
    /// back to the OS download folder when unset.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            download_dir: None,
        }
    }
}

impl ClientSettings {
    /// Effective download directory: configured dir, else the OS
    /// download folder, else the current directory.
    pub fn resolve_download_dir(&self) -> PathBuf {
        if let Some(dir) = &self.download_dir {
            return dir.clone();
        }
        if let Some(user_dirs) = directories::UserDirs::new() {
            if let Some(dl) = user_dirs.download_dir() {
                return dl.to_path_buf();
            }
        }
        PathBuf::from(".")
    }
}

fn config_path() -> Option<PathBuf> {
    let proj = directories::ProjectDirs::from("com.local", "Chat Desk", "ChatDesk")?;
    let _ = std::fs::create_dir_all(proj.config_dir());
    Some(proj.config_dir().join("settings.json"))
}

/// Load settings from disk, falling back to defaults on any miss or
/// parse failure. A corrupt file never blocks startup.
pub fn load_settings_or_default() -> ClientSettings {
    if let Some(path) = config_path() {
        if path.exists() {
            if let Ok(bytes) = std::fs::read(&path) {
                match serde_json::from_slice::<ClientSettings>(&bytes) {
                    Ok(settings) => return settings,
                    Err(e) => {
                        tracing::warn!("ignoring unreadable settings file: {}", e);
                    }
                }
            }
        }
    }
    ClientSettings::default()
}

/// Persist settings; failures are logged and swallowed, settings
/// are not worth crashing over.
pub fn save_settings(settings: &ClientSettings) {
    let Some(path) = config_path() else {
        return;
    };
    match serde_json::to_vec_pretty(settings) {
        Ok(bytes) => {
            if let Err(e) = std::fs::write(&path, bytes) {
                tracing::warn!("failed to save settings: {}", e);
            }
        }
        Err(e) => tracing::warn!("failed to serialize settings: {}", e),
    }
}
