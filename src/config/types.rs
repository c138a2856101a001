use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::defaults::{
    clamp_volume, default_api_base_url, default_catalog_retry_attempts,
    default_connect_timeout_secs, default_login_url, default_max_audio_bytes,
    default_max_catalog_bytes, default_request_timeout_secs, default_volume,
};
use crate::backend::BackendLimits;
use crate::http_client::{AgentTimeouts, RetryConfig};

/// Environment variable that replaces `backend.api_base_url`.
pub const API_URL_ENV: &str = "YOV_API_URL";
/// Environment variable that replaces `backend.user`.
pub const USER_ENV: &str = "YOV_USER";

/// Settings persisted in `config.toml`.
///
/// Config keys (TOML): `backend`, `playback`, `download`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub playback: PlaybackSettings,
    #[serde(default)]
    pub download: DownloadSettings,
}

impl AppSettings {
    pub(crate) fn normalized(mut self) -> Self {
        self.playback.volume = clamp_volume(self.playback.volume);
        self.backend.catalog_retry_attempts = self.backend.catalog_retry_attempts.max(1);
        self.backend.user = self
            .backend
            .user
            .take()
            .map(|user| user.trim().to_string())
            .filter(|user| !user.is_empty());
        self
    }
}

/// Where the backend lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Page opened in the browser when no user is signed in.
    #[serde(default = "default_login_url")]
    pub login_url: String,
    /// Signed-in user id; `None` means login is required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_catalog_retry_attempts")]
    pub catalog_retry_attempts: usize,
    #[serde(default = "default_max_catalog_bytes")]
    pub max_catalog_bytes: usize,
    #[serde(default = "default_max_audio_bytes")]
    pub max_audio_bytes: usize,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            login_url: default_login_url(),
            user: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            catalog_retry_attempts: default_catalog_retry_attempts(),
            max_catalog_bytes: default_max_catalog_bytes(),
            max_audio_bytes: default_max_audio_bytes(),
        }
    }
}

impl BackendSettings {
    pub fn timeouts(&self) -> AgentTimeouts {
        AgentTimeouts {
            connect: Duration::from_secs(self.connect_timeout_secs),
            request: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn limits(&self) -> BackendLimits {
        let defaults = BackendLimits::default();
        BackendLimits {
            max_catalog_bytes: self.max_catalog_bytes,
            max_audio_bytes: self.max_audio_bytes,
            catalog_retry: RetryConfig {
                max_attempts: self.catalog_retry_attempts.max(1),
                ..defaults.catalog_retry
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// Output volume, 0.0 - 1.0.
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Start playback as soon as a synthesis result arrives.
    #[serde(default)]
    pub autoplay: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            autoplay: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadSettings {
    /// Folder for saved audio; the OS downloads folder when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

/// Errors that may occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to create the config directory.
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    /// No usable config directory found.
    #[error("No suitable config directory found")]
    NoConfigDir,
}
