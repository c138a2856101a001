//! Persisted settings stored as TOML in the `.yov` app directory.

mod defaults;
mod io;
mod types;

pub use io::{
    CONFIG_FILE_NAME, apply_env_overrides, apply_env_overrides_from, config_path, load_from,
    load_or_default, save, save_to_path,
};
pub use types::{
    API_URL_ENV, AppSettings, BackendSettings, ConfigError, DownloadSettings, PlaybackSettings,
    USER_ENV,
};
