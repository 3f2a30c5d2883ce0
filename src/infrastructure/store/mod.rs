pub mod config_store;
pub mod settings_store;

pub use config_store::{ConfigFile, ConfigStore};
pub use settings_store::SettingsStore;

use std::path::PathBuf;

/// Directory holding bulker's files inside the user's home
pub const BULKER_DIR: &str = ".bulker";

/// `~/.bulker/<file>`, or `./.bulker/<file>` when no home directory is known
pub fn default_path(file: &str) -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(BULKER_DIR)
        .join(file)
}
