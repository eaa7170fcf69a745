use dirs::home_dir;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const HOME_ENV: &str = "BUDGET_BUDDY_HOME";
const DEFAULT_DIR_NAME: &str = ".budget_buddy";
const STORE_DIR: &str = "store";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const OUTBOX_DIR: &str = "outbox";

/// Returns the application data directory, defaulting to `~/.budget_buddy`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Directory holding the key-value store files.
pub fn store_dir_in(base: &Path) -> PathBuf {
    base.join(STORE_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Default outbox for alert mails.
pub fn outbox_dir_in(base: &Path) -> PathBuf {
    base.join(OUTBOX_DIR)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
