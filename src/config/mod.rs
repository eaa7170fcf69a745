use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::currency::{AmountFormatter, DEFAULT_CURRENCY_SUFFIX};
use crate::errors::LedgerError;
use crate::utils::paths::{self, ensure_dir};

const TMP_SUFFIX: &str = "tmp";

/// Application-level preferences, separate from the user's budget settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub currency_symbol: String,
    pub first_weekday: Weekday,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbox_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SUFFIX.into(),
            first_weekday: Weekday::Sun,
            outbox_dir: None,
        }
    }
}

impl Config {
    pub fn formatter(&self) -> AmountFormatter {
        AmountFormatter::new(self.currency_symbol.clone())
    }
}

/// Loads and saves [`Config`] as JSON under the application data directory.
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&base)?;
        let path = paths::config_file_in(&base);
        Ok(Self { base, path })
    }

    pub fn load(&self) -> Result<Config, LedgerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    /// Configured outbox, or the default one under the data directory.
    pub fn outbox_dir(&self, config: &Config) -> PathBuf {
        config
            .outbox_dir
            .clone()
            .unwrap_or_else(|| paths::outbox_dir_in(&self.base))
    }

    pub fn store_dir(&self) -> PathBuf {
        paths::store_dir_in(&self.base)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), LedgerError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
