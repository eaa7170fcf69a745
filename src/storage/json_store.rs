use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tracing::debug;

use super::{KeyValueStore, Result};
use crate::utils::paths::ensure_dir;

const VALUE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Directory-backed store writing one pretty-printed JSON file per key.
///
/// Writes go to a sibling temp file that is then renamed over the target, so
/// an interrupted save leaves the previous value in place.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn value_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_key(key), VALUE_EXTENSION))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.value_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let path = self.value_path(key);
        let json = serde_json::to_string_pretty(value)?;
        let tmp = tmp_path(&path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        debug!(key, path = %path.display(), "stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.value_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "value".into()
    } else {
        sanitized
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

fn write_file(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
