use std::{
    fs,
    path::{Path, PathBuf},
};

use super::{KeyValueStore, Result};
use crate::{
    errors::LedgerError,
    utils::{paths::CONFIG_FILE_STEM, persistence},
};

const FILE_EXTENSION: &str = "json";

/// Filesystem-backed store keeping each key in its own `<key>.json` file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `key` would land on a file the application keeps beside the
    /// store, such as `config.json`.
    pub fn is_reserved_key(key: &str) -> bool {
        canonical_key(key) == CONFIG_FILE_STEM
    }

    pub fn key_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_key(key), FILE_EXTENSION))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if Self::is_reserved_key(key) {
            return Err(LedgerError::Storage(format!("key `{key}` is reserved")));
        }
        persistence::write_atomic(&self.key_path(key), value)
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "store".into()
    } else {
        sanitized
    }
}
