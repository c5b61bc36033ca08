//! `key = value` property files.
//!
//! Grammar, one entry per line:
//! - leading/trailing whitespace around keys and values is trimmed
//! - `#` starts a comment, either on its own line or after a value
//! - a line with no `=` is skipped with a warning
//!
//! Keys are case-insensitive and stored lowercased.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    #[error("Failed to read property file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Walk `data`, calling `handler(key, value)` for every entry in order.
pub fn parse_propfile(data: &str, handler: &mut dyn FnMut(&str, &str)) {
    for (lineno, raw) in data.lines().enumerate() {
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) => {
                let key = key.trim();
                if key.is_empty() {
                    log::warn!("propfile line {}: value without key", lineno + 1);
                    continue;
                }
                handler(key, value.trim());
            }
            None => log::warn!("propfile line {}: key without value", lineno + 1),
        }
    }
}

/// Parsed property file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFile {
    entries: BTreeMap<String, String>,
}

impl PropertyFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_string(content: &str) -> Self {
        let mut props = Self::new();
        parse_propfile(content, &mut |key, value| props.set(key, value));
        props
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PropertyError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PropertyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_string(&content))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Later entries win.
    pub fn set(&mut self, key: &str, value: &str) {
        self.entries
            .insert(key.to_ascii_lowercase(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
