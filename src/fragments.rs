//! Reusable HTML fragment loading.

use crate::constants::HTML_EXTENSION;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use std::path::Path;

/// Fragment name (file stem) to raw markup, ordered by name.
#[derive(Debug, Clone, Default)]
pub struct Fragments {
    entries: IndexMap<String, String>,
}

impl Fragments {
    pub fn new(entries: IndexMap<String, String>) -> Self {
        Self { entries }
    }

    /// Returns the raw fragment text, or `""` for an unknown name.
    pub fn get(&self, name: &str) -> &str {
        self.entries.get(name).map(String::as_str).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Loads every `*.html` file directly inside `includes_dir`.
///
/// Subdirectories and other extensions are ignored.
pub fn load_fragments<P: AsRef<Path>>(includes_dir: P) -> Result<Fragments> {
    let includes_dir = includes_dir.as_ref();
    let mut entries = IndexMap::new();

    for entry in std::fs::read_dir(includes_dir).map_err(Error::IoError)? {
        let path = entry.map_err(Error::IoError)?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(HTML_EXTENSION) {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        debug!("Loading fragment '{}' from {}", name, path.display());
        let content = std::fs::read_to_string(&path).map_err(Error::IoError)?;
        entries.insert(name.to_string(), content);
    }

    entries.sort_keys();
    Ok(Fragments::new(entries))
}
