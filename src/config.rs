//! Build configuration handling.
//! Settings are optional and read from `_src/sitepatch.json`, `.yml` or `.yaml`;
//! a site without any of these files builds with the defaults.

use crate::constants::CONFIG_FILES;
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_BLOG_DESCRIPTION: &str =
    "Insights on leadership, technology, AI automation, fitness, and building sustainable habits.";

pub const DEFAULT_OG_IMAGE: &str = "headshot.png";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Description used for the blog hub pages.
    pub blog_description: String,
    /// Default Open Graph image, relative to the site URL.
    pub og_image: String,
    /// Glob patterns (relative to the site root) of pages left untouched.
    pub exclude: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blog_description: DEFAULT_BLOG_DESCRIPTION.to_string(),
            og_image: DEFAULT_OG_IMAGE.to_string(),
            exclude: Vec::new(),
        }
    }
}

impl Config {
    /// Compiles the `exclude` patterns.
    ///
    /// # Errors
    /// * `Error::GlobError` for an invalid pattern
    pub fn exclude_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            builder.add(Glob::new(pattern)?);
        }
        Ok(builder.build()?)
    }
}

/// Reads the first configuration file found in `src_dir`.
///
/// # Returns
/// * `Result<Option<String>>` - Raw contents, or `None` when no file exists
pub fn load_config<P: AsRef<Path>>(src_dir: P, config_files: &[&str]) -> Result<Option<String>> {
    for file in config_files {
        let config_path = src_dir.as_ref().join(file);
        if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            return std::fs::read_to_string(&config_path).map(Some).map_err(Error::IoError);
        }
    }
    debug!("No configuration file found (tried: {}), using defaults", config_files.join(", "));
    Ok(None)
}

/// Parses configuration content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither valid JSON nor valid YAML
pub fn parse_config(content: &str) -> Result<Config> {
    match serde_json::from_str(content) {
        Ok(config) => Ok(config),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {e}"))),
    }
}

/// Loads the build configuration for a site whose sources live in `src_dir`.
pub fn get_config<P: AsRef<Path>>(src_dir: P) -> Result<Config> {
    match load_config(src_dir, &CONFIG_FILES)? {
        Some(content) => parse_config(&content),
        None => Ok(Config::default()),
    }
}
