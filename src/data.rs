//! Site metadata and blog post loading.
//! Reads `site.json` and `posts.json` from the data directory and returns the
//! posts sorted newest first.

use crate::constants::{POSTS_FILE, SITE_FILE};
use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Site-wide metadata. Extra keys are kept so fragments can reference them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Site {
    pub name: String,
    pub title: String,
    pub description: String,
    /// Canonical base URL, without trailing slash.
    pub url: String,
    pub author: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub date_formatted: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub category_label: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub image_alt: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub share_hook: Option<String>,
}

impl Post {
    /// Parses `date` as `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub fn parsed_date(&self) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .or_else(|_| DateTime::parse_from_rfc3339(&self.date).map(|dt| dt.date_naive()))
            .map_err(|_| Error::InvalidDate {
                slug: self.slug.clone(),
                date: self.date.clone(),
            })
    }

    /// Display date for cards, e.g. `June 1, 2024`.
    ///
    /// Uses `dateFormatted` from the data file when present.
    pub fn display_date(&self) -> String {
        match (&self.date_formatted, self.parsed_date()) {
            (Some(formatted), _) => formatted.clone(),
            (None, Ok(date)) => date.format("%B %-d, %Y").to_string(),
            (None, Err(_)) => self.date.clone(),
        }
    }
}

/// Data loaded once per build.
#[derive(Debug, Clone)]
pub struct SiteData {
    pub site: Site,
    /// Sorted by date, newest first.
    pub posts: Vec<Post>,
}

impl SiteData {
    /// Looks up a post by slug. Slugs are unique after [`load_data`].
    pub fn post(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.slug == slug)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(Error::IoError)?;
    serde_json::from_str(&content).map_err(|source| Error::DataError {
        path: path.display().to_string(),
        source,
    })
}

/// Sorts posts newest first. Posts sharing a date keep their relative order.
///
/// # Errors
/// * `Error::InvalidDate` if any post date cannot be parsed
pub fn sort_posts(posts: Vec<Post>) -> Result<Vec<Post>> {
    let mut dated = posts
        .into_iter()
        .map(|post| -> Result<(NaiveDate, Post)> { Ok((post.parsed_date()?, post)) })
        .collect::<Result<Vec<_>>>()?;
    dated.sort_by(|(a, _), (b, _)| b.cmp(a));
    Ok(dated.into_iter().map(|(_, post)| post).collect())
}

fn ensure_unique_slugs(posts: &[Post]) -> Result<()> {
    let mut seen = HashSet::new();
    for post in posts {
        if !seen.insert(post.slug.as_str()) {
            return Err(Error::DuplicateSlug { slug: post.slug.clone() });
        }
    }
    Ok(())
}

/// Loads site metadata and posts from `data_dir`.
///
/// # Errors
/// * `Error::IoError` if either file cannot be read
/// * `Error::DataError` if either file is not valid for its record type
/// * `Error::InvalidDate` / `Error::DuplicateSlug` for inconsistent posts
pub fn load_data<P: AsRef<Path>>(data_dir: P) -> Result<SiteData> {
    let data_dir = data_dir.as_ref();
    debug!("Loading data from {}", data_dir.display());

    let site: Site = read_json(&data_dir.join(SITE_FILE))?;
    let posts: Vec<Post> = read_json(&data_dir.join(POSTS_FILE))?;

    ensure_unique_slugs(&posts)?;
    let posts = sort_posts(posts)?;

    Ok(SiteData { site, posts })
}
