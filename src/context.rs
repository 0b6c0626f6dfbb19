//! Per-page context building.
//! Derives the page configuration from a file's path relative to the site root
//! and, for blog posts, from the matching post record.

use crate::config::Config;
use crate::data::{Post, Site, SiteData};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static WIDTH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"w=\d+").unwrap());
static HEIGHT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"h=\d+").unwrap());

/// Directories whose pages only get a namespaced canonical path.
const SECTION_DIRS: [&str; 3] = ["ventures", "experience", "profiles"];

/// What kind of page a path resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    Post(PostLookup),
    BlogHub,
    Section,
    Generic,
}

/// Outcome of resolving a blog post page against the post collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostLookup {
    Found,
    NotFound,
}

/// Page-specific overrides. Unset fields fall back to site-wide values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageConfig {
    pub kind: Option<PageKind>,
    pub base_path: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub canonical_path: Option<String>,
    pub og_type: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub is_blog: bool,
    pub article_author: Option<String>,
    pub article_date: Option<String>,
    pub share_hook: Option<String>,
}

impl PageConfig {
    pub fn kind(&self) -> PageKind {
        self.kind.unwrap_or(PageKind::Generic)
    }
}

/// Context record handed to the template renderer.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageContext<'a> {
    pub site: &'a Site,
    pub base_path: String,
    pub title: String,
    pub description: String,
    pub canonical_path: String,
    pub og_type: String,
    pub og_title: String,
    pub og_description: String,
    pub og_image: String,
    pub is_blog: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_hook: Option<String>,
}

impl<'a> PageContext<'a> {
    pub fn new(site: &'a Site, page: PageConfig, config: &Config) -> Self {
        let title = page.title.unwrap_or_else(|| site.title.clone());
        let description = page.description.unwrap_or_else(|| site.description.clone());
        Self {
            site,
            base_path: page.base_path,
            og_title: page.og_title.unwrap_or_else(|| title.clone()),
            og_description: page.og_description.unwrap_or_else(|| description.clone()),
            title,
            description,
            canonical_path: page.canonical_path.unwrap_or_else(|| "/".to_string()),
            og_type: page.og_type.unwrap_or_else(|| "website".to_string()),
            og_image: page
                .og_image
                .unwrap_or_else(|| format!("{}/{}", site.url, config.og_image)),
            is_blog: page.is_blog,
            article_author: page.article_author,
            article_date: page.article_date,
            share_hook: page.share_hook,
        }
    }

    /// Converts the context into the JSON value the renderer walks.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Number of directories between the site root and the file.
pub fn depth(rel_path: &str) -> usize {
    rel_path.split('/').filter(|s| !s.is_empty()).count().saturating_sub(1)
}

/// Relative prefix leading from the file back to the site root.
pub fn base_path(rel_path: &str) -> String {
    "../".repeat(depth(rel_path))
}

/// Requests a larger social-card image by rewriting the width/height tokens.
pub fn og_image_for(image: &str) -> String {
    let image = WIDTH_RE.replace(image, "w=1200");
    HEIGHT_RE.replace(&image, "h=630").into_owned()
}

fn file_name(rel_path: &str) -> &str {
    rel_path.rsplit('/').next().unwrap_or(rel_path)
}

fn file_stem(rel_path: &str) -> &str {
    let name = file_name(rel_path);
    name.strip_suffix(".html").unwrap_or(name)
}

fn post_config(page: PageConfig, site: &Site, post: &Post, slug: &str) -> PageConfig {
    // An empty description falls back to the site description.
    let description = Some(post.description.clone()).filter(|d| !d.is_empty());
    PageConfig {
        kind: Some(PageKind::Post(PostLookup::Found)),
        canonical_path: Some(format!("/blog/posts/{slug}.html")),
        title: Some(format!("{} | {}", post.title, site.name)),
        description: description.clone(),
        og_type: Some("article".to_string()),
        og_title: Some(post.title.clone()),
        og_description: description,
        og_image: Some(og_image_for(&post.image)),
        article_author: Some(site.author.clone()),
        article_date: Some(post.date.clone()),
        share_hook: post.share_hook.clone(),
        is_blog: true,
        ..page
    }
}

/// Derives the page configuration for `rel_path` (always `/`-separated).
///
/// The first matching rule wins: root index, blog post, blog hub, section
/// directories, then the generic fallback that only carries the base path.
pub fn page_config(rel_path: &str, data: &SiteData, config: &Config) -> PageConfig {
    let page = PageConfig { base_path: base_path(rel_path), ..PageConfig::default() };
    let site = &data.site;

    if rel_path == "index.html" {
        return PageConfig {
            kind: Some(PageKind::Home),
            canonical_path: Some("/".to_string()),
            title: Some(site.title.clone()),
            description: Some(site.description.clone()),
            ..page
        };
    }

    if rel_path.starts_with("blog/posts/") {
        let slug = file_stem(rel_path);
        return match data.post(slug) {
            Some(post) => post_config(page, site, post, slug),
            None => PageConfig { kind: Some(PageKind::Post(PostLookup::NotFound)), ..page },
        };
    }

    if rel_path.starts_with("blog/") {
        return PageConfig {
            kind: Some(PageKind::BlogHub),
            canonical_path: Some("/blog/".to_string()),
            title: Some(format!("Blog | {}", site.name)),
            description: Some(config.blog_description.clone()),
            is_blog: true,
            ..page
        };
    }

    for dir in SECTION_DIRS {
        if rel_path.strip_prefix(dir).is_some_and(|rest| rest.starts_with('/')) {
            return PageConfig {
                kind: Some(PageKind::Section),
                canonical_path: Some(format!("/{dir}/{}", file_name(rel_path))),
                ..page
            };
        }
    }

    page
}
