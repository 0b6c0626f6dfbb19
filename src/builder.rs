//! Build orchestration.
//! Loads data, fragments and settings once, then walks the site tree and
//! patches every page in place, one file at a time.

use crate::blog::{apply_blog_index, BlogIndex};
use crate::config::{get_config, Config};
use crate::constants::{
    fragments as names, markers, BLOG_INDEX_PATH, DATA_DIR, HTML_EXTENSION, INCLUDES_DIR, SRC_DIR,
};
use crate::context::{page_config, PageContext, PageKind, PostLookup};
use crate::data::{load_data, SiteData};
use crate::error::{Error, Result};
use crate::fragments::{load_fragments, Fragments};
use crate::patcher::{patch, ExpandedFragments};
use crate::renderer::TemplateRenderer;
use globset::GlobSet;
use log::{debug, error, warn};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// What happened to a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Content changed and was written back.
    Updated,
    /// Patching produced identical content; nothing was written.
    Unchanged,
    /// The page disappeared between the walk and the read.
    NotFound,
    /// The page is not valid UTF-8 and was left untouched.
    Unreadable,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Updated => f.write_str("Updated"),
            FileStatus::Unchanged => f.write_str("Skipped (unchanged)"),
            FileStatus::NotFound => f.write_str("Skipped (not found)"),
            FileStatus::Unreadable => f.write_str("Skipped (unreadable)"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

impl BuildSummary {
    fn record(&mut self, status: FileStatus) {
        match status {
            FileStatus::Updated => self.updated += 1,
            FileStatus::Unchanged => self.unchanged += 1,
            FileStatus::NotFound | FileStatus::Unreadable => self.skipped += 1,
        }
    }
}

/// Everything a build run needs, loaded once.
pub struct Builder<'a> {
    root: PathBuf,
    data: SiteData,
    fragments: Fragments,
    config: Config,
    exclude: GlobSet,
    renderer: &'a dyn TemplateRenderer,
    blog_index: Option<BlogIndex>,
}

impl<'a> Builder<'a> {
    /// Loads settings, data and fragments for the site at `root`.
    ///
    /// # Errors
    /// * Any data, fragment or configuration loading error; all of them are fatal
    pub fn new<P: AsRef<Path>>(root: P, renderer: &'a dyn TemplateRenderer) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let src_dir = root.join(SRC_DIR);

        let config = get_config(&src_dir)?;
        let exclude = config.exclude_set()?;
        let data = load_data(src_dir.join(DATA_DIR))?;
        let fragments = load_fragments(src_dir.join(INCLUDES_DIR))?;

        println!("Loaded {} fragments", fragments.len());
        println!("Loaded {} blog posts", data.posts.len());

        let footer_links = fragments.get(names::FOOTER_LINKS);
        if !footer_links.trim().is_empty() && !footer_links.contains(markers::FOOTER_LINKS_ID) {
            warn!(
                "Fragment '{}' lacks {}; footer links will be inserted on every run",
                names::FOOTER_LINKS,
                markers::FOOTER_LINKS_ID
            );
        }

        let blog_index = match BlogIndex::generate(&data.posts) {
            Ok(index) => Some(index),
            Err(e) => {
                error!("{e} The blog index keeps its current posts.");
                None
            }
        };

        Ok(Self { root, data, fragments, config, exclude, renderer, blog_index })
    }

    /// Site-relative, `/`-separated path of `entry`, if it is a page to patch.
    fn page_path(&self, entry: &DirEntry) -> Option<String> {
        if !entry.file_type().is_file()
            || entry.path().extension().and_then(|e| e.to_str()) != Some(HTML_EXTENSION)
        {
            return None;
        }
        let relative = entry.path().strip_prefix(&self.root).ok()?;
        let segments = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>();
        let Some(segments) = segments else {
            warn!("Skipping non UTF-8 path {}", entry.path().display());
            return None;
        };
        let rel_path = segments.join("/");
        if self.exclude.is_match(&rel_path) {
            debug!("Skipping {} from exclude patterns", rel_path);
            return None;
        }
        Some(rel_path)
    }

    /// Collects the pages to patch, sorted by path.
    ///
    /// Directories whose name starts with `_` or `.` are not descended into,
    /// which keeps the sources directory out of the build.
    pub fn html_files(&self) -> Result<Vec<String>> {
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_private_dir(e));

        let mut pages = Vec::new();
        for entry in walker {
            let entry = entry.map_err(Error::WalkError)?;
            if let Some(rel_path) = self.page_path(&entry) {
                pages.push(rel_path);
            }
        }
        Ok(pages)
    }

    /// Patches one page and writes it back if its content changed.
    ///
    /// The new content is fully computed before the single write, so a failure
    /// leaves the page as it was.
    pub fn process_file(&self, rel_path: &str) -> Result<FileStatus> {
        let path = self.root.join(rel_path);
        let page = page_config(rel_path, &self.data, &self.config);
        if page.kind() == PageKind::Post(PostLookup::NotFound) {
            debug!("No post matches {}, using site defaults", rel_path);
        }
        let context = PageContext::new(&self.data.site, page, &self.config).to_value();

        let source = match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(FileStatus::NotFound),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Skipping {}: {}", rel_path, e);
                return Ok(FileStatus::Unreadable);
            }
            Err(e) => return Err(Error::IoError(e)),
        };

        let fragments = ExpandedFragments::expand(&self.fragments, self.renderer, &context);
        let mut content = patch(&source, &fragments).content;

        if rel_path == BLOG_INDEX_PATH {
            if let Some(index) = &self.blog_index {
                let (updated, report) = apply_blog_index(&content, index);
                debug!("featured post: {}, posts grid: {}", report.featured, report.grid);
                content = updated;
            }
        }

        if content == source {
            return Ok(FileStatus::Unchanged);
        }
        std::fs::write(&path, content).map_err(Error::IoError)?;
        Ok(FileStatus::Updated)
    }

    /// Patches every page under the root.
    pub fn run(&self) -> Result<BuildSummary> {
        let pages = self.html_files()?;
        println!("\nProcessing {} HTML files...", pages.len());

        if !pages.iter().any(|p| p == BLOG_INDEX_PATH) {
            println!("Blog index not found, skipping dynamic update");
        }

        let mut summary = BuildSummary::default();
        for rel_path in &pages {
            let status = self.process_file(rel_path)?;
            println!("  {}: {}", status, rel_path);
            summary.record(status);
        }
        Ok(summary)
    }
}

fn is_private_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry.file_name().to_str().is_some_and(|n| n.starts_with('_') || n.starts_with('.'))
}

/// Builds the site rooted at `root`.
pub fn build<P: AsRef<Path>>(root: P, renderer: &dyn TemplateRenderer) -> Result<BuildSummary> {
    println!("Building site...\n");
    let summary = Builder::new(root, renderer)?.run()?;
    println!(
        "\nBuild complete! {} updated, {} unchanged, {} skipped.",
        summary.updated, summary.unchanged, summary.skipped
    );
    Ok(summary)
}
