//! sitepatch assembles a static site in place.
//! It expands reusable HTML fragments against per-page data and rewrites the
//! marker-delimited regions of every page, regenerating the blog index along
//! the way.

/// Blog index generation: featured post, post cards and category palettes
pub mod blog;

/// Build orchestration over the whole site tree
pub mod builder;

/// Command-line interface module for the sitepatch application
pub mod cli;

/// Optional build settings
/// Supports JSON and YAML formats (sitepatch.json, sitepatch.yml, sitepatch.yaml)
pub mod config;

/// Fixed source layout and marker vocabulary
pub mod constants;

/// Per-page context derived from the page path and post data
pub mod context;

/// Site metadata and blog post loading
pub mod data;

/// Error types and handling for the sitepatch application
pub mod error;

/// Reusable HTML fragment loading
pub mod fragments;

/// Logger initialisation
pub mod logger;

/// Marker-based, idempotent page patching
pub mod patcher;

/// Fragment placeholder expansion
pub mod renderer;
