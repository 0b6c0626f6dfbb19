//! Common constants used throughout sitepatch.

/// Directory holding data, includes and build settings. Never patched.
pub const SRC_DIR: &str = "_src";

/// Data directory, relative to [`SRC_DIR`].
pub const DATA_DIR: &str = "_data";

/// Fragment directory, relative to [`SRC_DIR`].
pub const INCLUDES_DIR: &str = "_includes";

pub const SITE_FILE: &str = "site.json";
pub const POSTS_FILE: &str = "posts.json";

/// Supported configuration file names, looked up inside [`SRC_DIR`].
pub const CONFIG_FILES: [&str; 3] = ["sitepatch.json", "sitepatch.yml", "sitepatch.yaml"];

/// Extension of fragments and of the pages that get patched.
pub const HTML_EXTENSION: &str = "html";

/// Page that receives the generated featured post and card grid.
pub const BLOG_INDEX_PATH: &str = "blog/index.html";

/// Marker comments owned by the build.
pub mod markers {
    pub const NAV_BEGIN: &str = "<!-- SITE_NAV -->";
    pub const NAV_END: &str = "<!-- /SITE_NAV -->";
    pub const COOKIE_BEGIN: &str = "<!-- COOKIE_CONSENT -->";
    pub const COOKIE_END: &str = "<!-- /COOKIE_CONSENT -->";
    pub const SCRIPTS_BEGIN: &str = "<!-- SHARED_SCRIPTS -->";
    pub const SCRIPTS_END: &str = "<!-- /SHARED_SCRIPTS -->";

    /// Present once the footer legal links have been inserted.
    pub const FOOTER_LINKS_ID: &str = r#"id="cookie-settings-btn""#;

    /// Present once a cookie-consent banner exists in the page.
    pub const COOKIE_CONSENT_ID: &str = r#"id="cookie-consent""#;
}

/// Fragment names consumed by the patcher.
pub mod fragments {
    pub const NAV: &str = "nav";
    pub const FOOTER_LINKS: &str = "footer-links";
    pub const COOKIE_CONSENT: &str = "cookie-consent";
    pub const SCRIPTS: &str = "scripts";
}
