use std::fs;
use std::path::Path;

use serde_json::json;
use sitepatch::builder::{build, BuildSummary, Builder, FileStatus};
use sitepatch::error::Error;
use sitepatch::renderer::PlaceholderRenderer;
use tempfile::TempDir;
use walkdir::WalkDir;

const NAV: &str = r#"<nav><a href="{{basePath}}index.html">{{site.name}}</a>{{#if isBlog}} <a href="{{basePath}}blog/">Blog</a>{{/if}}</nav>"#;
const FOOTER_LINKS: &str = "<button id=\"cookie-settings-btn\">Cookie settings</button>\n";
const COOKIE: &str = "<div id=\"cookie-consent\">We use cookies.</div>\n";
const SCRIPTS: &str = "<script src=\"{{basePath}}js/site.js\"></script>\n<meta name=\"og:type\" content=\"{{ogType}}\">\n<meta name=\"og:image\" content=\"{{ogImage}}\">";

const PAGE: &str = "<html>\n<head><title>Page</title></head>\n<body>\n<!-- SITE_NAV -->\n<!-- /SITE_NAV -->\n<main></main>\n  <footer>\n    <div>&copy; Lee</div>\n  </footer>\n</body>\n</html>\n";

const BLOG_INDEX: &str = r#"<html>
<body>
<!-- SITE_NAV -->
<!-- /SITE_NAV -->
<main>
      <!-- Featured Post -->
      <div class="mb-16">
        <article>placeholder</article>
      </div>
      <div id="posts-grid" class="grid gap-8">
      </div>
      <!-- Empty State -->
</main>
</body>
</html>
"#;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

fn posts() -> serde_json::Value {
    json!([
        {
            "slug": "older-post", "title": "Older Post", "date": "2024-01-01",
            "category": "fitness", "categoryLabel": "Fitness", "excerpt": "Old",
            "description": "An older post", "image": "https://img.example/a.jpg?w=600&h=400",
            "imageAlt": "A"
        },
        {
            "slug": "my-slug", "title": "Newest Post", "date": "2024-06-01",
            "category": "tech", "categoryLabel": "Tech", "excerpt": "New",
            "description": "The newest post", "image": "https://img.example/b.jpg?w=600&h=400",
            "imageAlt": "B", "shareHook": "Worth it"
        },
        {
            "slug": "a-review", "title": "A Review", "date": "2023-12-01",
            "category": "gardening", "categoryLabel": "Book Review", "excerpt": "Read",
            "description": "A review", "image": "https://img.example/c.jpg?w=600",
            "imageAlt": "C"
        }
    ])
}

fn site_fixture() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write(
        root,
        "_src/_data/site.json",
        &json!({
            "name": "Lee",
            "title": "Lee | Home",
            "description": "Personal site",
            "url": "https://lee.example",
            "author": "Lee F"
        })
        .to_string(),
    );
    write(root, "_src/_data/posts.json", &posts().to_string());
    write(root, "_src/_includes/nav.html", NAV);
    write(root, "_src/_includes/footer-links.html", FOOTER_LINKS);
    write(root, "_src/_includes/cookie-consent.html", COOKIE);
    write(root, "_src/_includes/scripts.html", SCRIPTS);
    write(root, "_src/_includes/partial.html", PAGE);

    write(root, "index.html", PAGE);
    write(root, "blog/index.html", BLOG_INDEX);
    write(root, "blog/posts/my-slug.html", PAGE);
    write(root, "blog/posts/unknown-slug.html", PAGE);
    write(root, "ventures/x/y.html", PAGE);
    write(root, ".cache/stale.html", PAGE);
    write(root, "notes.txt", "not a page");

    temp_dir
}

fn copy_tree(from: &Path, to: &Path) {
    for entry in WalkDir::new(from) {
        let entry = entry.unwrap();
        let target = to.join(entry.path().strip_prefix(from).unwrap());
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).unwrap();
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

#[test_log::test]
fn test_html_files_skip_private_directories() {
    let site = site_fixture();
    let renderer = PlaceholderRenderer::new();
    let builder = Builder::new(site.path(), &renderer).unwrap();

    assert_eq!(
        builder.html_files().unwrap(),
        [
            "blog/index.html",
            "blog/posts/my-slug.html",
            "blog/posts/unknown-slug.html",
            "index.html",
            "ventures/x/y.html",
        ]
    );
}

#[test_log::test]
fn test_build_patches_every_page() {
    let site = site_fixture();
    let root = site.path();
    let renderer = PlaceholderRenderer::new();

    let summary = build(root, &renderer).unwrap();
    assert_eq!(summary, BuildSummary { updated: 5, unchanged: 0, skipped: 0 });

    let home = read(root, "index.html");
    assert!(home.contains(
        "<!-- SITE_NAV -->\n<nav><a href=\"index.html\">Lee</a></nav>\n<!-- /SITE_NAV -->"
    ));
    assert!(home.contains(
        "    <div>&copy; Lee</div>\n    <button id=\"cookie-settings-btn\">Cookie settings</button>\n  </footer>"
    ));
    assert!(home.contains(
        "<!-- COOKIE_CONSENT -->\n<div id=\"cookie-consent\">We use cookies.</div>\n<!-- /COOKIE_CONSENT -->"
    ));
    assert!(home.contains("<script src=\"js/site.js\"></script>"));
    assert!(home.contains("content=\"https://lee.example/headshot.png\""));
    assert!(home.ends_with("<!-- /SHARED_SCRIPTS -->\n</body>\n</html>\n"));

    let post = read(root, "blog/posts/my-slug.html");
    assert!(post.contains("<a href=\"../../blog/\">Blog</a>"));
    assert!(post.contains("<meta name=\"og:type\" content=\"article\">"));
    assert!(post.contains("content=\"https://img.example/b.jpg?w=1200&h=630\""));

    let unknown = read(root, "blog/posts/unknown-slug.html");
    assert!(unknown.contains("<meta name=\"og:type\" content=\"website\">"));
    assert!(!unknown.contains(">Blog</a>"));

    let venture = read(root, "ventures/x/y.html");
    assert!(venture.contains("<script src=\"../../js/site.js\"></script>"));

    assert_eq!(read(root, "_src/_includes/partial.html"), PAGE);
    assert_eq!(read(root, ".cache/stale.html"), PAGE);
}

#[test_log::test]
fn test_blog_index_is_generated() {
    let site = site_fixture();
    let root = site.path();
    build(root, &PlaceholderRenderer::new()).unwrap();

    let index = read(root, "blog/index.html");
    assert!(!index.contains("placeholder"));

    let featured = index.find("<!-- Featured Post -->").unwrap();
    let grid = index.find("<div id=\"posts-grid\"").unwrap();
    assert!(featured < grid);
    assert!(index[featured..grid].contains("href=\"posts/my-slug\""));
    assert!(index[featured..grid].contains("https://img.example/b.jpg?w=800&h=400"));

    let cards = &index[grid..];
    let older = cards.find("<!-- Post: Older Post -->").unwrap();
    let review = cards.find("<!-- Post: A Review -->").unwrap();
    assert!(older < review);
    assert!(cards.contains("<!-- Post: Newest Post -->"));
    assert!(cards.contains("data-category=\"gardening\""));
    assert!(cards.contains("bg-purple-100"));
}

#[test_log::test]
fn test_second_build_is_byte_identical() {
    let site = site_fixture();
    let renderer = PlaceholderRenderer::new();
    build(site.path(), &renderer).unwrap();

    let snapshot = TempDir::new().unwrap();
    copy_tree(site.path(), snapshot.path());

    let summary = build(site.path(), &renderer).unwrap();
    assert_eq!(summary, BuildSummary { updated: 0, unchanged: 5, skipped: 0 });
    assert!(!dir_diff::is_different(site.path(), snapshot.path()).unwrap());
}

#[test_log::test]
fn test_missing_page_is_skipped() {
    let site = site_fixture();
    let renderer = PlaceholderRenderer::new();
    let builder = Builder::new(site.path(), &renderer).unwrap();

    assert_eq!(builder.process_file("gone.html").unwrap(), FileStatus::NotFound);
}

#[test_log::test]
fn test_exclude_patterns() {
    let site = site_fixture();
    write(site.path(), "_src/sitepatch.yml", "exclude:\n  - \"ventures/**\"\n");
    let renderer = PlaceholderRenderer::new();

    let summary = build(site.path(), &renderer).unwrap();
    assert_eq!(summary.updated, 4);
    assert_eq!(read(site.path(), "ventures/x/y.html"), PAGE);
}

#[test_log::test]
fn test_malformed_posts_abort_the_build() {
    let site = site_fixture();
    write(site.path(), "_src/_data/posts.json", "[{\"slug\": ");
    let renderer = PlaceholderRenderer::new();

    let err = build(site.path(), &renderer).unwrap_err();
    assert!(matches!(err, Error::DataError { .. }));
    assert_eq!(read(site.path(), "index.html"), PAGE);
}

#[test_log::test]
fn test_duplicate_slugs_abort_the_build() {
    let site = site_fixture();
    let mut posts = posts();
    let duplicate = posts[0].clone();
    posts.as_array_mut().unwrap().push(duplicate);
    write(site.path(), "_src/_data/posts.json", &posts.to_string());

    let err = build(site.path(), &PlaceholderRenderer::new()).unwrap_err();
    assert!(matches!(err, Error::DuplicateSlug { ref slug } if slug == "older-post"));
}

#[test_log::test]
fn test_empty_post_collection_still_patches_pages() {
    let site = site_fixture();
    write(site.path(), "_src/_data/posts.json", "[]");

    let summary = build(site.path(), &PlaceholderRenderer::new()).unwrap();
    assert_eq!(summary.updated, 5);
    assert!(read(site.path(), "blog/index.html").contains("placeholder"));
}

#[test_log::test]
fn test_non_utf8_page_is_skipped() {
    let site = site_fixture();
    let root = site.path();
    fs::write(root.join("legacy.html"), [0x3c, 0x70, 0xff, 0xfe, 0x3e]).unwrap();

    let summary = build(root, &PlaceholderRenderer::new()).unwrap();
    assert_eq!(summary, BuildSummary { updated: 5, unchanged: 0, skipped: 1 });
    assert_eq!(fs::read(root.join("legacy.html")).unwrap(), [0x3c, 0x70, 0xff, 0xfe, 0x3e]);
    assert!(read(root, "index.html").contains("<nav><a href=\"index.html\">Lee</a></nav>"));
    assert_eq!(FileStatus::Unreadable.to_string(), "Skipped (unreadable)");
}
