//! Blog index generation.
//! Builds the featured post block and the post-card grid from the sorted post
//! collection and splices both into the blog index page.

use crate::data::Post;
use crate::error::{Error, Result};
use crate::patcher::{Outcome, SkipReason};
use log::{debug, warn};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static WIDTH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"w=\d+").unwrap());

static FEATURED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!-- Featured Post -->.*?</article>\s*</div>").unwrap());

static GRID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)(<div id="posts-grid"[^>]*>).*?(</div>\s*<!-- Empty State)"#).unwrap()
});

/// Category label that switches a post to the review palette.
pub const REVIEW_LABEL: &str = "Book Review";

/// Category used when a post's category has no palette.
pub const DEFAULT_CATEGORY: &str = "business";

/// Tailwind color tokens used for a category badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: &'static str,
    pub text_light: &'static str,
    pub text_dark: &'static str,
    pub text: &'static str,
    pub text_dark_mode: &'static str,
}

impl Palette {
    const fn of(
        bg: &'static str,
        text_light: &'static str,
        text_dark: &'static str,
        text: &'static str,
        text_dark_mode: &'static str,
    ) -> Self {
        Self { bg, text_light, text_dark, text, text_dark_mode }
    }
}

const GOLD: Palette = Palette::of("gold", "gold-100", "gold-500/20", "gold-700", "gold-400");
const BLUE: Palette = Palette::of("blue", "blue-100", "blue-500/20", "blue-700", "blue-400");
const GREEN: Palette = Palette::of("green", "green-100", "green-500/20", "green-700", "green-400");

/// Palette forced on any post labelled [`REVIEW_LABEL`].
pub const REVIEW_PALETTE: Palette =
    Palette::of("purple", "purple-100", "purple-500/20", "purple-700", "purple-400");

const CATEGORY_PALETTES: [(&str, Palette); 4] =
    [("business", GOLD), ("tech", BLUE), ("fitness", GREEN), ("habits", GREEN)];

fn category_palette(category: &str) -> Option<Palette> {
    CATEGORY_PALETTES
        .iter()
        .find(|(key, _)| *key == category)
        .map(|(_, palette)| *palette)
}

/// Resolves the badge palette for `post`.
///
/// The review label wins over the category; unknown categories fall back to
/// [`DEFAULT_CATEGORY`].
pub fn palette_for(post: &Post) -> Palette {
    if post.category_label == REVIEW_LABEL {
        return REVIEW_PALETTE;
    }
    category_palette(&post.category)
        .or_else(|| category_palette(DEFAULT_CATEGORY))
        .unwrap_or(GOLD)
}

/// Index of the featured post: the first flagged one, otherwise the newest.
///
/// # Errors
/// * `Error::NoPosts` when `posts` is empty
pub fn featured_index(posts: &[Post]) -> Result<usize> {
    if posts.is_empty() {
        return Err(Error::NoPosts);
    }
    let flagged: Vec<usize> = posts
        .iter()
        .enumerate()
        .filter(|(_, post)| post.featured)
        .map(|(i, _)| i)
        .collect();
    if flagged.len() > 1 {
        warn!(
            "{} posts are flagged as featured, using '{}'",
            flagged.len(),
            posts[flagged[0]].slug
        );
    }
    Ok(flagged.first().copied().unwrap_or(0))
}

fn badge(palette: &Palette, label: &str) -> String {
    format!(
        r#"<span class="bg-{} dark:bg-{} text-{} dark:text-{} text-xs font-semibold px-3 py-1 rounded-full">{}</span>"#,
        palette.text_light, palette.text_dark, palette.text, palette.text_dark_mode, label
    )
}

/// Card markup for one grid entry.
pub fn post_card(post: &Post) -> String {
    format!(
        r#"
        <!-- Post: {title} -->
        <article class="card-hover bg-white dark:bg-navy-900 rounded-2xl overflow-hidden shadow-lg border border-gray-100 dark:border-white/10" data-category="{category}">
          <div class="h-48 relative overflow-hidden">
            <img src="{image}" alt="{alt}" class="w-full h-full object-cover" loading="lazy">
            <div class="absolute inset-0 bg-gradient-to-t from-black/60 to-transparent"></div>
          </div>
          <div class="p-6">
            <div class="flex items-center gap-3 mb-3">
              {badge}
              <span class="text-gray-500 dark:text-gray-400 text-sm">{date}</span>
            </div>
            <h3 class="text-xl font-bold text-navy-900 dark:text-white mb-2">
              <a href="posts/{slug}" class="hover:text-gold-600 dark:hover:text-gold-400 transition">{title}</a>
            </h3>
            <p class="text-gray-600 dark:text-gray-300 text-sm line-clamp-2 mb-4">
              {excerpt}
            </p>
            <a href="posts/{slug}" class="text-gold-600 dark:text-gold-400 font-semibold text-sm hover:underline">Read more &rarr;</a>
          </div>
        </article>"#,
        title = post.title,
        category = post.category,
        image = post.image,
        alt = post.image_alt,
        badge = badge(&palette_for(post), &post.category_label),
        date = post.display_date(),
        slug = post.slug,
        excerpt = post.excerpt,
    )
}

/// Featured block markup. Requests a wider image than the cards.
pub fn featured_block(post: &Post) -> String {
    format!(
        r#"<!-- Featured Post -->
      <div class="mb-16">
        <h2 class="text-sm font-semibold text-gold-600 dark:text-gold-400 uppercase tracking-wide mb-6">Featured</h2>
        <article class="card-hover bg-white dark:bg-navy-900 rounded-2xl overflow-hidden shadow-lg border border-gray-100 dark:border-white/10" data-category="{category}">
          <div class="md:flex">
            <div class="md:w-2/5 relative overflow-hidden">
              <img src="{image}" alt="{alt}" class="w-full h-full object-cover min-h-[250px]">
              <div class="absolute inset-0 bg-gradient-to-t from-navy-900/80 to-transparent"></div>
              <span class="absolute bottom-4 left-4 bg-gold-500 text-navy-900 text-xs font-bold px-3 py-1 rounded-full">FEATURED</span>
            </div>
            <div class="md:w-3/5 p-8">
              <div class="flex items-center gap-3 mb-4">
                {badge}
                <span class="text-gray-500 dark:text-gray-400 text-sm">{date}</span>
              </div>
              <h3 class="text-2xl font-bold text-navy-900 dark:text-white mb-3">
                <a href="posts/{slug}" class="hover:text-gold-600 dark:hover:text-gold-400 transition">{title}</a>
              </h3>
              <p class="text-gray-600 dark:text-gray-300 mb-4 line-clamp-3">
                {excerpt}
              </p>
              <a href="posts/{slug}" class="inline-flex items-center text-gold-600 dark:text-gold-400 font-semibold hover:gap-3 gap-2 transition-all">
                Read Article <span>&rarr;</span>
              </a>
            </div>
          </div>
        </article>
      </div>"#,
        category = post.category,
        image = WIDTH_RE.replace(&post.image, "w=800"),
        alt = post.image_alt,
        badge = badge(&palette_for(post), &post.category_label),
        date = post.display_date(),
        slug = post.slug,
        title = post.title,
        excerpt = post.excerpt,
    )
}

/// Generated blog index markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogIndex {
    pub featured_slug: String,
    pub featured_html: String,
    pub cards_html: String,
}

impl BlogIndex {
    /// Generates the featured block and a card for every post not flagged as
    /// featured, keeping the newest-first order of `posts`.
    ///
    /// A fallback featured post (nothing flagged) still gets its card.
    ///
    /// # Errors
    /// * `Error::NoPosts` when `posts` is empty
    pub fn generate(posts: &[Post]) -> Result<Self> {
        let featured = featured_index(posts)?;
        let cards: Vec<String> =
            posts.iter().filter(|post| !post.featured).map(post_card).collect();

        debug!("Featuring '{}' with {} cards", posts[featured].slug, cards.len());
        let cards_html = cards.join("\n");
        Ok(Self {
            featured_slug: posts[featured].slug.clone(),
            featured_html: featured_block(&posts[featured]),
            cards_html,
        })
    }
}

/// How the two blog index regions were handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlogIndexReport {
    pub featured: Outcome,
    pub grid: Outcome,
}

/// Replaces the featured block and the posts grid interior in `content`.
///
/// Both regions are recognised by the markup this module generates, so the
/// rewrite is idempotent.
pub fn apply_blog_index(content: &str, index: &BlogIndex) -> (String, BlogIndexReport) {
    let (content, featured) = if FEATURED_RE.is_match(content) {
        let replaced = FEATURED_RE.replace(content, regex::NoExpand(&index.featured_html));
        (replaced.into_owned(), Outcome::Applied)
    } else {
        (content.to_string(), Outcome::Skipped(SkipReason::MarkersAbsent))
    };

    let (content, grid) = if GRID_RE.is_match(&content) {
        let replaced = GRID_RE.replace(&content, |caps: &Captures| {
            format!("{}\n{}\n      {}", &caps[1], index.cards_html, &caps[2])
        });
        (replaced.into_owned(), Outcome::Applied)
    } else {
        (content, Outcome::Skipped(SkipReason::MarkersAbsent))
    };

    (content, BlogIndexReport { featured, grid })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::post;

    fn posts() -> Vec<Post> {
        vec![post("newest", "2024-06-01"), post("middle", "2024-01-01"), post("oldest", "2023-12-01")]
    }

    #[test]
    fn test_featured_falls_back_to_newest() {
        assert_eq!(featured_index(&posts()).unwrap(), 0);
    }

    #[test]
    fn test_flagged_post_is_featured() {
        let mut posts = posts();
        posts[2].featured = true;
        assert_eq!(featured_index(&posts).unwrap(), 2);
    }

    #[test]
    fn test_empty_collection_is_an_error() {
        assert!(matches!(featured_index(&[]), Err(Error::NoPosts)));
        assert!(matches!(BlogIndex::generate(&[]), Err(Error::NoPosts)));
    }

    #[test]
    fn test_palettes() {
        let mut p = post("a", "2024-01-01");
        assert_eq!(palette_for(&p), BLUE);

        p.category = "gardening".to_string();
        assert_eq!(palette_for(&p), GOLD);

        p.category = String::new();
        assert_eq!(palette_for(&p), GOLD);

        p.category = "fitness".to_string();
        p.category_label = REVIEW_LABEL.to_string();
        assert_eq!(palette_for(&p), REVIEW_PALETTE);
    }

    #[test]
    fn test_cards_skip_featured_and_keep_order() {
        let mut posts = posts();
        posts[1].featured = true;
        let index = BlogIndex::generate(&posts).unwrap();
        assert_eq!(index.featured_slug, "middle");
        assert!(index.featured_html.contains(r#"href="posts/middle""#));

        let newest = index.cards_html.find("<!-- Post: Title newest -->").unwrap();
        let oldest = index.cards_html.find("<!-- Post: Title oldest -->").unwrap();
        assert!(newest < oldest);
        assert!(!index.cards_html.contains("Title middle"));
        assert_eq!(index.cards_html.matches(r#"data-category="tech""#).count(), 2);
    }

    #[test]
    fn test_fallback_featured_post_keeps_its_card() {
        let index = BlogIndex::generate(&posts()).unwrap();
        assert_eq!(index.featured_slug, "newest");
        assert!(index.cards_html.contains("<!-- Post: Title newest -->"));
        assert_eq!(index.cards_html.matches("<!-- Post: ").count(), 3);
    }

    #[test]
    fn test_every_flagged_post_is_left_out_of_the_grid() {
        let mut posts = posts();
        posts[0].featured = true;
        posts[2].featured = true;
        let index = BlogIndex::generate(&posts).unwrap();
        assert_eq!(index.featured_slug, "newest");
        assert!(!index.cards_html.contains("Title newest"));
        assert!(!index.cards_html.contains("Title oldest"));
        assert_eq!(index.cards_html.matches("<!-- Post: ").count(), 1);
    }

    #[test]
    fn test_card_uses_review_palette() {
        let mut p = post("review", "2024-01-01");
        p.category_label = REVIEW_LABEL.to_string();
        let card = post_card(&p);
        assert!(card.contains("bg-purple-100 dark:bg-purple-500/20 text-purple-700 dark:text-purple-400"));
        assert!(card.contains(">Book Review</span>"));
        assert!(card.contains("January 1, 2024"));
    }

    #[test]
    fn test_featured_image_is_widened() {
        let html = featured_block(&post("a", "2024-01-01"));
        assert!(html.contains("https://img.example/photo?w=800&h=400"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(BlogIndex::generate(&posts()).unwrap(), BlogIndex::generate(&posts()).unwrap());
    }

    const PAGE: &str = r#"<main>
      <!-- Featured Post -->
      <div class="mb-16">
        <article>stale</article>
      </div>
      <div id="posts-grid" class="grid">
        <article><div>stale card</div></article>
      </div>
      <!-- Empty State -->
</main>"#;

    #[test]
    fn test_apply_blog_index_is_idempotent() {
        let index = BlogIndex::generate(&posts()).unwrap();
        let (once, report) = apply_blog_index(PAGE, &index);
        assert_eq!(report, BlogIndexReport { featured: Outcome::Applied, grid: Outcome::Applied });
        assert!(!once.contains("stale"));
        assert!(once.contains("Title middle"));

        let (twice, _) = apply_blog_index(&once, &index);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_apply_blog_index_without_regions() {
        let index = BlogIndex::generate(&posts()).unwrap();
        let (content, report) = apply_blog_index("<main></main>", &index);
        assert_eq!(content, "<main></main>");
        assert_eq!(report.featured, Outcome::Skipped(SkipReason::MarkersAbsent));
        assert_eq!(report.grid, Outcome::Skipped(SkipReason::MarkersAbsent));
    }
}
