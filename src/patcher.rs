//! In-place document patching.
//!
//! A page is tokenised once into opaque text and marker-delimited regions owned
//! by the build. Every patch step edits that model: region interiors are
//! replaced wholesale, and fallback insertions are spliced in as new regions so
//! the next run finds its markers and rewrites them instead of inserting again.

use crate::constants::{fragments as names, markers};
use crate::fragments::Fragments;
use crate::renderer::TemplateRenderer;
use log::debug;
use std::fmt;

const BODY_CLOSE: &str = "</body>";
const FOOTER_CLOSE: &str = "</footer>";

/// Build-owned regions of a page, each delimited by a marker comment pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Nav,
    CookieConsent,
    SharedScripts,
}

impl RegionKind {
    pub const ALL: [RegionKind; 3] =
        [RegionKind::Nav, RegionKind::CookieConsent, RegionKind::SharedScripts];

    /// Begin and end marker comments.
    pub fn markers(self) -> (&'static str, &'static str) {
        match self {
            RegionKind::Nav => (markers::NAV_BEGIN, markers::NAV_END),
            RegionKind::CookieConsent => (markers::COOKIE_BEGIN, markers::COOKIE_END),
            RegionKind::SharedScripts => (markers::SCRIPTS_BEGIN, markers::SCRIPTS_END),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Region { kind: RegionKind, body: String },
}

/// Which occurrence of an anchor tag an insertion targets.
#[derive(Debug, Clone, Copy)]
enum Occurrence {
    First,
    Last,
}

/// A page as an ordered sequence of text and build-owned regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    segments: Vec<Segment>,
}

impl Document {
    /// Splits `source` into text and regions.
    ///
    /// A begin marker without a matching end marker after it stays plain text.
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = source;

        loop {
            let next = RegionKind::ALL
                .iter()
                .filter_map(|&kind| {
                    let (begin, end) = kind.markers();
                    let start = rest.find(begin)?;
                    let body_start = start + begin.len();
                    let body_end = body_start + rest[body_start..].find(end)?;
                    Some((start, body_start, body_end, kind))
                })
                .min_by_key(|&(start, ..)| start);

            let Some((start, body_start, body_end, kind)) = next else {
                if !rest.is_empty() {
                    segments.push(Segment::Text(rest.to_string()));
                }
                break;
            };

            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }
            segments.push(Segment::Region { kind, body: rest[body_start..body_end].to_string() });
            rest = &rest[body_end + kind.markers().1.len()..];
        }

        Self { segments }
    }

    /// Serialises the document back to text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Region { kind, body } => {
                    let (begin, end) = kind.markers();
                    out.push_str(begin);
                    out.push_str(body);
                    out.push_str(end);
                }
            }
        }
        out
    }

    pub fn has_region(&self, kind: RegionKind) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Region { kind: k, .. } if *k == kind))
    }

    /// Interior of the first region of `kind`.
    pub fn region_body(&self, kind: RegionKind) -> Option<&str> {
        self.segments.iter().find_map(|s| match s {
            Segment::Region { kind: k, body } if *k == kind => Some(body.as_str()),
            _ => None,
        })
    }

    /// Whether `needle` occurs anywhere, regions included.
    pub fn contains(&self, needle: &str) -> bool {
        self.segments.iter().any(|s| match s {
            Segment::Text(text) => text.contains(needle),
            Segment::Region { body, .. } => body.contains(needle),
        })
    }

    /// Replaces the interior of every region of `kind`. Returns false if none exists.
    fn replace_region(&mut self, kind: RegionKind, new_body: &str) -> bool {
        let mut replaced = false;
        for segment in &mut self.segments {
            if let Segment::Region { kind: k, body } = segment {
                if *k == kind {
                    *body = new_body.to_string();
                    replaced = true;
                }
            }
        }
        replaced
    }

    /// Locates `anchor` in text segments only; region interiors are build-owned.
    fn find_anchor(&self, anchor: &str, occurrence: Occurrence) -> Option<(usize, usize)> {
        let mut hits = self.segments.iter().enumerate().filter_map(|(i, s)| match s {
            Segment::Text(text) => match occurrence {
                Occurrence::First => text.find(anchor),
                Occurrence::Last => text.rfind(anchor),
            }
            .map(|pos| (i, pos)),
            Segment::Region { .. } => None,
        });
        match occurrence {
            Occurrence::First => hits.next(),
            Occurrence::Last => hits.last(),
        }
    }

    fn text_at(&self, index: usize) -> &str {
        match &self.segments[index] {
            Segment::Text(text) => text,
            Segment::Region { body, .. } => body,
        }
    }

    /// Splits the text segment at `index` and places `inserted` at byte `pos`.
    fn splice(&mut self, index: usize, pos: usize, inserted: Vec<Segment>) {
        let text = match &self.segments[index] {
            Segment::Text(text) => text.clone(),
            Segment::Region { .. } => return,
        };
        let (before, after) = text.split_at(pos);
        let replacement = std::iter::once(Segment::Text(before.to_string()))
            .chain(inserted)
            .chain(std::iter::once(Segment::Text(after.to_string())))
            .filter(|s| !matches!(s, Segment::Text(t) if t.is_empty()));
        self.segments.splice(index..=index, replacement);
    }

    fn insert_before(
        &mut self,
        anchor: &str,
        occurrence: Occurrence,
        inserted: Vec<Segment>,
    ) -> bool {
        match self.find_anchor(anchor, occurrence) {
            Some((index, pos)) => {
                self.splice(index, pos, inserted);
                true
            }
            None => false,
        }
    }
}

/// Why a patch step left the document alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The marker pair the step owns is not in the page.
    MarkersAbsent,
    /// The page already carries the element this step would insert.
    AlreadyPatched,
    /// The closing tag the insertion is anchored to does not exist.
    AnchorMissing,
    /// The fragment expanded to nothing.
    EmptyFragment,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::MarkersAbsent => "markers absent",
            SkipReason::AlreadyPatched => "already patched",
            SkipReason::AnchorMissing => "anchor missing",
            SkipReason::EmptyFragment => "empty fragment",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Skipped(SkipReason),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Applied => f.write_str("applied"),
            Outcome::Skipped(reason) => write!(f, "skipped ({reason})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchReport {
    pub nav: Outcome,
    pub footer_links: Outcome,
    pub cookie_consent: Outcome,
    pub shared_scripts: Outcome,
}

/// Result of patching one page.
#[derive(Debug, Clone)]
pub struct Patched {
    pub content: String,
    pub report: PatchReport,
}

/// The fragments a page needs, expanded against that page's context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedFragments {
    pub nav: String,
    pub footer_links: String,
    pub cookie_consent: String,
    pub scripts: String,
}

impl ExpandedFragments {
    /// Expands every patched fragment. Missing fragments expand to `""`.
    pub fn expand(
        fragments: &Fragments,
        renderer: &dyn TemplateRenderer,
        context: &serde_json::Value,
    ) -> Self {
        let render = |name: &str| renderer.render(fragments.get(name), context);
        Self {
            nav: render(names::NAV),
            footer_links: render(names::FOOTER_LINKS),
            cookie_consent: render(names::COOKIE_CONSENT),
            scripts: render(names::SCRIPTS),
        }
    }
}

fn patch_nav(doc: &mut Document, nav: &str) -> Outcome {
    if doc.replace_region(RegionKind::Nav, &format!("\n{nav}\n")) {
        Outcome::Applied
    } else {
        Outcome::Skipped(SkipReason::MarkersAbsent)
    }
}

fn patch_footer_links(doc: &mut Document, links: &str) -> Outcome {
    let Some((index, pos)) = doc.find_anchor(FOOTER_CLOSE, Occurrence::First) else {
        return Outcome::Skipped(SkipReason::AnchorMissing);
    };
    if doc.contains(markers::FOOTER_LINKS_ID) {
        return Outcome::Skipped(SkipReason::AlreadyPatched);
    }
    let links = links.trim();
    if links.is_empty() {
        return Outcome::Skipped(SkipReason::EmptyFragment);
    }

    let text = doc.text_at(index);
    let line_start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
    let line = &text[line_start..pos];
    let indent: String = line.chars().take_while(|c| *c == ' ' || *c == '\t').collect();

    let (at, inserted) = if indent.len() == line.len() {
        // Tag starts its own line: add the links as the line above it.
        (line_start, format!("{indent}  {links}\n"))
    } else {
        (pos, format!("\n{indent}  {links}\n{indent}"))
    };
    doc.splice(index, at, vec![Segment::Text(inserted)]);
    Outcome::Applied
}

/// Region interior for the cookie banner. A fragment that already carries the
/// marker pair contributes only its interior.
fn cookie_body(fragment: &str) -> String {
    let (begin, end) = RegionKind::CookieConsent.markers();
    let trimmed = fragment.trim();
    let inner = trimmed
        .strip_prefix(begin)
        .and_then(|rest| rest.strip_suffix(end))
        .map_or(trimmed, str::trim);
    format!("\n{inner}\n")
}

fn patch_cookie_consent(doc: &mut Document, banner: &str) -> Outcome {
    let body = cookie_body(banner);
    if doc.replace_region(RegionKind::CookieConsent, &body) {
        return Outcome::Applied;
    }
    if doc.contains(markers::COOKIE_CONSENT_ID) {
        return Outcome::Skipped(SkipReason::AlreadyPatched);
    }
    if banner.trim().is_empty() {
        return Outcome::Skipped(SkipReason::EmptyFragment);
    }
    let inserted = vec![
        Segment::Region { kind: RegionKind::CookieConsent, body },
        Segment::Text("\n".to_string()),
    ];
    if doc.insert_before(BODY_CLOSE, Occurrence::First, inserted) {
        Outcome::Applied
    } else {
        Outcome::Skipped(SkipReason::AnchorMissing)
    }
}

fn patch_shared_scripts(doc: &mut Document, scripts: &str) -> Outcome {
    let body = format!("\n{scripts}\n");
    if doc.replace_region(RegionKind::SharedScripts, &body) {
        return Outcome::Applied;
    }
    let inserted = vec![
        Segment::Text("\n".to_string()),
        Segment::Region { kind: RegionKind::SharedScripts, body },
        Segment::Text("\n".to_string()),
    ];
    if doc.insert_before(BODY_CLOSE, Occurrence::Last, inserted) {
        Outcome::Applied
    } else {
        Outcome::Skipped(SkipReason::AnchorMissing)
    }
}

/// Applies navigation, footer links, cookie consent and shared scripts, in
/// that order, to `source`.
///
/// Patching the output a second time with the same fragments yields the same
/// bytes, provided the footer-links fragment carries its guard id.
pub fn patch(source: &str, fragments: &ExpandedFragments) -> Patched {
    let mut doc = Document::parse(source);

    let report = PatchReport {
        nav: patch_nav(&mut doc, &fragments.nav),
        footer_links: patch_footer_links(&mut doc, &fragments.footer_links),
        cookie_consent: patch_cookie_consent(&mut doc, &fragments.cookie_consent),
        shared_scripts: patch_shared_scripts(&mut doc, &fragments.scripts),
    };
    debug!(
        "nav: {}, footer links: {}, cookie consent: {}, shared scripts: {}",
        report.nav, report.footer_links, report.cookie_consent, report.shared_scripts
    );

    Patched { content: doc.render(), report }
}
