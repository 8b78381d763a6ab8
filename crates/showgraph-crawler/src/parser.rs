//! Show extraction from search result and title pages.
//!
//! Every function here is pure: it takes a raw document and returns zero or
//! more observations. Missing or malformed substructure yields an empty
//! result, never an error.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use showgraph_core::{ShowId, ShowObservation, WriterId};
use std::sync::OnceLock;

use crate::merge;

const SHOW_ANCHOR: &str = r#"a[href*="/title/tt"]"#;
const TITLE_HEADING: &str = r#"h1[data-testid="hero__pageTitle"]"#;
const RELEASE_INFO_LINK: &str = r#"a[href*="releaseinfo"]"#;
const LINKED_DATA: &str = r#"script[type="application/ld+json"]"#;

fn show_href_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/title/(tt\d+)").expect("valid regex"))
}

fn writer_href_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/name/(nm\d+)").expect("valid regex"))
}

fn year_range_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{4})(?:\s*[-–]\s*(\d{4})?)?").expect("valid regex"))
}

fn trailing_year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\s*\((\d{4}(?:\s*[-–]\s*(?:\d{4})?)?)\)\s*$").expect("valid regex")
    })
}

/// Parse a selector that is known at compile time.
///
/// Returns `None` rather than panicking so callers degrade to an empty result.
pub(crate) fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Visible text of an element with runs of whitespace collapsed.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Show identity embedded in a link target, if any.
pub(crate) fn show_id_from_href(href: &str) -> Option<ShowId> {
    show_href_regex()
        .captures(href)
        .and_then(|caps| ShowId::new(&caps[1]).ok())
}

/// Writer identity embedded in a link target, if any.
pub(crate) fn writer_id_from_href(href: &str) -> Option<WriterId> {
    writer_href_regex()
        .captures(href)
        .and_then(|caps| WriterId::new(&caps[1]).ok())
}

/// Parse a year range such as `2003`, `2003–2009` or `2003–`.
///
/// The first 4-digit year is the start; an optional second year after a dash
/// or en-dash is the end. An open dash without a second year means ongoing,
/// so the end stays absent.
#[must_use]
pub fn parse_year_range(text: &str) -> Option<(i32, Option<i32>)> {
    let caps = year_range_regex().captures(text)?;
    let start = caps.get(1)?.as_str().parse().ok()?;
    let end = caps.get(2).and_then(|m| m.as_str().parse().ok());
    Some((start, end))
}

/// Strip a trailing parenthetical year token from a display title.
///
/// Returns the cleaned title and the year range found in the token, if any.
#[must_use]
pub fn clean_title(raw: &str) -> (String, Option<(i32, Option<i32>)>) {
    match trailing_year_regex().captures(raw) {
        Some(caps) => {
            let years = caps.get(1).and_then(|m| parse_year_range(m.as_str()));
            let cut = caps.get(0).map_or(raw.len(), |m| m.start());
            (raw[..cut].trim().to_string(), years)
        }
        None => (raw.trim().to_string(), None),
    }
}

/// Every show anchor on a search result page, in document order.
///
/// Anchors with no visible text are skipped; the same identity appearing
/// more than once is merged into its first observation.
#[must_use]
pub fn extract_show_candidates(html: &str) -> Vec<ShowObservation> {
    let Some(anchor_selector) = selector(SHOW_ANCHOR) else {
        return Vec::new();
    };
    let document = Html::parse_document(html);

    let candidates = document.select(&anchor_selector).filter_map(|anchor| {
        let id = show_id_from_href(anchor.value().attr("href")?)?;
        let raw = element_text(&anchor);
        if raw.is_empty() {
            return None;
        }

        let (title, years) = clean_title(&raw);
        let (year_start, _) = years.unzip();
        Some(ShowObservation::new(id, title).with_years(year_start, None))
    });

    merge::merge(candidates)
}

/// Resolve a search result page to the first matching show.
///
/// `None` means "not found", which is an expected outcome for the caller.
/// When the anchor text is nothing but a year token, the query title is used.
#[must_use]
pub fn extract_search_result(html: &str, query: &str) -> Option<ShowObservation> {
    let mut first = extract_show_candidates(html).into_iter().next()?;
    if first.title.is_empty() {
        first.title = query.trim().to_string();
    }
    Some(first)
}

#[derive(Debug, Default, Deserialize)]
struct LinkedData {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "datePublished")]
    date_published: Option<String>,
}

fn linked_data(document: &Html) -> Option<LinkedData> {
    let script_selector = selector(LINKED_DATA)?;
    let script = document.select(&script_selector).next()?;
    let raw: String = script.text().collect();
    serde_json::from_str(&raw).ok()
}

/// Canonical show fields from a title page.
///
/// The title comes from the page heading, then the embedded linked-data
/// name, then the identifier itself. The year range comes from the release
/// info link, falling back to the linked-data publication year. Returns
/// `None` when the page carries none of these elements.
#[must_use]
pub fn extract_show_details(html: &str, id: &ShowId) -> Option<ShowObservation> {
    let document = Html::parse_document(html);

    let heading = selector(TITLE_HEADING)
        .and_then(|sel| document.select(&sel).next().map(|el| element_text(&el)))
        .filter(|text| !text.is_empty());

    let release_years = selector(RELEASE_INFO_LINK).and_then(|sel| {
        document
            .select(&sel)
            .find_map(|el| parse_year_range(&element_text(&el)))
    });

    let linked = linked_data(&document).unwrap_or_default();

    if heading.is_none() && release_years.is_none() && linked.name.is_none() {
        return None;
    }

    let title = heading
        .or(linked.name)
        .unwrap_or_else(|| id.as_str().to_string());

    let (year_start, year_end) = match release_years {
        Some((start, end)) => (Some(start), end),
        None => (
            linked
                .date_published
                .as_deref()
                .and_then(parse_year_range)
                .map(|(start, _)| start),
            None,
        ),
    };

    Some(ShowObservation::new(id.clone(), title).with_years(year_start, year_end))
}
