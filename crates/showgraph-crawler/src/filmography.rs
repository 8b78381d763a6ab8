//! A writer's other shows, read from their profile page.
//!
//! Passes are unioned rather than tried in turn: a false positive only costs
//! a lead, while a missed show cannot be recovered later in the run.

use scraper::{ElementRef, Html};
use showgraph_core::{ShowId, ShowObservation};

use crate::merge;
use crate::parser::{clean_title, element_text, selector, show_id_from_href};
use crate::payload::{self, Category};

const WRITER_SECTION: &str = r#"div[data-testid="nm-flmg-cat-writer"]"#;
const WRITER_SECTION_FALLBACK: &str = r#"div[id*="writer"], div[class*="writer"]"#;
const SHOW_ANCHOR: &str = r#"a[href*="/title/tt"]"#;
const SERIES_MARKERS: [&str; 2] = ["TV Series", "TV Mini"];

/// Observation for a show anchor, skipping anchors with no usable title.
fn anchor_show(anchor: &ElementRef) -> Option<ShowObservation> {
    let id = show_id_from_href(anchor.value().attr("href")?)?;
    show_from_text(id, &element_text(anchor))
}

fn show_from_text(id: ShowId, raw: &str) -> Option<ShowObservation> {
    let (title, years) = clean_title(raw);
    if title.is_empty() || title == id.as_str() {
        return None;
    }
    let (year_start, year_end) = years.unzip();
    Some(ShowObservation::new(id, title).with_years(year_start, year_end.flatten()))
}

fn structured_shows(categories: Vec<Category>) -> Vec<ShowObservation> {
    categories
        .into_iter()
        .flat_map(|category| category.section.items)
        .filter_map(|item| {
            let id = ShowId::new(item.id?).ok()?;
            show_from_text(id, item.row_title.as_deref().unwrap_or_default())
        })
        .collect()
}

/// Anchors inside containers marked as a writing-credits section.
fn section_shows(document: &Html) -> Vec<ShowObservation> {
    let Some(anchor_sel) = selector(SHOW_ANCHOR) else {
        return Vec::new();
    };

    let sections: Vec<ElementRef> = selector(WRITER_SECTION)
        .map(|sel| document.select(&sel).collect::<Vec<_>>())
        .filter(|found| !found.is_empty())
        .or_else(|| {
            selector(WRITER_SECTION_FALLBACK).map(|sel| document.select(&sel).collect())
        })
        .unwrap_or_default();

    sections
        .iter()
        .flat_map(|section| section.select(&anchor_sel))
        .filter_map(|anchor| anchor_show(&anchor))
        .collect()
}

/// Any show anchor whose enclosing element mentions a series marker.
fn series_marked_shows(document: &Html) -> Vec<ShowObservation> {
    let Some(anchor_sel) = selector(SHOW_ANCHOR) else {
        return Vec::new();
    };

    document
        .select(&anchor_sel)
        .filter(|anchor| {
            anchor
                .parent()
                .and_then(ElementRef::wrap)
                .is_some_and(|parent| {
                    let text = element_text(&parent);
                    SERIES_MARKERS.iter().any(|marker| text.contains(marker))
                })
        })
        .filter_map(|anchor| anchor_show(&anchor))
        .collect()
}

/// Other shows credited on a writer profile, one per show identity.
#[must_use]
pub fn extract_other_shows(html: &str) -> Vec<ShowObservation> {
    let document = Html::parse_document(html);

    let structured = match payload::writing_categories(&document) {
        Ok(categories) => structured_shows(categories),
        Err(err) => {
            tracing::debug!("Structured filmography unavailable: {}", err);
            Vec::new()
        }
    };

    merge::merge(
        structured
            .into_iter()
            .chain(section_shows(&document))
            .chain(series_marked_shows(&document)),
    )
}
