//! Writer extraction from a show's full credits page.
//!
//! Two strategies, tried in order: the embedded payload's writing
//! categories, then the classic credits markup (a "Writing Credits" heading
//! followed by a table). Results are merged by writer identity.

use regex::Regex;
use scraper::{ElementRef, Html};
use showgraph_core::{CreditObservation, WriterCredit, WriterId, WriterObservation};
use std::sync::OnceLock;

use crate::merge;
use crate::parser::{element_text, selector, writer_id_from_href};
use crate::payload::{self, Category};

const SECTION_HEADING: &str = "h4";
const WRITER_ANCHOR: &str = r#"a[href*="/name/nm"]"#;
const CREDIT_CELL: &str = "td.credit";
const TABLE_ROW: &str = "tr";

fn episodes_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+)\s+episodes?").expect("valid regex"))
}

fn parenthetical_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([^()]*)\)").expect("valid regex"))
}

/// Trimmed role text, absent when empty.
fn normalize_role(role: Option<&str>) -> Option<String> {
    role.map(str::trim)
        .filter(|r| !r.is_empty())
        .map(ToString::to_string)
}

/// Parse a credit annotation such as `(written by) (8 episodes, 2001-2005)`.
///
/// The role is the first parenthetical group that is not an episode tally;
/// unparenthesized text is taken as the role when it carries no tally.
#[must_use]
pub fn parse_credit_text(text: &str) -> CreditObservation {
    let episode_count = episodes_regex()
        .captures(text)
        .and_then(|caps| caps[1].parse().ok());

    let groups: Vec<&str> = parenthetical_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();

    let role = if groups.is_empty() {
        if episodes_regex().is_match(text) {
            None
        } else {
            normalize_role(Some(text))
        }
    } else {
        groups
            .into_iter()
            .find(|group| !episodes_regex().is_match(group))
            .and_then(|group| normalize_role(Some(group)))
    };

    CreditObservation {
        role,
        episode_count,
    }
}

fn structured_writers(categories: Vec<Category>) -> Vec<WriterCredit> {
    categories
        .into_iter()
        .flat_map(|category| category.section.items)
        .filter_map(|item| {
            let episode_count = item.episode_count();
            let id = WriterId::new(item.id?).ok()?;
            let name = item.row_title.map(|n| n.trim().to_string())?;
            if name.is_empty() {
                return None;
            }

            Some(WriterCredit {
                writer: WriterObservation { id, name },
                credit: CreditObservation {
                    role: normalize_role(item.attributes.as_deref()),
                    episode_count,
                },
            })
        })
        .collect()
}

/// First element sibling after `heading`, if it is a table.
fn following_table<'a>(heading: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    heading
        .next_siblings()
        .find_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "table")
}

fn heuristic_writers(document: &Html) -> Vec<WriterCredit> {
    let (Some(heading_sel), Some(row_sel), Some(anchor_sel), Some(cell_sel)) = (
        selector(SECTION_HEADING),
        selector(TABLE_ROW),
        selector(WRITER_ANCHOR),
        selector(CREDIT_CELL),
    ) else {
        return Vec::new();
    };

    document
        .select(&heading_sel)
        .filter(|heading| element_text(heading).to_lowercase().contains("writ"))
        .filter_map(|heading| following_table(&heading))
        .flat_map(|table| table.select(&row_sel).collect::<Vec<_>>())
        .filter_map(|row| {
            let anchor = row.select(&anchor_sel).next()?;
            let id = writer_id_from_href(anchor.value().attr("href")?)?;
            let name = element_text(&anchor);
            if name.is_empty() {
                return None;
            }

            let credit = row
                .select(&cell_sel)
                .next()
                .map(|cell| parse_credit_text(&element_text(&cell)))
                .unwrap_or_default();

            Some(WriterCredit {
                writer: WriterObservation { id, name },
                credit,
            })
        })
        .collect()
}

/// Writers and their credit attributes, one entry per writer identity.
///
/// A writer listed more than once is merged: the highest episode count and
/// the first non-empty role win.
#[must_use]
pub fn extract_writers(html: &str) -> Vec<WriterCredit> {
    let document = Html::parse_document(html);

    let structured = match payload::writing_categories(&document) {
        Ok(categories) => structured_writers(categories),
        Err(err) => {
            tracing::debug!("Structured writer data unavailable: {}", err);
            Vec::new()
        }
    };

    if structured.is_empty() {
        merge::merge(heuristic_writers(&document))
    } else {
        merge::merge(structured)
    }
}
