//! Embedded page payload.
//!
//! Catalog pages ship a JSON document in `script#__NEXT_DATA__`. Its credit
//! categories are the preferred source for writers and for a writer's other
//! shows. Every lookup here is best-effort: a missing or malformed payload
//! is reported as a [`PayloadError`] that callers turn into "no structured
//! data" before anything leaves the extractor.

use scraper::Html;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::parser::selector;

const PAYLOAD_SCRIPT: &str = "script#__NEXT_DATA__";

/// Why the structured payload could not be used.
#[derive(Debug, Error)]
pub(crate) enum PayloadError {
    #[error("page carries no embedded payload")]
    Missing,

    #[error("malformed embedded payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Default, Deserialize)]
struct NextData {
    #[serde(default)]
    props: Props,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Props {
    #[serde(default)]
    page_props: PageProps,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageProps {
    #[serde(default)]
    content_data: ContentData,
}

#[derive(Debug, Default, Deserialize)]
struct ContentData {
    #[serde(default)]
    categories: Vec<Value>,
}

/// One credit category, e.g. "Writers" or "Directed by".
#[derive(Debug, Default)]
pub(crate) struct Category {
    pub name: String,
    pub section: Section,
}

#[derive(Debug, Default)]
pub(crate) struct Section {
    pub items: Vec<CreditItem>,
}

/// A row inside a credit category.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreditItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub row_title: Option<String>,
    #[serde(default)]
    pub attributes: Option<String>,
    #[serde(default)]
    pub episodic_credit_data: Option<EpisodicCreditData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EpisodicCreditData {
    #[serde(default)]
    pub episode_count: Option<u32>,
}

impl CreditItem {
    pub fn episode_count(&self) -> Option<u32> {
        self.episodic_credit_data
            .as_ref()
            .and_then(|data| data.episode_count)
    }
}

/// Build a [`Category`] from a raw category whose name mentions writing.
///
/// Other categories are never decoded, so an odd row under "Cast" cannot
/// hide the writers. Writer rows that do not fit [`CreditItem`] are skipped.
fn writing_category(raw: &Value) -> Option<Category> {
    let name = raw.get("name")?.as_str()?;
    if !name.to_lowercase().contains("writ") {
        return None;
    }

    let items = raw
        .pointer("/section/items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value::<CreditItem>(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    Some(Category {
        name: name.to_string(),
        section: Section { items },
    })
}

/// Writing categories from the embedded payload, in document order.
pub(crate) fn writing_categories(document: &Html) -> Result<Vec<Category>, PayloadError> {
    let script_selector = selector(PAYLOAD_SCRIPT).ok_or(PayloadError::Missing)?;
    let script = document
        .select(&script_selector)
        .next()
        .ok_or(PayloadError::Missing)?;

    let raw: String = script.text().collect();
    let data: NextData = serde_json::from_str(&raw)?;

    Ok(data
        .props
        .page_props
        .content_data
        .categories
        .iter()
        .filter_map(writing_category)
        .collect())
}
