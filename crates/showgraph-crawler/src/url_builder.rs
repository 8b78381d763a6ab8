//! Catalog URL construction.

use crate::error::{CrawlError, Result};
use showgraph_core::{ShowId, WriterId};
use url::Url;

/// Builds catalog page URLs relative to a configured base.
#[derive(Debug, Clone)]
pub struct CatalogUrls {
    base: String,
}

impl CatalogUrls {
    /// Create a builder for `base`, e.g. `https://www.imdb.com`.
    pub fn new(base: &str) -> Result<Self> {
        let parsed = Url::parse(base).map_err(|e| CrawlError::InvalidUrl(format!("{base}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CrawlError::InvalidUrl(format!(
                "{base}: unsupported scheme {}",
                parsed.scheme()
            )));
        }

        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
        })
    }

    /// Title search restricted to TV titles.
    pub fn search_url(&self, title: &str) -> Result<String> {
        let endpoint = format!("{}/find/", self.base);
        Url::parse_with_params(&endpoint, &[("q", title), ("s", "tt"), ("ttype", "tv")])
            .map(String::from)
            .map_err(|e| CrawlError::InvalidUrl(format!("{endpoint}: {e}")))
    }

    /// Show detail page.
    #[must_use]
    pub fn title_url(&self, id: &ShowId) -> String {
        format!("{}/title/{id}/", self.base)
    }

    /// Full credits page for a show.
    #[must_use]
    pub fn credits_url(&self, id: &ShowId) -> String {
        format!("{}/title/{id}/fullcredits/", self.base)
    }

    /// Writer profile page.
    #[must_use]
    pub fn name_url(&self, id: &WriterId) -> String {
        format!("{}/name/{id}/", self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_encodes_title() {
        let urls = CatalogUrls::new("https://www.imdb.com/").expect("valid base");
        assert_eq!(
            urls.search_url("Bob's Burgers").expect("search url"),
            "https://www.imdb.com/find/?q=Bob%27s+Burgers&s=tt&ttype=tv"
        );
    }

    #[test]
    fn test_entity_urls() {
        let urls = CatalogUrls::new("https://www.imdb.com").expect("valid base");
        let show = ShowId::new("tt0285403").expect("valid show ID");
        let writer = WriterId::new("nm0488939").expect("valid writer ID");

        assert_eq!(urls.title_url(&show), "https://www.imdb.com/title/tt0285403/");
        assert_eq!(
            urls.credits_url(&show),
            "https://www.imdb.com/title/tt0285403/fullcredits/"
        );
        assert_eq!(urls.name_url(&writer), "https://www.imdb.com/name/nm0488939/");
    }

    #[test]
    fn test_rejects_invalid_base() {
        assert!(matches!(
            CatalogUrls::new("not a url"),
            Err(CrawlError::InvalidUrl(_))
        ));
        assert!(matches!(
            CatalogUrls::new("ftp://www.imdb.com"),
            Err(CrawlError::InvalidUrl(_))
        ));
    }
}
