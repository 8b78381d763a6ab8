use crate::error::{FetchError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use showgraph_core::TransportConfig;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Browser-like request headers sent with every fetch.
#[derive(Debug, Clone)]
pub struct HeaderProfile {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
}

impl HeaderProfile {
    pub fn from_config(config: &TransportConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            accept: ACCEPT_HTML.to_string(),
            accept_language: config.accept_language.clone(),
        }
    }

    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in [
            (USER_AGENT, &self.user_agent),
            (ACCEPT, &self.accept),
            (ACCEPT_LANGUAGE, &self.accept_language),
        ] {
            let value = HeaderValue::from_str(value)
                .map_err(|e| FetchError::Client(format!("invalid {name} header: {e}")))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

impl Default for HeaderProfile {
    fn default() -> Self {
        Self::from_config(&TransportConfig::default())
    }
}
