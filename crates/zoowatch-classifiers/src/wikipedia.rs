//! Wikipedia-backed search and summary client

use crate::facts::{PageSummary, SummaryClient};
use crate::lookup::SearchClient;
use async_trait::async_trait;
use regex::Regex;
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;
use url::Url;
use zoowatch_core::{Error, Result, SearchHit};

/// MediaWiki search API
pub const DEFAULT_SEARCH_URL: &str = "https://en.wikipedia.org/w/api.php";

/// REST page summary API
pub const DEFAULT_SUMMARY_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    title: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    title: String,
    #[serde(default)]
    extract: String,
    #[serde(default)]
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<PageLinks>,
}

#[derive(Debug, Deserialize)]
struct PageLinks {
    page: Option<String>,
}

fn markup() -> &'static Regex {
    static MARKUP: OnceLock<Regex> = OnceLock::new();
    MARKUP.get_or_init(|| Regex::new(r"<[^>]*>").expect("markup pattern is valid"))
}

/// Strip HTML tags and the common entities from a search snippet
pub fn plain_text(snippet: &str) -> String {
    markup()
        .replace_all(snippet, "")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout
    } else if e.is_decode() {
        Error::lookup(format!("malformed response: {}", e))
    } else {
        Error::http(e.to_string())
    }
}

/// Client for the Wikipedia search and summary APIs
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    http: reqwest::Client,
    search_url: String,
    summary_url: Url,
}

impl WikipediaClient {
    /// Create a client for the given endpoints
    pub fn new(
        search_url: impl Into<String>,
        summary_url: &str,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        let summary_url = Url::parse(summary_url)
            .map_err(|e| Error::config(format!("Invalid summary URL {}: {}", summary_url, e)))?;
        if summary_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "Summary URL {} cannot take a page title",
                summary_url
            )));
        }

        Ok(Self {
            http,
            search_url: search_url.into(),
            summary_url,
        })
    }

    /// Client for English Wikipedia
    pub fn english(user_agent: &str) -> Result<Self> {
        Self::new(DEFAULT_SEARCH_URL, DEFAULT_SUMMARY_URL, user_agent, None)
    }

    fn summary_url_for(&self, title: &str) -> Url {
        let mut url = self.summary_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(title);
        }
        url
    }
}

#[async_trait]
impl SearchClient for WikipediaClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let response = self
            .http
            .get(&self.search_url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("format", "json"),
                ("srsearch", query),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::lookup(format!("search returned {}", status)));
        }

        let body: SearchResponse = response.json().await.map_err(transport_error)?;
        let hits: Vec<SearchHit> = body
            .query
            .map(|q| q.search)
            .unwrap_or_default()
            .into_iter()
            .map(|hit| SearchHit::new(hit.title, plain_text(&hit.snippet)))
            .collect();

        debug!(query, hits = hits.len(), "Wikipedia search complete");
        Ok(hits)
    }

    fn name(&self) -> &str {
        "wikipedia"
    }
}

#[async_trait]
impl SummaryClient for WikipediaClient {
    async fn summary(&self, title: &str) -> Result<Option<PageSummary>> {
        let response = self
            .http
            .get(self.summary_url_for(title))
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => {
                return Err(Error::lookup(format!("summary returned {}", status)));
            }
            _ => {}
        }

        let body: SummaryResponse = response.json().await.map_err(transport_error)?;
        if body.extract.is_empty() {
            return Ok(None);
        }

        Ok(Some(PageSummary {
            title: body.title,
            extract: body.extract,
            page_url: body
                .content_urls
                .and_then(|urls| urls.desktop)
                .and_then(|desktop| desktop.page),
        }))
    }
}
