use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Query parameter name for the search phrase.
///
/// Early versions of the service also accepted `search_phrase` on /motioner;
/// the camelCase form is what the timeline and hits endpoints use, so the
/// client sends it everywhere.
const SEARCH_PHRASE: &str = "searchPhrase";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("server returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("response was not valid JSON: {body}")]
    InvalidJson {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Paged hit-listing request for /motioner/hits.
#[derive(Debug, Clone)]
pub struct HitsRequest {
    pub search_phrase: String,
    /// Start year, inclusive
    pub start_date: i32,
    /// End year, inclusive
    pub end_date: i32,
    /// Paging offset into the result set
    pub from_index: usize,
    /// Optional query mode, interpreted by the backend
    pub query_mode: Option<String>,
}

/// A request target as a pure value: path plus query pairs.
///
/// Building these separately from sending them keeps URL construction
/// testable without a running service. Percent-encoding of the pairs is
/// handled by reqwest when the request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    path: &'static str,
    query: Vec<(String, String)>,
}

impl Endpoint {
    pub fn search(phrase: &str) -> Self {
        Self {
            path: "/motioner",
            query: vec![(SEARCH_PHRASE.to_string(), phrase.to_string())],
        }
    }

    pub fn timeline_total() -> Self {
        Self {
            path: "/motioner/timeline/total",
            query: Vec::new(),
        }
    }

    pub fn timeline_search(phrase: &str) -> Self {
        Self {
            path: "/motioner/timeline/search",
            query: vec![(SEARCH_PHRASE.to_string(), phrase.to_string())],
        }
    }

    pub fn hits(req: &HitsRequest) -> Self {
        let mut query = vec![
            (SEARCH_PHRASE.to_string(), req.search_phrase.clone()),
            ("startDate".to_string(), req.start_date.to_string()),
            ("endDate".to_string(), req.end_date.to_string()),
            ("fromIndex".to_string(), req.from_index.to_string()),
        ];
        if let Some(mode) = &req.query_mode {
            query.push(("queryMode".to_string(), mode.clone()));
        }
        Self {
            path: "/motioner/hits",
            query,
        }
    }

    pub fn latest_queries() -> Self {
        Self {
            path: "/queries/latest",
            query: Vec::new(),
        }
    }

    pub fn top_queries() -> Self {
        Self {
            path: "/queries/top",
            query: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// The phrase this request carries, if any.
    pub fn phrase(&self) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == SEARCH_PHRASE)
            .map(|(_, v)| v.as_str())
    }

    /// Human-readable form for status lines and history entries.
    pub fn describe(&self) -> String {
        if self.query.is_empty() {
            format!("GET {}", self.path)
        } else {
            let pairs: Vec<String> = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            format!("GET {}?{}", self.path, pairs.join("&"))
        }
    }
}

/// Blocking client for the motioner search service.
///
/// Requests are issued synchronously and sequentially; one underlying
/// connection pool is reused across calls.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full-text search: GET /motioner?searchPhrase=...
    pub fn search(&self, phrase: &str) -> Result<Value, ApiError> {
        self.get(&Endpoint::search(phrase))
    }

    /// Document counts per year over the whole corpus.
    pub fn timeline_total(&self) -> Result<Value, ApiError> {
        self.get(&Endpoint::timeline_total())
    }

    /// Document counts per year for a phrase.
    pub fn timeline_search(&self, phrase: &str) -> Result<Value, ApiError> {
        self.get(&Endpoint::timeline_search(phrase))
    }

    /// Paged hit listing within a year range.
    pub fn hits(&self, req: &HitsRequest) -> Result<Value, ApiError> {
        self.get(&Endpoint::hits(req))
    }

    /// The service's most recent queries.
    pub fn latest_queries(&self) -> Result<Value, ApiError> {
        self.get(&Endpoint::latest_queries())
    }

    /// The service's most frequent queries.
    pub fn top_queries(&self) -> Result<Value, ApiError> {
        self.get(&Endpoint::top_queries())
    }

    /// Issue a GET for the endpoint and parse the body as JSON.
    ///
    /// Non-2xx responses and unparseable 2xx bodies both carry the raw body
    /// text in the error so it can still be printed for inspection.
    pub fn get(&self, endpoint: &Endpoint) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint.path());
        debug!(target: "api", "{}", endpoint.describe());

        let response = self.client.get(&url).query(endpoint.query()).send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        debug!(target: "api", "{} -> {} ({} bytes)", endpoint.path(), status, body.len());
        serde_json::from_str(&body).map_err(|source| ApiError::InvalidJson { body, source })
    }
}
