//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - Conditional GET requests using stored cache validators
//! - Carrying validators forward when a response omits them
//!
//! Fetches are never retried and never return `Err`: every failure is
//! folded into a [`FetchOutcome`] for the caller to record.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::storage::DocumentRecord;
use reqwest::header::{
    HeaderMap, ACCEPT, CONTENT_TYPE, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED,
};
use reqwest::{redirect::Policy, Client};

/// Accept header sent with every page request
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8";

/// Cache validators for conditional requests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validators {
    pub etag: Option<String>,
    pub last_modified: Option<String>,
}

impl Validators {
    /// Validators stored with a previously indexed document
    pub fn from_record(record: &DocumentRecord) -> Self {
        Self {
            etag: record.etag.clone(),
            last_modified: record.last_modified_header.clone(),
        }
    }

    /// Takes fresh values from response headers, keeping known ones otherwise
    fn refreshed(&self, headers: &HeaderMap) -> Self {
        Self {
            etag: header_string(headers, ETAG).or_else(|| self.etag.clone()),
            last_modified: header_string(headers, LAST_MODIFIED)
                .or_else(|| self.last_modified.clone()),
        }
    }
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchOutcome {
    /// The server answered, whatever the status
    Response {
        /// HTTP status code
        status: u16,
        /// Content-Type header value, empty when absent
        content_type: String,
        /// Raw body bytes
        body: Vec<u8>,
        validators: Validators,
    },

    /// No usable response (DNS, connect, TLS, timeout, redirect limit, body read)
    Failed {
        /// Error description
        error: String,
        /// The validators the request was sent with
        validators: Validators,
    },
}

/// Whether a Content-Type header value denotes an HTML page
pub fn is_html(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

fn header_string(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `crawler` - Timeout and redirect limits
/// * `user_agent` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_index::config::{CrawlerConfig, UserAgentConfig};
/// use sumi_index::crawler::build_http_client;
///
/// let user_agent = UserAgentConfig {
///     crawler_name: "BusinessSearchCrawler".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com".to_string(),
///     contact_email: None,
/// };
///
/// let client = build_http_client(&CrawlerConfig::default(), &user_agent).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(crawler.request_timeout())
        .redirect(Policy::limited(crawler.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, revalidating against a stored document when there is one
///
/// # Request Flow
///
/// 1. Send GET with `Accept` preferring HTML
///    - `If-None-Match` when the stored document has an ETag
///    - `If-Modified-Since` when it has a Last-Modified value
/// 2. Redirects are followed by the client up to the configured limit
/// 3. Any status is returned as a response; only transport failures fail
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `prior` - The stored document for this URL, if any
///
/// # Returns
///
/// A FetchOutcome carrying the response or the failure description
pub async fn fetch_conditional(
    client: &Client,
    url: &str,
    prior: Option<&DocumentRecord>,
) -> FetchOutcome {
    let known = prior.map(Validators::from_record).unwrap_or_default();

    let mut request = client.get(url).header(ACCEPT, ACCEPT_HTML);
    if let Some(etag) = &known.etag {
        request = request.header(IF_NONE_MATCH, etag.as_str());
    }
    if let Some(last_modified) = &known.last_modified {
        request = request.header(IF_MODIFIED_SINCE, last_modified.as_str());
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            return FetchOutcome::Failed {
                error: e.to_string(),
                validators: known,
            }
        }
    };

    let status = response.status().as_u16();
    let content_type = header_string(response.headers(), CONTENT_TYPE).unwrap_or_default();
    let validators = known.refreshed(response.headers());

    match response.bytes().await {
        Ok(body) => FetchOutcome::Response {
            status,
            content_type,
            body: body.to_vec(),
            validators,
        },
        Err(e) => FetchOutcome::Failed {
            error: e.to_string(),
            validators: known,
        },
    }
}
