use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Sumi-Index
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub storage: StorageConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum link distance from a seed (seeds are level 0)
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Number of extracted links followed from each page
    #[serde(rename = "max-links-per-page", default = "default_max_links_per_page")]
    pub max_links_per_page: usize,

    /// Total time allowed for one fetch, in seconds
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Redirect hops followed before a fetch fails
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Wall-clock budget for a whole run, in seconds
    #[serde(rename = "run-deadline", default)]
    pub run_deadline: Option<u64>,
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn run_deadline(&self) -> Option<Duration> {
        self.run_deadline.map(Duration::from_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_links_per_page: default_max_links_per_page(),
            request_timeout: default_request_timeout(),
            max_redirects: default_max_redirects(),
            run_deadline: None,
        }
    }
}

fn default_max_depth() -> u32 {
    1
}

fn default_max_links_per_page() -> usize {
    25
}

fn default_request_timeout() -> u64 {
    20
}

fn default_max_redirects() -> usize {
    5
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email", default)]
    pub contact_email: Option<String>,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// `Name/Version (+ContactURL)` or `Name/Version (+ContactURL; Email)`
    pub fn header_value(&self) -> String {
        match &self.contact_email {
            Some(email) => format!(
                "{}/{} (+{}; {})",
                self.crawler_name, self.crawler_version, self.contact_url, email
            ),
            None => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, self.contact_url
            ),
        }
    }
}

/// Storage locations
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the newline-delimited seed list
    #[serde(rename = "seed-list-path")]
    pub seed_list_path: String,
}
