//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates a run:
//! - Normalizing seeds and recording the ones that fail
//! - Depth-first traversal over an explicit work stack
//! - Conditional fetching, tokenizing and change detection per page
//! - Writing documents and the run record to storage
//!
//! Per-URL failures are collected in [`CrawlStats`]; only storage failures
//! end a run early with `Err`.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{build_http_client, fetch_conditional, is_html, FetchOutcome};
use crate::crawler::parser::extract_links;
use crate::crawler::stats::{CrawlContext, CrawlStats};
use crate::storage::{open_storage, DocumentUpsert, RunStatus, SeedListFile, Storage};
use crate::text::Tokenizer;
use crate::url::normalize_url;
use crate::IndexError;
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::Instant;
use subtle::ConstantTimeEq;

/// A URL waiting on the work stack
#[derive(Debug, Clone)]
struct WorkItem {
    url: String,
    parent: Option<String>,
    level: u32,
}

/// Main crawler structure
///
/// Owns the HTTP client, tokenizer and storage for the duration of one or
/// more runs. Traversal is sequential.
pub struct Crawler<S: Storage> {
    config: CrawlerConfig,
    client: Client,
    tokenizer: Tokenizer,
    storage: S,
}

impl<S: Storage> Crawler<S> {
    /// Creates a crawler with an HTTP client built from the configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The indexer configuration
    /// * `storage` - The document store to read from and write to
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Successfully created crawler
    /// * `Err(IndexError)` - The HTTP client could not be built
    pub fn new(config: &Config, storage: S) -> Result<Self, IndexError> {
        let client = build_http_client(&config.crawler, &config.user_agent)?;
        Ok(Self::with_client(config.crawler.clone(), client, storage))
    }

    pub fn with_client(config: CrawlerConfig, client: Client, storage: S) -> Self {
        Self {
            config,
            client,
            tokenizer: Tokenizer::new(),
            storage,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Runs one crawl over the given seed list
    ///
    /// Seeds are crawled in order, each one depth-first down to the
    /// configured depth before the next seed starts. A URL is fetched at
    /// most once per run. The run and its final counters are recorded in
    /// storage, including when the run deadline cuts it short.
    ///
    /// # Arguments
    ///
    /// * `seeds` - Raw seed URLs, in crawl order
    /// * `config_hash` - Hash of the configuration file, stored with the run
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlStats)` - The run finished or was interrupted by its deadline
    /// * `Err(IndexError)` - A storage operation failed; the run is recorded
    ///   as failed with the counters gathered up to that point
    pub async fn run(&mut self, seeds: &[String], config_hash: &str) -> Result<CrawlStats, IndexError> {
        let run_id = self.storage.create_run(config_hash)?;
        let start_time = Instant::now();
        let deadline = self.config.run_deadline().map(|limit| start_time + limit);

        tracing::info!(run_id, seeds = seeds.len(), "Starting crawl run");

        let mut context = CrawlContext::default();
        let mut status = RunStatus::Completed;

        if seeds.is_empty() {
            context.record_error("The URL list is empty.".to_string());
        }

        let mut stack: Vec<WorkItem> = Vec::new();
        for (position, seed) in seeds.iter().enumerate() {
            match normalize_url(seed) {
                Ok(url) => stack.push(WorkItem {
                    url,
                    parent: None,
                    level: 0,
                }),
                Err(e) => {
                    tracing::debug!(seed = %seed, error = %e, "Rejected seed");
                    context.record_error(format!("Invalid URL: {}", seed));
                    continue;
                }
            }

            let drained = self.drain(&mut stack, &mut context, deadline).await;
            let interrupted = match drained {
                Ok(interrupted) => interrupted,
                Err(error) => return Err(self.fail_run(run_id, context, error)),
            };

            if interrupted {
                let pending = stack.len() + (seeds.len() - position - 1);
                context.record_error(format!(
                    "Run deadline reached; {} pending URLs were not crawled",
                    pending
                ));
                status = RunStatus::Interrupted;
                break;
            }
        }

        let stats = context.into_stats();
        self.storage.finish_run(run_id, status, &stats)?;

        tracing::info!(
            run_id,
            processed = stats.processed,
            indexed = stats.indexed,
            skipped = stats.skipped,
            errors = stats.errors.len(),
            "Crawl {} in {:?}",
            status.to_db_string(),
            start_time.elapsed()
        );

        Ok(stats)
    }

    /// Records a run that a storage failure ended early
    ///
    /// The counters gathered so far are kept with the run. Returns the
    /// error that ended it.
    fn fail_run(
        &mut self,
        run_id: i64,
        mut context: CrawlContext,
        error: IndexError,
    ) -> IndexError {
        context.record_error(format!("Run aborted: {}", error));
        let stats = context.into_stats();

        if let Err(e) = self.storage.finish_run(run_id, RunStatus::Failed, &stats) {
            tracing::error!(run_id, error = %e, "Could not record failed run");
        }

        tracing::error!(
            run_id,
            processed = stats.processed,
            indexed = stats.indexed,
            "Crawl failed: {}",
            error
        );

        error
    }

    /// Pops work items until the stack is empty
    ///
    /// Returns true when the deadline passed with items still queued.
    async fn drain(
        &mut self,
        stack: &mut Vec<WorkItem>,
        context: &mut CrawlContext,
        deadline: Option<Instant>,
    ) -> Result<bool, IndexError> {
        while !stack.is_empty() {
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Ok(true);
            }

            let Some(item) = stack.pop() else {
                break;
            };
            let links = self.crawl_page(&item, context).await?;

            // Reversed so the first link is popped first
            for link in links.into_iter().rev() {
                stack.push(WorkItem {
                    url: link,
                    parent: Some(item.url.clone()),
                    level: item.level + 1,
                });
            }
        }

        Ok(false)
    }

    /// Fetches and indexes one page
    ///
    /// Returns the links to follow from it, already capped to the
    /// per-page limit and empty at the depth limit.
    async fn crawl_page(
        &mut self,
        item: &WorkItem,
        context: &mut CrawlContext,
    ) -> Result<Vec<String>, IndexError> {
        let url = item.url.as_str();

        if item.level > self.config.max_depth {
            return Ok(Vec::new());
        }

        if !context.mark_visited(url) {
            tracing::debug!(url = %url, "Already visited");
            return Ok(Vec::new());
        }

        let existing = self.storage.find_by_url(url)?;

        let (status, content_type, body, validators) =
            match fetch_conditional(&self.client, url, existing.as_ref()).await {
                FetchOutcome::Response {
                    status,
                    content_type,
                    body,
                    validators,
                } => (status, content_type, body, validators),
                FetchOutcome::Failed { error, .. } => {
                    context.record_error(format!("Error fetching {}: {}", url, error));
                    return Ok(Vec::new());
                }
            };

        if status == 304 {
            if let Some(document) = &existing {
                self.storage.touch_document(document.doc_id)?;
            }
            tracing::debug!(url = %url, "Not modified");
            context.stats.skipped += 1;
            return Ok(Vec::new());
        }

        if status != 200 {
            context.record_error(format!("HTTP {} at {}", status, url));
            return Ok(Vec::new());
        }

        if !is_html(&content_type) {
            tracing::debug!(url = %url, content_type = %content_type, "Skipping non-HTML page");
            context.stats.skipped += 1;
            return Ok(Vec::new());
        }

        let html = String::from_utf8_lossy(&body);
        let content = self.tokenizer.preprocess_html(&html);
        if content.is_empty() {
            context.record_error(format!("Could not extract text from {}", url));
            return Ok(Vec::new());
        }

        let content_hash = hex::encode(Sha256::digest(&body));
        context.stats.processed += 1;

        let unchanged = existing.as_ref().is_some_and(|document| {
            bool::from(document.content_hash.as_bytes().ct_eq(content_hash.as_bytes()))
        });

        match &existing {
            Some(document) if unchanged => {
                self.storage.touch_document(document.doc_id)?;
                tracing::debug!(url = %url, "Content unchanged");
                context.stats.skipped += 1;
            }
            _ => {
                let full_content = content.token_text();
                let doc_id = self.storage.upsert_document(&DocumentUpsert {
                    source_url: url,
                    parent_url: item.parent.as_deref(),
                    snippet: &content.snippet,
                    full_content: &full_content,
                    content_hash: &content_hash,
                    etag: validators.etag.as_deref(),
                    last_modified_header: validators.last_modified.as_deref(),
                })?;
                tracing::info!(
                    url = %url,
                    doc_id,
                    level = item.level,
                    tokens = content.tokens.len(),
                    language = %content.language,
                    "Indexed page"
                );
                context.stats.indexed += 1;
            }
        }

        if item.level >= self.config.max_depth {
            return Ok(Vec::new());
        }

        let mut links = extract_links(&html, url);
        links.truncate(self.config.max_links_per_page);
        Ok(links)
    }
}

/// Runs a crawl over the stored seed list
///
/// Opens the document store and seed list named in the configuration,
/// creating either when missing.
///
/// # Arguments
///
/// * `config` - The indexer configuration
/// * `config_hash` - Hash of the configuration file
///
/// # Returns
///
/// * `Ok(CrawlStats)` - Stats of the finished (or interrupted) run
/// * `Err(IndexError)` - Storage could not be opened or written
///
/// # Example
///
/// ```no_run
/// use sumi_index::config::load_config_with_hash;
/// use sumi_index::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("config.toml"))?;
/// let stats = run_crawl(&config, &hash).await?;
/// println!("{} pages indexed", stats.indexed);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, config_hash: &str) -> Result<CrawlStats, IndexError> {
    let seeds = SeedListFile::new(&config.storage.seed_list_path).load_seeds()?;
    let storage = open_storage(Path::new(&config.storage.database_path))?;
    let mut crawler = Crawler::new(config, storage)?;
    crawler.run(&seeds, config_hash).await
}
