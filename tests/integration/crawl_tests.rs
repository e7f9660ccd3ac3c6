//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::path::Path;
use sumi_index::config::{Config, CrawlerConfig, StorageConfig, UserAgentConfig};
use sumi_index::crawler::{run_crawl, CrawlStats, Crawler};
use sumi_index::storage::{RunStatus, SeedListFile, SqliteStorage, Storage};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration storing its files under `dir`
fn create_test_config(dir: &Path, crawler: CrawlerConfig) -> Config {
    Config {
        crawler,
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: Some("test@example.com".to_string()),
        },
        storage: StorageConfig {
            database_path: dir.join("index.db").to_string_lossy().into_owned(),
            seed_list_path: dir
                .join("data")
                .join("url_seeds.txt")
                .to_string_lossy()
                .into_owned(),
        },
    }
}

fn create_crawler(crawler: CrawlerConfig) -> (Crawler<SqliteStorage>, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), crawler);
    let storage = SqliteStorage::new_in_memory().unwrap();
    (Crawler::new(&config, storage).unwrap(), dir)
}

/// An HTML page whose body is `content`
fn html_page(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", content),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, page_path: &str, content: &str, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_page(content))
        .expect(expected_hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_seed_crawl_respects_link_cap_and_depth() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/",
        r#"<p>Local bakery selling fresh bread</p>
           <a href="/a">A</a> <a href="/b">B</a> <a href="/c">C</a>"#,
        1,
    )
    .await;
    mount_page(
        &server,
        "/a",
        r#"<p>Opening hours and directions</p><a href="/deep">Deeper</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/b", "<p>Catering orders for weddings</p>", 1).await;
    mount_page(&server, "/c", "<p>Over the link cap</p>", 0).await;
    mount_page(&server, "/deep", "<p>Past the depth limit</p>", 0).await;

    let (mut crawler, _dir) = create_crawler(CrawlerConfig {
        max_links_per_page: 2,
        ..CrawlerConfig::default()
    });
    let seeds = vec!["bad url".to_string(), format!("{}/", base_url)];

    let stats = crawler.run(&seeds, "hash").await.unwrap();

    assert_eq!(stats.errors, vec!["Invalid URL: bad url"]);
    assert_eq!(stats.processed, 3);
    assert_eq!(stats.indexed, 3);
    assert_eq!(stats.skipped, 0);

    let storage = crawler.storage();
    assert_eq!(storage.count_documents().unwrap(), 3);

    let seed = storage.find_by_url(&format!("{}/", base_url)).unwrap().unwrap();
    assert_eq!(seed.parent_url, None);
    assert_eq!(seed.snippet, "Local bakery selling fresh bread A B C");
    assert_eq!(seed.content_hash.len(), 64);

    let child = storage.find_by_url(&format!("{}/a", base_url)).unwrap().unwrap();
    assert_eq!(child.parent_url.as_deref(), Some(format!("{}/", base_url).as_str()));
    assert!(child.full_content.contains("opening"));
    assert!(child.full_content.contains("hour"));
}

#[tokio::test]
async fn test_url_reached_twice_is_fetched_once() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(&server, "/one", r#"<p>First seed</p><a href="/shared">S</a>"#, 1).await;
    mount_page(&server, "/two", r#"<p>Second seed</p><a href="/shared/">S</a>"#, 1).await;
    mount_page(&server, "/shared", "<p>Shared page content</p>", 1).await;

    let (mut crawler, _dir) = create_crawler(CrawlerConfig::default());
    let seeds = vec![
        format!("{}/one", base_url),
        format!("{}/two", base_url),
        format!("{}/one/", base_url),
    ];

    let stats = crawler.run(&seeds, "hash").await.unwrap();

    assert!(stats.errors.is_empty(), "unexpected errors: {:?}", stats.errors);
    assert_eq!(stats.processed, 3);
    assert_eq!(stats.indexed, 3);

    // Parent is whichever page reached it first
    let shared = crawler
        .storage()
        .find_by_url(&format!("{}/shared", base_url))
        .unwrap()
        .unwrap();
    assert_eq!(shared.parent_url, Some(format!("{}/one", base_url)));
}

#[tokio::test]
async fn test_not_modified_without_record_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&server)
        .await;

    let (mut crawler, _dir) = create_crawler(CrawlerConfig::default());
    let stats = crawler.run(&[server.uri()], "hash").await.unwrap();

    assert_eq!(
        stats,
        CrawlStats {
            processed: 0,
            indexed: 0,
            skipped: 1,
            errors: vec![],
        }
    );
    assert_eq!(crawler.storage().count_documents().unwrap(), 0);
}

#[tokio::test]
async fn test_unchanged_content_is_skipped() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>Hardware store and garden supplies</p>", 2).await;

    let (mut crawler, _dir) = create_crawler(CrawlerConfig::default());
    let seeds = vec![server.uri()];

    let first = crawler.run(&seeds, "hash").await.unwrap();
    assert_eq!(first.indexed, 1);
    let before = crawler
        .storage()
        .find_by_url(&format!("{}/", server.uri()))
        .unwrap()
        .unwrap();

    let second = crawler.run(&seeds, "hash").await.unwrap();
    assert_eq!(second.processed, 1);
    assert_eq!(second.indexed, 0);
    assert_eq!(second.skipped, 1);

    let after = crawler
        .storage()
        .find_by_url(&format!("{}/", server.uri()))
        .unwrap()
        .unwrap();
    assert_eq!(after.doc_id, before.doc_id);
    assert_eq!(after.snippet, before.snippet);
    assert_eq!(after.full_content, before.full_content);
    assert_eq!(after.last_indexed_at, before.last_indexed_at);
}

#[tokio::test]
async fn test_changed_content_is_reindexed_in_place() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html_page("<p>Spring menu with fresh salads</p>"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(html_page("<p>Winter menu with warm soups</p>"))
        .mount(&server)
        .await;

    let (mut crawler, _dir) = create_crawler(CrawlerConfig::default());
    let seeds = vec![server.uri()];

    crawler.run(&seeds, "hash").await.unwrap();
    let before = crawler
        .storage()
        .find_by_url(&format!("{}/", server.uri()))
        .unwrap()
        .unwrap();

    let second = crawler.run(&seeds, "hash").await.unwrap();
    assert_eq!(second.indexed, 1);
    assert_eq!(second.skipped, 0);

    let after = crawler
        .storage()
        .find_by_url(&format!("{}/", server.uri()))
        .unwrap()
        .unwrap();
    assert_eq!(after.doc_id, before.doc_id);
    assert_ne!(after.content_hash, before.content_hash);
    assert!(after.snippet.contains("Winter menu"));
    assert_eq!(crawler.storage().count_documents().unwrap(), 1);
}

#[tokio::test]
async fn test_validators_sent_on_next_run() {
    let server = MockServer::start().await;

    // Mounted first so it wins once the crawler revalidates
    Mock::given(method("GET"))
        .and(header("if-none-match", "\"v1\""))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(
            html_page("<p>Bicycle repair shop downtown</p>").insert_header("ETag", "\"v1\""),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (mut crawler, _dir) = create_crawler(CrawlerConfig::default());
    let seeds = vec![server.uri()];

    let first = crawler.run(&seeds, "hash").await.unwrap();
    assert_eq!(first.indexed, 1);

    let stored = crawler
        .storage()
        .find_by_url(&format!("{}/", server.uri()))
        .unwrap()
        .unwrap();
    assert_eq!(stored.etag.as_deref(), Some("\"v1\""));

    let second = crawler.run(&seeds, "hash").await.unwrap();
    assert_eq!(second.skipped, 1);
    assert_eq!(second.indexed, 0);
    assert!(second.errors.is_empty());

    let touched = crawler
        .storage()
        .find_by_url(&format!("{}/", server.uri()))
        .unwrap()
        .unwrap();
    assert_eq!(touched.last_indexed_at, stored.last_indexed_at);
    assert_eq!(touched.etag, stored.etag);
}

#[tokio::test]
async fn test_non_html_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/menu.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .expect(1)
        .mount(&server)
        .await;

    let (mut crawler, _dir) = create_crawler(CrawlerConfig::default());
    let stats = crawler
        .run(&[format!("{}/menu.pdf", server.uri())], "hash")
        .await
        .unwrap();

    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.processed, 0);
    assert!(stats.errors.is_empty());
    assert_eq!(crawler.storage().count_documents().unwrap(), 0);
}

#[tokio::test]
async fn test_http_error_and_empty_page_are_recorded() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/",
        r#"<p>Directory of shops</p><a href="/broken">Broken</a><a href="/blank">Blank</a>"#,
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/blank", "<script>render()</script>", 1).await;

    let (mut crawler, _dir) = create_crawler(CrawlerConfig::default());
    let stats = crawler.run(&[format!("{}/", base_url)], "hash").await.unwrap();

    assert_eq!(stats.indexed, 1);
    assert_eq!(
        stats.errors,
        vec![
            format!("HTTP 500 at {}/broken", base_url),
            format!("Could not extract text from {}/blank", base_url),
        ]
    );

    let run = crawler.storage().get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.errors, stats.errors);
}

#[tokio::test]
async fn test_transport_error_does_not_abort_run() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>Still crawled after a failure</p>", 1).await;

    let (mut crawler, _dir) = create_crawler(CrawlerConfig::default());
    let seeds = vec!["http://127.0.0.1:1/".to_string(), server.uri()];

    let stats = crawler.run(&seeds, "hash").await.unwrap();

    assert_eq!(stats.errors.len(), 1);
    assert!(stats.errors[0].starts_with("Error fetching http://127.0.0.1:1/: "));
    assert_eq!(stats.indexed, 1);
}

#[tokio::test]
async fn test_max_depth_zero_crawls_only_seeds() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<p>Seed only</p><a href="/child">Child</a>"#, 1).await;
    mount_page(&server, "/child", "<p>Never reached</p>", 0).await;

    let (mut crawler, _dir) = create_crawler(CrawlerConfig {
        max_depth: 0,
        ..CrawlerConfig::default()
    });
    let stats = crawler.run(&[server.uri()], "hash").await.unwrap();

    assert_eq!(stats.indexed, 1);
}

#[tokio::test]
async fn test_run_crawl_from_seed_file() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>Florist with same day delivery</p>", 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), CrawlerConfig::default());

    SeedListFile::new(&config.storage.seed_list_path)
        .save(&format!("\n  {}  \n\n", server.uri()))
        .unwrap();

    let stats = run_crawl(&config, "config-hash").await.unwrap();
    assert_eq!(stats.indexed, 1);
    assert!(!stats.has_errors());

    let storage = SqliteStorage::new(Path::new(&config.storage.database_path)).unwrap();
    assert_eq!(storage.count_documents().unwrap(), 1);

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.config_hash, "config-hash");
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.indexed, 1);
}

#[tokio::test]
async fn test_run_crawl_creates_empty_seed_file() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), CrawlerConfig::default());

    let stats = run_crawl(&config, "config-hash").await.unwrap();

    assert_eq!(stats.errors, vec!["The URL list is empty."]);
    assert!(Path::new(&config.storage.seed_list_path).exists());
}
