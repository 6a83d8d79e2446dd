//! Integration tests for the harvester
//!
//! These tests use wiremock to serve listing pages and run the full
//! probe, fetch, extract and export cycle end-to-end.

use chrono::Local;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use watch_harvest::config::Config;
use watch_harvest::crawler::Coordinator;
use watch_harvest::{HarvestError, RunState};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, Respond, ResponseTemplate};

const LISTING_PATH: &str = "/rolex/index.htm";

/// Matches requests without a `showpage` query parameter
struct NoPageParam;

impl Match for NoPageParam {
    fn matches(&self, request: &Request) -> bool {
        !request.url.query_pairs().any(|(k, _)| k == "showpage")
    }
}

/// Matches requests carrying a `showpage` query parameter
struct HasPageParam;

impl Match for HasPageParam {
    fn matches(&self, request: &Request) -> bool {
        request.url.query_pairs().any(|(k, _)| k == "showpage")
    }
}

/// Serves listing pages after a fixed delay and records when each request arrived
#[derive(Clone)]
struct DelayedPages {
    delay: Duration,
    last_page: u32,
    arrivals: Arc<Mutex<Vec<Instant>>>,
}

impl DelayedPages {
    fn new(delay: Duration, last_page: u32) -> Self {
        Self {
            delay,
            last_page,
            arrivals: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn arrivals(&self) -> Vec<Instant> {
        let mut arrivals = self.arrivals.lock().unwrap().clone();
        arrivals.sort();
        arrivals
    }
}

impl Respond for DelayedPages {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.arrivals.lock().unwrap().push(Instant::now());

        let page = request
            .url
            .query_pairs()
            .find(|(k, _)| k == "showpage")
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(0);

        ResponseTemplate::new(200)
            .set_body_string(page_html(page, 1, self.last_page))
            .set_delay(self.delay)
    }
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, output_dir: &Path, workers: usize) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.scraper.workers = workers;
    config.output.directory = output_dir.to_string_lossy().into_owned();
    config
}

fn listing_html(name: &str, cells: &[&str], price: &str) -> String {
    let cells: String = cells
        .iter()
        .map(|c| format!(r#"<div class="w-50">{}</div>"#, c))
        .collect();
    format!(
        r#"<div class="media-flex-body d-flex flex-column justify-content-between">
            <div class="text-xlg text-bold text-ellipsis">{}</div>
            <div class="d-none d-sm-flex flex-wrap m-b-2">{}</div>
            <div class="text-xlg text-bold">{}</div>
        </div>"#,
        name, cells, price
    )
}

/// Builds a listing page with `count` listings named `<page>-<i>`
fn page_html(page: u32, count: usize, last_page: u32) -> String {
    let listings: String = (0..count)
        .map(|i| {
            listing_html(
                &format!("Watch {}-{}", page, i),
                &["Case:40mm", &format!("Ref: {}:{}", page, i)],
                &format!("${}", 1000 + i),
            )
        })
        .collect();

    let mut anchors: String = (1..=last_page)
        .map(|p| format!(r#"<li><a href="?showpage={0}">{0}</a></li>"#, p))
        .collect();
    anchors.push_str(r#"<li><a href="?showpage=2">Next</a></li>"#);

    format!(
        r#"<html><body>
            <ul class="pagination">{}</ul>
            <div id="wt-watches">{}</div>
        </body></html>"#,
        anchors, listings
    )
}

async fn mount_first_page(server: &MockServer, last_page: u32) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(NoPageParam)
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(1, 0, last_page)))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page: u32, listings: usize, last_page: u32) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("showpage", page.to_string().as_str()))
        .and(query_param("man", "rolex"))
        .and(query_param("pageSize", "120"))
        .and(query_param("resultview", "list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(page_html(page, listings, last_page)),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn output_files(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .expect("Failed to read output dir")
        .map(|entry| entry.expect("Failed to read entry").path())
        .collect()
}

fn read_rows(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open CSV");
    let headers = reader
        .headers()
        .expect("Failed to read headers")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| {
            r.expect("Failed to read row")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect();
    (headers, rows)
}

#[tokio::test]
async fn test_full_harvest_fetches_every_page_once() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    let counts = [3usize, 0, 2, 4];
    let last_page = counts.len() as u32;

    mount_first_page(&mock_server, last_page).await;
    for (i, count) in counts.iter().enumerate() {
        mount_page(&mock_server, i as u32 + 1, *count, last_page).await;
    }

    let config = create_test_config(&mock_server.uri(), output_dir.path(), 2);
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Harvest failed");

    assert_eq!(coordinator.state(), RunState::Done);
    assert_eq!(summary.pages, last_page);
    assert_eq!(summary.records, counts.iter().sum::<usize>());

    // Row count is the sum of per-page counts; row order is completion order
    let (headers, rows) = read_rows(&summary.output_path);
    assert_eq!(rows.len(), 9);
    assert_eq!(headers, vec!["name", "Case", "Ref", "price"]);

    let names: HashSet<String> = rows.iter().map(|row| row[0].clone()).collect();
    let expected: HashSet<String> = counts
        .iter()
        .enumerate()
        .flat_map(|(i, count)| (0..*count).map(move |j| format!("Watch {}-{}", i + 1, j)))
        .collect();
    assert_eq!(names, expected);

    // First-colon split keeps the rest of the value intact
    let ref_index = headers.iter().position(|h| h == "Ref").unwrap();
    assert!(rows.iter().all(|row| row[ref_index].contains(':')));

    // Each mock expects exactly one request
    mock_server.verify().await;
}

#[tokio::test]
async fn test_worker_count_bounds_requests_in_flight() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    let workers = 3;
    let last_page = 9;
    let delay = Duration::from_millis(300);
    let pages = DelayedPages::new(delay, last_page);

    mount_first_page(&mock_server, last_page).await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("man", "rolex"))
        .and(HasPageParam)
        .respond_with(pages.clone())
        .expect(last_page as u64)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), output_dir.path(), workers);
    let started = Instant::now();
    let summary = Coordinator::new(config)
        .unwrap()
        .run()
        .await
        .expect("Harvest failed");
    let elapsed = started.elapsed();

    assert_eq!(summary.records, last_page as usize);

    // Nine pages through three slots take at least three full delays
    assert!(elapsed >= delay * 3, "finished too fast: {:?}", elapsed);

    // A request can only start once an earlier one has been answered, so
    // any `workers + 1` consecutive arrivals span at least one delay
    let arrivals = pages.arrivals();
    assert_eq!(arrivals.len(), last_page as usize);
    let slack = Duration::from_millis(100);
    for window in arrivals.windows(workers + 1) {
        let span = window[workers] - window[0];
        assert!(
            span + slack >= delay,
            "more than {} requests in flight (span {:?})",
            workers,
            span
        );
    }

    // The pool is actually used: the first batch starts together
    assert!(arrivals[workers - 1] - arrivals[0] < delay);

    mock_server.verify().await;
}

#[tokio::test]
async fn test_output_file_name_contains_run_date() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    mount_first_page(&mock_server, 1).await;
    mount_page(&mock_server, 1, 1, 1).await;

    let before = Local::now().date_naive();
    let config = create_test_config(&mock_server.uri(), output_dir.path(), 4);
    let summary = Coordinator::new(config)
        .unwrap()
        .run()
        .await
        .expect("Harvest failed");
    let after = Local::now().date_naive();

    let file_name = summary
        .output_path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned();
    let candidates = [
        format!("watches_{}.csv", before.format("%Y-%m-%d")),
        format!("watches_{}.csv", after.format("%Y-%m-%d")),
    ];
    assert!(
        candidates.contains(&file_name),
        "unexpected file name {}",
        file_name
    );
    assert_eq!(output_files(output_dir.path()), vec![summary.output_path.clone()]);
}

#[tokio::test]
async fn test_failing_page_aborts_without_output() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    mount_first_page(&mock_server, 5).await;
    for page in [1, 2, 4, 5] {
        Mock::given(method("GET"))
            .and(path(LISTING_PATH))
            .and(query_param("showpage", page.to_string().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_html(page, 2, 5)))
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("showpage", "3"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), output_dir.path(), 3);
    let mut coordinator = Coordinator::new(config).unwrap();
    let result = coordinator.run().await;

    assert!(matches!(
        result,
        Err(HarvestError::HttpStatus { status: 500, .. })
    ));
    assert_eq!(coordinator.state(), RunState::Failed);
    assert!(output_files(output_dir.path()).is_empty());
}

#[tokio::test]
async fn test_parse_failure_on_page_aborts_without_output() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    mount_first_page(&mock_server, 2).await;
    mount_page(&mock_server, 1, 2, 2).await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("showpage", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>maintenance</body></html>"),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), output_dir.path(), 1);
    let result = Coordinator::new(config).unwrap().run().await;

    assert!(matches!(result, Err(HarvestError::Parse { .. })));
    assert!(output_files(output_dir.path()).is_empty());
}

#[tokio::test]
async fn test_missing_pagination_fails_before_fetching_pages() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(NoPageParam)
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><div id="wt-watches"></div></body></html>"#),
        )
        .mount(&mock_server)
        .await;

    // No page may be requested once the probe has failed
    Mock::given(method("GET"))
        .and(query_param("showpage", "1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), output_dir.path(), 4);
    let mut coordinator = Coordinator::new(config).unwrap();
    let result = coordinator.run().await;

    assert!(matches!(result, Err(HarvestError::Parse { .. })));
    assert_eq!(coordinator.state(), RunState::Failed);
    assert!(output_files(output_dir.path()).is_empty());
    mock_server.verify().await;
}

#[tokio::test]
async fn test_probe_http_error() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), output_dir.path(), 4);
    let result = Coordinator::new(config).unwrap().run().await;

    assert!(matches!(
        result,
        Err(HarvestError::HttpStatus { status: 403, .. })
    ));
    assert!(output_files(output_dir.path()).is_empty());
}

#[tokio::test]
async fn test_all_pages_empty_writes_empty_export() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    mount_first_page(&mock_server, 2).await;
    mount_page(&mock_server, 1, 0, 2).await;
    mount_page(&mock_server, 2, 0, 2).await;

    let config = create_test_config(&mock_server.uri(), output_dir.path(), 2);
    let summary = Coordinator::new(config)
        .unwrap()
        .run()
        .await
        .expect("Harvest failed");

    assert_eq!(summary.records, 0);
    let content = std::fs::read_to_string(&summary.output_path).unwrap();
    assert!(content.is_empty());
}

#[tokio::test]
async fn test_coordinator_runs_once() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    mount_first_page(&mock_server, 1).await;
    mount_page(&mock_server, 1, 1, 1).await;

    let config = create_test_config(&mock_server.uri(), output_dir.path(), 1);
    let mut coordinator = Coordinator::new(config).unwrap();
    coordinator.run().await.expect("Harvest failed");

    let second = coordinator.run().await;
    assert!(matches!(
        second,
        Err(HarvestError::InvalidTransition {
            from: RunState::Done,
            ..
        })
    ));
    assert_eq!(coordinator.state(), RunState::Done);

    // The rejected rerun sends no requests
    mock_server.verify().await;
}
