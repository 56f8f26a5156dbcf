use job_harvester::config::{Config, UserAgentConfig};
use job_harvester::crawler::{discover_page_count, HarvestContext, Harvester};
use job_harvester::crawler::build_http_client;
use job_harvester::HarvestError;
use std::path::Path;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

const DETAIL_PREFIX: &str = "https://kr.indeed.com/%EC%B7%A8%EC%97%85?q=python&vjk=";
const DETAIL_SUFFIX: &str = "&advn=1729840185424618";

/// Matches requests for the bare base URL (no page offset)
struct WithoutStart;

impl Match for WithoutStart {
    fn matches(&self, request: &Request) -> bool {
        !request.url.query_pairs().any(|(key, _)| key == "start")
    }
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(server_uri: &str) -> Config {
    let mut config = Config::default();
    config.scraper.base_url = format!("{}/jobs?q=python&limit=50", server_uri);
    config.scraper.max_concurrent_pages = 4;
    config.scraper.max_concurrent_tasks = 4;
    config.scraper.request_timeout_secs = 5;
    config.user_agent = UserAgentConfig {
        crawler_name: "TestHarvester".to_string(),
        crawler_version: "1.0".to_string(),
    };
    config
}

fn pagination_page(links: usize) -> String {
    let anchors: String = (0..links)
        .map(|n| format!(r#"<li><a href="/jobs?q=python&start={}">{}</a></li>"#, n * 50, n + 1))
        .collect();
    format!(
        r#"<html><body><nav><ul class="pagination">{}</ul></nav></body></html>"#,
        anchors
    )
}

fn listing_page(ids: &[&str]) -> String {
    let cards: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<a class="tapItem sponTapItem" data-jk="{id}">
                    <h2 class="jobTitle"><span>Python   Developer {id}</span></h2>
                    <span class="companyName">Acme {id}</span>
                    <div class="companyLocation">Seoul</div>
                    <div class="job-snippet">Build
                        services</div>
                </a>"#
            )
        })
        .collect();
    format!(r#"<html><body><div id="results">{}</div></body></html>"#, cards)
}

async fn mount_discovery(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .and(WithoutStart)
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, start: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .and(query_param("start", start))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

fn read_rows(path: &Path) -> Vec<csv::StringRecord> {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open output");
    reader
        .records()
        .map(|record| record.expect("Malformed row"))
        .collect()
}

#[tokio::test]
async fn test_full_harvest_two_pages() {
    let mock_server = MockServer::start().await;

    mount_discovery(&mock_server, pagination_page(2)).await;
    mount_page(
        &mock_server,
        "0",
        ResponseTemplate::new(200).set_body_string(listing_page(&["a1", "a2"])),
    )
    .await;
    mount_page(
        &mock_server,
        "50",
        ResponseTemplate::new(200).set_body_string(listing_page(&["b1"])),
    )
    .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("jobs.csv");

    let harvester = Harvester::new(create_test_config(&mock_server.uri()))
        .expect("Failed to create harvester");
    let stats = harvester.run_to(&output).await.expect("Harvest failed");

    assert_eq!(stats.pages, 2);
    assert_eq!(stats.records_per_page, vec![2, 1]);
    assert_eq!(stats.total_records, 3);
    assert_eq!(stats.rows_written, 3);
    assert!(stats.is_complete());

    let text = std::fs::read_to_string(&output).expect("Failed to read output");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "ID,Title,Company,Location,Summary");

    let rows = read_rows(&output);
    assert_eq!(rows.len(), 3);
    for (row, id) in rows.iter().zip(["a1", "a2", "b1"]) {
        assert_eq!(row.len(), 5);
        assert!(row[0].contains(id), "row {:?} should reference {}", row, id);
        assert_eq!(&row[0], format!("{}{}{}", DETAIL_PREFIX, id, DETAIL_SUFFIX));
        assert_eq!(&row[1], format!(" Python Developer {}", id));
        assert_eq!(&row[2], format!("Acme {}", id));
        assert_eq!(&row[3], "Seoul");
        assert_eq!(&row[4], "Build services");
    }
}

#[tokio::test]
async fn test_no_pagination_writes_header_only() {
    let mock_server = MockServer::start().await;

    mount_discovery(
        &mock_server,
        "<html><body><p>No results</p></body></html>".to_string(),
    )
    .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("jobs.csv");

    let harvester = Harvester::new(create_test_config(&mock_server.uri()))
        .expect("Failed to create harvester");
    let stats = harvester.run_to(&output).await.expect("Harvest failed");

    assert_eq!(stats.pages, 0);
    assert_eq!(stats.total_records, 0);

    let text = std::fs::read_to_string(&output).expect("Failed to read output");
    assert_eq!(text, "ID,Title,Company,Location,Summary\n");
}

#[tokio::test]
async fn test_page_failure_aborts_before_output() {
    let mock_server = MockServer::start().await;

    mount_discovery(&mock_server, pagination_page(2)).await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&["a1"])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .and(query_param("start", "50"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("jobs.csv");

    let harvester = Harvester::new(create_test_config(&mock_server.uri()))
        .expect("Failed to create harvester");
    let result = harvester.run_to(&output).await;

    assert!(
        matches!(result, Err(HarvestError::Status { status: 500, .. })),
        "expected a 500 status error, got {:?}",
        result.map(|stats| stats.rows_written)
    );
    assert!(!output.exists(), "no output file may be written on failure");
}

#[tokio::test]
async fn test_discovery_failure_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("jobs.csv");

    let harvester = Harvester::new(create_test_config(&mock_server.uri()))
        .expect("Failed to create harvester");
    let result = harvester.run_to(&output).await;

    assert!(matches!(
        result,
        Err(HarvestError::Status { status: 404, .. })
    ));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_many_cards_keep_document_order() {
    let mock_server = MockServer::start().await;

    let ids: Vec<String> = (0..120).map(|n| format!("job{:03}", n)).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();

    mount_discovery(&mock_server, pagination_page(1)).await;
    mount_page(
        &mock_server,
        "0",
        ResponseTemplate::new(200).set_body_string(listing_page(&id_refs)),
    )
    .await;

    let harvester = Harvester::new(create_test_config(&mock_server.uri()))
        .expect("Failed to create harvester");
    let jobs = harvester.collect().await.expect("Harvest failed");

    let collected: Vec<&str> = jobs.iter().map(|job| job.id.as_str()).collect();
    assert_eq!(collected, id_refs);
}

#[tokio::test]
async fn test_discovery_sends_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobs"))
        .and(header("user-agent", "TestHarvester/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(pagination_page(3)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let client = build_http_client(&config.scraper, &config.user_agent)
        .expect("Failed to build client");
    let context = HarvestContext::from_config(&config).expect("Failed to build context");

    let pages = discover_page_count(&client, &context)
        .await
        .expect("Discovery failed");
    assert_eq!(pages, 3);
}

#[tokio::test]
async fn test_title_padding_can_be_disabled() {
    let mock_server = MockServer::start().await;

    mount_discovery(&mock_server, pagination_page(1)).await;
    mount_page(
        &mock_server,
        "0",
        ResponseTemplate::new(200).set_body_string(listing_page(&["c1"])),
    )
    .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("jobs.csv");

    let mut config = create_test_config(&mock_server.uri());
    config.output.title_leading_space = false;

    let harvester = Harvester::new(config).expect("Failed to create harvester");
    harvester.run_to(&output).await.expect("Harvest failed");

    let rows = read_rows(&output);
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][1], "Python Developer c1");
}
