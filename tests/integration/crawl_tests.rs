//! Integration tests for complete crawl workflows
//!
//! These tests run whole crawls against mock HTTP servers and check the
//! collected report.

use linkwalk::config::Config;
use linkwalk::crawler::{cancel_pair, crawl, CancelSignal, CrawlReport, FetchError};
use linkwalk::output::format_report;
use std::collections::HashSet;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, page: &str, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn run(server: &MockServer, config: Config) -> CrawlReport {
    crawl(&config, &format!("{}/", server.uri()), CancelSignal::never())
        .await
        .expect("crawl setup failed")
}

fn urls(report: &CrawlReport) -> HashSet<String> {
    report.results.iter().map(|r| r.url.path().to_string()).collect()
}

/// Test a small site with one broken link
#[tokio::test]
async fn test_basic_crawl_reports_broken_link() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<html><body>
            <a href="/about">About</a>
            <a href="/missing">Missing</a>
            <img src="/logo.png">
        </body></html>"#,
    )
    .await;
    mount_page(&server, "/about", "<html><body>About us</body></html>").await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![0x89, b'P', b'N', b'G'], "image/png"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let report = run(&server, Config::default()).await;

    assert_eq!(report.total(), 4);
    assert_eq!(
        urls(&report),
        HashSet::from(["/", "/about", "/missing", "/logo.png"].map(String::from))
    );

    let broken: Vec<_> = report.broken().collect();
    assert_eq!(broken.len(), 1);
    assert_eq!(broken[0].url.path(), "/missing");
    assert_eq!(broken[0].status, 404);
    assert!(broken[0].error.is_none());

    let text = format_report(&report);
    assert!(text.contains("Found 1 broken links:"));
    assert!(text.contains("/missing (Status: 404)"));
}

/// Pages that link to each other must each be fetched once
#[tokio::test]
async fn test_cyclic_links_terminate() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/a">a</a><a href="/">self</a>"#).await;
    mount_page(&server, "/a", r#"<a href="/b">b</a><a href="/">home</a>"#).await;
    mount_page(&server, "/b", r#"<a href="/a">a</a><a href="/">home</a>"#).await;

    let report = tokio::time::timeout(Duration::from_secs(10), run(&server, Config::default()))
        .await
        .expect("crawl did not terminate");

    assert_eq!(report.total(), 3);
    assert_eq!(report.broken_count(), 0);
}

/// Many pages linking to the same targets must not produce duplicates
#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let server = MockServer::start().await;

    let hub: String = (0..10)
        .map(|i| format!(r#"<a href="/p{}">p{}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", hub).await;
    for i in 0..10 {
        // every page links to every other page and to the shared asset
        let body: String = (0..10)
            .map(|j| format!(r#"<a href="/p{}">p{}</a>"#, j, j))
            .chain(std::iter::once(r#"<img src="/shared.gif">"#.to_string()))
            .collect();
        mount_page(&server, &format!("/p{}", i), body).await;
    }
    Mock::given(method("GET"))
        .and(path("/shared.gif"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let report = run(&server, Config::default()).await;

    assert_eq!(report.total(), 12);
    assert_eq!(urls(&report).len(), 12);
}

/// With a claim limit of 2 and five links on the seed page, only two URLs are fetched
#[tokio::test]
async fn test_claim_limit() {
    let server = MockServer::start().await;

    let links: String = (1..=5)
        .map(|i| format!(r#"<a href="/{}">{}</a>"#, i, i))
        .collect();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(links))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(html("leaf"))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.crawler.max_pages_to_visit = 2;

    let report = run(&server, config).await;

    assert_eq!(report.total(), 2);
    assert!(urls(&report).contains("/"));
}

/// Links to other hosts, schemes and ports are never requested
#[tokio::test]
async fn test_out_of_scope_links_not_fetched() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("elsewhere"))
        .expect(0)
        .mount(&other)
        .await;

    mount_page(
        &server,
        "/",
        format!(
            r#"<a href="{}/page">other port</a>
               <a href="https://example.invalid/">other host</a>
               <a href="mailto:someone@example.com">mail</a>
               <a href="javascript:void(0)">js</a>
               <a href="/inside">inside</a>"#,
            other.uri()
        ),
    )
    .await;
    mount_page(&server, "/inside", "ok").await;

    let report = run(&server, Config::default()).await;

    assert_eq!(
        urls(&report),
        HashSet::from(["/", "/inside"].map(String::from))
    );
}

/// Only HTML responses are parsed for links
#[tokio::test]
async fn test_non_html_not_parsed() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/data.json">data</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"link": "<a href=\"/hidden\">x</a>"}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(html("should not be reached"))
        .expect(0)
        .mount(&server)
        .await;

    let report = run(&server, Config::default()).await;

    assert_eq!(report.total(), 2);
}

/// HTML error pages are still parsed for links
#[tokio::test]
async fn test_error_page_links_followed() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/gone">gone</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(
            ResponseTemplate::new(404).set_body_raw(r#"<a href="/home">home</a>"#, "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/home", "home").await;

    let report = run(&server, Config::default()).await;

    assert_eq!(report.total(), 3);
    assert_eq!(report.broken_count(), 1);
}

/// Links differing only by fragment name one resource
#[tokio::test]
async fn test_fragment_links_deduplicated() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r##"<a href="/doc#intro">intro</a>
            <a href="/doc#usage">usage</a>
            <a href="#top">top</a>"##,
    )
    .await;
    mount_page(&server, "/doc", "doc").await;

    let report = run(&server, Config::default()).await;

    assert_eq!(report.total(), 2);
    assert!(report.results.iter().all(|r| r.url.fragment().is_none()));
}

/// Child requests carry the referring page
#[tokio::test]
async fn test_referer_header_sent() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    mount_page(&server, "/", r#"<a href="/child">child</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/child"))
        .and(header("referer", seed.as_str()))
        .respond_with(html("child"))
        .expect(1)
        .mount(&server)
        .await;

    let report = run(&server, Config::default()).await;

    assert_eq!(report.total(), 2);
    assert_eq!(report.broken_count(), 0);
}

/// Cookies set by one page are sent with later requests
#[tokio::test]
async fn test_cookies_carried_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            html(r#"<a href="/next">next</a>"#).insert_header("set-cookie", "sid=42; Path=/"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .and(header("cookie", "sid=42"))
        .respond_with(html("signed in"))
        .expect(1)
        .mount(&server)
        .await;

    let report = run(&server, Config::default()).await;

    assert_eq!(report.total(), 2);
    assert_eq!(report.broken_count(), 0);
}

/// Links are resolved against the page the redirect landed on
#[tokio::test]
async fn test_redirect_followed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "/docs/index.html"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/docs/index.html", r#"<a href="page.html">page</a>"#).await;
    mount_page(&server, "/docs/page.html", "page").await;

    let report = run(&server, Config::default()).await;

    assert_eq!(
        urls(&report),
        HashSet::from(["/", "/docs/page.html"].map(String::from))
    );
    assert_eq!(report.results.iter().find(|r| r.url.path() == "/").map(|r| r.status), Some(200));
}

/// Fetches that outlive the timeout are broken with status 0
#[tokio::test]
async fn test_timeout_reported_as_broken() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/slow">slow</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.http.request_timeout = Duration::from_millis(500);

    let report = run(&server, config).await;

    let slow = report
        .results
        .iter()
        .find(|r| r.url.path() == "/slow")
        .expect("slow page missing from report");
    assert_eq!(slow.status, 0);
    assert_eq!(slow.error, Some(FetchError::Timeout));
    assert!(slow.is_broken());
}

/// Cancelling mid-crawl reports in-flight requests as broken and finishes
#[tokio::test]
async fn test_cancellation_produces_broken_results() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/slow1">1</a><a href="/slow2">2</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow1"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow2"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.http.request_timeout = Duration::from_secs(60);

    let (handle, cancel) = cancel_pair();
    let seed = format!("{}/", server.uri());
    let crawler = tokio::spawn(async move { crawl(&config, &seed, cancel).await });

    tokio::time::sleep(Duration::from_millis(500)).await;
    handle.cancel();

    let report = tokio::time::timeout(Duration::from_secs(5), crawler)
        .await
        .expect("crawl did not stop after cancellation")
        .unwrap()
        .unwrap();

    assert_eq!(report.total(), 3);
    assert_eq!(report.broken_count(), 2);
    for result in report.broken() {
        assert_eq!(result.error, Some(FetchError::Cancelled));
        assert_eq!(result.status, 0);
    }
}

/// Jitter slows requests down but every URL is still checked
#[tokio::test]
async fn test_jitter_and_bounded_concurrency() {
    let server = MockServer::start().await;

    let links: String = (0..6)
        .map(|i| format!(r#"<a href="/j{}">{}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", links).await;
    for i in 0..6 {
        mount_page(&server, &format!("/j{}", i), "leaf").await;
    }

    let mut config = Config::default();
    config.crawler.max_jitter_delay = Duration::from_millis(20);
    config.crawler.max_concurrent_requests = 2;

    let report = run(&server, config).await;

    assert_eq!(report.total(), 7);
    assert_eq!(report.broken_count(), 0);
}

/// A bad start URL is a setup error, not a report
#[tokio::test]
async fn test_invalid_seed_is_fatal() {
    let config = Config::default();

    assert!(crawl(&config, "not a url", CancelSignal::never()).await.is_err());
    assert!(crawl(&config, "ftp://example.com/", CancelSignal::never())
        .await
        .is_err());
}

/// An unreachable seed is reported, not fatal
#[tokio::test]
async fn test_unreachable_seed_reported() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let report = crawl(
        &Config::default(),
        &format!("http://127.0.0.1:{}/", port),
        CancelSignal::never(),
    )
    .await
    .unwrap();

    assert_eq!(report.total(), 1);
    assert_eq!(report.broken_count(), 1);
    assert!(matches!(report.results[0].error, Some(FetchError::Connect(_))));
}
