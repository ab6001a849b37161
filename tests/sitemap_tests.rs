//! Integration tests for the sitemap crawler

use sitegauge::analyzer::Analyzer;
use sitegauge::config::Config;
use sitegauge::sitemap::SitemapCrawler;
use sitegauge::GaugeError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config() -> Config {
    let mut config = Config::default();
    config.request.timeout_seconds = 3;
    config
}

fn page_body(title: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body><p>content</p></body></html>",
        title
    )
}

async fn mount_page(server: &MockServer, route: &str, title: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page_body(title))
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_catch_all(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_crawl_respects_cap_and_document_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    let sitemap = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{base}/one</loc></url>
  <url><loc>{base}/two</loc></url>
  <url><loc>{base}/three</loc></url>
  <url><loc>https://elsewhere.invalid/off-domain</loc></url>
</urlset>"#,
    );

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(sitemap)
                .insert_header("content-type", "application/xml"),
        )
        .mount(&server)
        .await;

    mount_page(&server, "/one", "First page of the fixture site").await;
    mount_page(&server, "/two", "Second page of the fixture site").await;
    mount_page(&server, "/three", "Third page of the fixture site").await;

    // The robots probe must run once for the whole crawl, not per page
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
        .expect(1)
        .mount(&server)
        .await;

    mount_catch_all(&server).await;

    let crawler = SitemapCrawler::new(Analyzer::new(test_config()).unwrap());
    let reports = crawler
        .crawl(&format!("{}/sitemap.xml", base), Some(2))
        .await
        .unwrap();

    // Cap of 2 with 3 same-domain entries: exactly the first two, in
    // document order; the off-domain entry is never fetched.
    assert_eq!(reports.len(), 2);
    assert!(reports[0].url.ends_with("/one"));
    assert!(reports[1].url.ends_with("/two"));
}

#[tokio::test]
async fn test_failed_page_is_skipped_not_fatal() {
    let server = MockServer::start().await;
    let base = server.uri();

    let sitemap = format!(
        r#"<urlset>
  <url><loc>{base}/broken</loc></url>
  <url><loc>{base}/healthy</loc></url>
</urlset>"#,
    );

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    mount_page(&server, "/healthy", "The one page that still works").await;
    mount_catch_all(&server).await;

    let crawler = SitemapCrawler::new(Analyzer::new(test_config()).unwrap());
    let reports = crawler
        .crawl(&format!("{}/sitemap.xml", base), None)
        .await
        .unwrap();

    assert_eq!(reports.len(), 1);
    assert!(reports[0].url.ends_with("/healthy"));
}

#[tokio::test]
async fn test_unfetchable_sitemap_is_fatal() {
    let crawler = SitemapCrawler::new(Analyzer::new(test_config()).unwrap());
    let result = crawler.crawl("http://127.0.0.1:1/sitemap.xml", None).await;

    assert!(matches!(result.unwrap_err(), GaugeError::Sitemap { .. }));
}

#[tokio::test]
async fn test_missing_sitemap_is_fatal() {
    let server = MockServer::start().await;
    mount_catch_all(&server).await;

    let crawler = SitemapCrawler::new(Analyzer::new(test_config()).unwrap());
    let result = crawler
        .crawl(&format!("{}/sitemap.xml", server.uri()), None)
        .await;

    assert!(matches!(
        result.unwrap_err(),
        GaugeError::Sitemap { message, .. } if message.contains("404")
    ));
}
