//! Integration tests for `BricklinkScraper::fetch_item_prices`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made. Each test serves the two pages of a fetch (item
//! page, price guide page) from fixtures and asserts on the assembled
//! summary or the propagated error.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use brickmarket::catalog::{BricklinkScraper, CatalogSource};
use brickmarket::config::CatalogConfig;
use brickmarket::error::ScrapeError;
use brickmarket::models::{ItemKind, Money, PriceBucket};

/// Scraper pointed at the mock server, with a short timeout.
fn test_scraper(server: &MockServer) -> BricklinkScraper {
    let config = CatalogConfig {
        base_url: server.uri(),
        timeout_secs: 5,
        ..Default::default()
    };
    BricklinkScraper::new(&config).expect("failed to build test scraper")
}

fn item_url(server: &MockServer, query: &str) -> String {
    format!("{}/v2/catalog/catalogitem.page?{query}", server.uri())
}

const ITEM_PAGE: &str = r#"<html><body>
    <h1 id="item-name-title">Race Car Transporter</h1>
    <span id="item-weight-info">469.3g</span>
</body></html>"#;

const FULL_CELL: &str = "<b>Times Sold:</b> 12<br><b>Total Lots:</b> 5<br>\
    <b>Total Qty:</b> 20<br><b>Min Price:</b> USD 10.00<br>\
    <b>Avg Price:</b> USD 15.25<br><b>Qty Avg Price:</b> USD 14.80<br>\
    <b>Max Price:</b> USD 25.50";

/// The price guide's nested-table skeleton with one `<td>` per cell body.
fn price_guide_page(cells: &[&str]) -> String {
    let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
    format!(
        r#"<html><body>
        <table id="id-main-legacy-table">
          <tr><td>
            <table>
              <tr><td>Price Guide</td></tr>
              <tr><td>Past 6 Months Sales | Current Items for Sale</td></tr>
              <tr>
                <td><table><tr>{tds}</tr></table></td>
              </tr>
            </table>
          </td></tr>
        </table>
        </body></html>"#
    )
}

fn full_bucket() -> PriceBucket {
    PriceBucket {
        times_sold: Some(12),
        total_lots: Some(5),
        total_qty: Some(20),
        min_price: Some(Money {
            currency: "USD".to_string(),
            amount: 10.00,
        }),
        avg_price: Some(Money {
            currency: "USD".to_string(),
            amount: 15.25,
        }),
        qty_avg_price: Some(Money {
            currency: "USD".to_string(),
            amount: 14.80,
        }),
        max_price: Some(Money {
            currency: "USD".to_string(),
            amount: 25.50,
        }),
    }
}

async fn mount_item_page(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/v2/catalog/catalogitem.page"))
        .and(query_param("S", "31113-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_price_guide(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/catalogPG.asp"))
        .and(query_param("S", "31113-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Happy path: header plus four populated buckets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_assembles_header_and_four_buckets() {
    let server = MockServer::start().await;
    mount_item_page(&server, ITEM_PAGE).await;
    mount_price_guide(
        &server,
        &price_guide_page(&[FULL_CELL, FULL_CELL, FULL_CELL, FULL_CELL]),
    )
    .await;

    let summary = test_scraper(&server)
        .fetch_item_prices(&item_url(&server, "S=31113-1"))
        .await
        .expect("fetch should succeed");

    assert_eq!(summary.locator.kind, ItemKind::Set);
    assert_eq!(summary.locator.id, "31113-1");
    assert_eq!(summary.title.as_deref(), Some("Race Car Transporter"));
    assert_eq!(summary.weight.as_deref(), Some("469.3g"));
    assert_eq!(summary.six_month_new, Some(full_bucket()));
    assert_eq!(summary.six_month_used, Some(full_bucket()));
    assert_eq!(summary.current_new, Some(full_bucket()));
    assert_eq!(summary.current_used, Some(full_bucket()));
}

// ---------------------------------------------------------------------------
// Unavailable cell: that bucket alone is null
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unavailable_cell_yields_null_bucket() {
    let server = MockServer::start().await;
    mount_item_page(&server, ITEM_PAGE).await;
    mount_price_guide(
        &server,
        &price_guide_page(&[FULL_CELL, "(Unavailable)", FULL_CELL, FULL_CELL]),
    )
    .await;

    let summary = test_scraper(&server)
        .fetch_item_prices(&item_url(&server, "S=31113-1"))
        .await
        .unwrap();

    assert!(summary.six_month_new.is_some());
    assert!(summary.six_month_used.is_none());
    assert!(summary.current_new.is_some());
    assert!(summary.current_used.is_some());
}

// ---------------------------------------------------------------------------
// Fewer than four cells: all-or-nothing leaves every bucket null
// ---------------------------------------------------------------------------

#[tokio::test]
async fn short_price_guide_leaves_all_buckets_null() {
    let server = MockServer::start().await;
    mount_item_page(&server, ITEM_PAGE).await;
    mount_price_guide(
        &server,
        &price_guide_page(&[FULL_CELL, FULL_CELL, FULL_CELL]),
    )
    .await;

    let summary = test_scraper(&server)
        .fetch_item_prices(&item_url(&server, "S=31113-1"))
        .await
        .unwrap();

    assert!(summary.six_month_new.is_none());
    assert!(summary.six_month_used.is_none());
    assert!(summary.current_new.is_none());
    assert!(summary.current_used.is_none());
    // The header still comes from the first request.
    assert_eq!(summary.title.as_deref(), Some("Race Car Transporter"));
}

// ---------------------------------------------------------------------------
// Missing header elements are optional
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_title_and_weight_are_null() {
    let server = MockServer::start().await;
    mount_item_page(&server, "<html><body><p>stripped page</p></body></html>").await;
    mount_price_guide(
        &server,
        &price_guide_page(&[FULL_CELL, FULL_CELL, FULL_CELL, FULL_CELL]),
    )
    .await;

    let summary = test_scraper(&server)
        .fetch_item_prices(&item_url(&server, "S=31113-1"))
        .await
        .unwrap();

    assert!(summary.title.is_none());
    assert!(summary.weight.is_none());
    assert!(summary.six_month_new.is_some());
}

// ---------------------------------------------------------------------------
// HTTP failures propagate, fatal to the invocation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn item_page_404_propagates_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/catalog/catalogitem.page"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = test_scraper(&server)
        .fetch_item_prices(&item_url(&server, "S=31113-1"))
        .await;

    match result.unwrap_err() {
        ScrapeError::UnexpectedStatus { status, .. } => assert_eq!(status, 404),
        other => panic!("expected ScrapeError::UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn price_guide_500_propagates_unexpected_status() {
    let server = MockServer::start().await;
    mount_item_page(&server, ITEM_PAGE).await;

    Mock::given(method("GET"))
        .and(path("/catalogPG.asp"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = test_scraper(&server)
        .fetch_item_prices(&item_url(&server, "S=31113-1"))
        .await;

    match result.unwrap_err() {
        ScrapeError::UnexpectedStatus { status, .. } => assert_eq!(status, 500),
        other => panic!("expected ScrapeError::UnexpectedStatus, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// No recognized locator parameter: fails before any request
// ---------------------------------------------------------------------------

#[tokio::test]
async fn url_without_locator_fails_without_fetching() {
    let server = MockServer::start().await;

    let result = test_scraper(&server)
        .fetch_item_prices(&item_url(&server, "ref=homepage"))
        .await;

    assert!(matches!(
        result.unwrap_err(),
        ScrapeError::LocatorNotFound { .. }
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}
