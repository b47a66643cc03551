//! Integration tests for feed pagination against a mocked backend.
//!
//! These exercise the API client and the feed engine together: query-string
//! construction, page accumulation, exhaustion on the last page, folder
//! scoping, the publisher flag, and error handling.

use chrono::NaiveDate;
use gamescout::api::{ApiClient, ApiError};
use gamescout::feed::{FeedEngine, FeedPhase, PageOutcome};
use gamescout::filters::FilterState;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> ApiClient {
    ApiClient::new(&format!("{}/api", server.uri()), None).unwrap()
}

fn test_filters() -> FilterState {
    FilterState::new(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
}

fn app_json(bundle_id: &str, title: &str) -> serde_json::Value {
    json!({
        "platform": "android",
        "bundleId": bundle_id,
        "title": title,
        "developerName": "Acme Games",
        "screenshots": []
    })
}

fn page_json(apps: Vec<serde_json::Value>, total_pages: u32) -> serde_json::Value {
    json!({ "data": apps, "totalPages": total_pages })
}

#[tokio::test]
async fn date_range_feed_sends_expected_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/apps/date-range"))
        .and(query_param("start", "2024-06-15"))
        .and(query_param("end", "2024-06-15"))
        .and(query_param("platform", "all"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "20"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(vec![app_json("com.acme.one", "One")], 3)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let page = client.fetch_feed_page(&test_filters(), 1, 20).await.unwrap();

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].title, "One");
    assert_eq!(page.total_pages, 3);
}

#[tokio::test]
async fn pages_accumulate_until_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/apps/date-range"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![app_json("com.acme.one", "One"), app_json("com.acme.two", "Two")],
            2,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/apps/date-range"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![app_json("com.acme.three", "Three")],
            2,
        )))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let filters = test_filters();
    let mut engine = FeedEngine::new();

    let plan = engine.reset();
    assert_eq!(plan.page, 1);
    let result = client.fetch_feed_page(&filters, plan.page, 20).await;
    let outcome = engine.apply_page(plan.generation, plan.page, result);
    assert_eq!(
        outcome,
        PageOutcome::Applied {
            appended: 2,
            exhausted: false
        }
    );
    assert!(engine.has_more());

    let plan = engine.sentinel_visible().expect("second page planned");
    assert_eq!(plan.page, 2);
    let result = client.fetch_feed_page(&filters, plan.page, 20).await;
    let outcome = engine.apply_page(plan.generation, plan.page, result);
    assert_eq!(
        outcome,
        PageOutcome::Applied {
            appended: 1,
            exhausted: true
        }
    );

    assert_eq!(engine.apps().len(), 3);
    assert!(!engine.has_more());
    assert!(engine.sentinel_visible().is_none());
}

#[tokio::test]
async fn folder_scope_routes_to_bookmarked_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/apps/bookmarked"))
        .and(query_param("folder", "Favorites"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(vec![app_json("com.acme.fav", "Fav")], 1)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut filters = test_filters();
    filters.folder = Some("Favorites".to_string());

    let page = client.fetch_feed_page(&filters, 1, 20).await.unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn publisher_flag_rides_on_date_range_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/apps/date-range"))
        .and(query_param("isPublisher", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 1)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut filters = test_filters();
    filters.publishers_only = true;

    client.fetch_feed_page(&filters, 1, 20).await.unwrap();
}

#[tokio::test]
async fn server_error_puts_engine_in_error_phase() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/apps/date-range"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let filters = test_filters();
    let mut engine = FeedEngine::new();

    let plan = engine.reset();
    let result = client.fetch_feed_page(&filters, plan.page, 20).await;
    assert!(matches!(result, Err(ApiError::HttpStatus(500))));

    let outcome = engine.apply_page(plan.generation, plan.page, result);
    assert_eq!(outcome, PageOutcome::Failed);
    assert_eq!(engine.phase(), FeedPhase::Error);
    assert!(engine.last_error().is_some());
}

#[tokio::test]
async fn malformed_page_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/apps/date-range"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "nope": true })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.fetch_feed_page(&test_filters(), 1, 20).await;
    assert!(matches!(result, Err(ApiError::Decode(_))));
}
