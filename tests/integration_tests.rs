//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML config → aggregator → HTTP listing → snapshots

use serde_json::json;
use server_browser::aggregator::{
    Aggregator, AggregatorEvent, AggregatorHandle, ChannelConsumer, PageUpdate,
};
use server_browser::config::AppConfig;
use server_browser::listing::HttpListingClient;
use server_browser::ErrorKind;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn servers(start: u32, count: u32) -> serde_json::Value {
    let items: Vec<_> = (start..start + count)
        .map(|i| {
            json!({
                "name": format!("server-{i}"),
                "map": "q3dm17",
                "players": i % 16,
                "max_players": 16,
                "country": "SE",
                "ip": format!("10.0.{}.{}", i / 256, i % 256),
                "port": 27960
            })
        })
        .collect();
    json!({ "servers": items })
}

fn config_yaml(server: &MockServer, page_size: u32, auth: &str) -> String {
    format!(
        r"
listing:
  endpoint: {}/v1/servers
  filter:
    game: quake3
  page_size: {page_size}
auth:
{auth}
http:
  timeout_secs: 5
",
        server.uri()
    )
}

const TOKEN_AUTH: &str = "  type: token\n  token: integration-token";

fn spawn(config: &AppConfig) -> (AggregatorHandle, UnboundedReceiver<AggregatorEvent>) {
    let client = HttpListingClient::from_config(config).unwrap();
    let (consumer, events) = ChannelConsumer::new();
    let handle = Aggregator::spawn(
        Arc::new(client),
        config.listing.filter.clone(),
        config.listing.page_size,
        consumer,
    );
    (handle, events)
}

async fn next_event(events: &mut UnboundedReceiver<AggregatorEvent>) -> AggregatorEvent {
    tokio::time::timeout(Duration::from_secs(10), events.recv())
        .await
        .expect("timed out waiting for aggregator")
        .expect("aggregator stopped")
}

async fn next_page(events: &mut UnboundedReceiver<AggregatorEvent>) -> PageUpdate {
    loop {
        match next_event(events).await {
            AggregatorEvent::PageAppended(update) => return update,
            AggregatorEvent::Reset => {}
            AggregatorEvent::FetchFailed(failure) => panic!("fetch failed: {failure}"),
        }
    }
}

async fn mount_page(server: &MockServer, offset: u32, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/servers"))
        .and(query_param("offset", offset.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// End-to-end Tests
// ============================================================================

#[tokio::test]
async fn test_pages_until_short_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/servers"))
        .and(query_param("game", "quake3"))
        .and(query_param("limit", "100"))
        .and(query_param("offset", "0"))
        .and(header("Authorization", "Bearer integration-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(servers(0, 100)))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, 100, servers(100, 37)).await;

    let config = AppConfig::from_yaml_str(&config_yaml(&server, 100, TOKEN_AUTH)).unwrap();
    let (handle, mut events) = spawn(&config);

    handle.request_more().unwrap();
    let first = next_page(&mut events).await;
    assert_eq!(first.snapshot.len(), 100);
    assert!(first.has_more);

    handle.request_more().unwrap();
    let second = next_page(&mut events).await;
    assert_eq!(second.snapshot.len(), 137);
    assert!(!second.has_more);
    assert_eq!(second.new_items().len(), 37);
    assert_eq!(second.new_items()[0].name, "server-100");
    assert_eq!(second.snapshot[136].name, "server-136");
    assert_eq!(second.snapshot[5].players_display(), "5/16");

    // Exhausted: no third request reaches the server
    handle.request_more().unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(handle.status().is_exhausted());
    assert_eq!(handle.status().stats.requests_issued, 2);

    handle.shutdown().unwrap();
}

#[tokio::test]
async fn test_reset_restarts_from_first_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(servers(0, 2)))
        .expect(2)
        .mount(&server)
        .await;
    mount_page(&server, 2, servers(2, 1)).await;

    let config = AppConfig::from_yaml_str(&config_yaml(&server, 2, TOKEN_AUTH)).unwrap();
    let (handle, mut events) = spawn(&config);

    handle.reset().unwrap();
    assert_eq!(next_page(&mut events).await.snapshot.len(), 2);
    handle.request_more().unwrap();
    assert_eq!(next_page(&mut events).await.snapshot.len(), 3);

    handle.reset().unwrap();
    let restarted = next_page(&mut events).await;
    assert_eq!(restarted.snapshot.len(), 2);
    assert_eq!(restarted.offset, 0);
    assert!(restarted.has_more);
    assert_eq!(handle.status().epoch, 2);
}

#[tokio::test]
async fn test_server_error_then_manual_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("listing down"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, 0, servers(0, 3)).await;

    let config = AppConfig::from_yaml_str(&config_yaml(&server, 10, TOKEN_AUTH)).unwrap();
    let (handle, mut events) = spawn(&config);

    handle.request_more().unwrap();
    let AggregatorEvent::FetchFailed(failure) = next_event(&mut events).await else {
        panic!("expected a failed fetch");
    };
    assert_eq!(failure.kind, ErrorKind::Transport);
    assert_eq!(failure.offset, 0);
    assert!(handle.snapshot().is_empty());
    assert!(handle.status().has_more());

    handle.request_more().unwrap();
    let update = next_page(&mut events).await;
    assert_eq!(update.snapshot.len(), 3);
    assert!(!update.has_more);
}

#[tokio::test]
async fn test_malformed_body_leaves_collection_untouched() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "maintenance"})))
        .mount(&server)
        .await;

    let config = AppConfig::from_yaml_str(&config_yaml(&server, 10, TOKEN_AUTH)).unwrap();
    let (handle, mut events) = spawn(&config);

    handle.request_more().unwrap();
    let AggregatorEvent::FetchFailed(failure) = next_event(&mut events).await else {
        panic!("expected a failed fetch");
    };
    assert_eq!(failure.kind, ErrorKind::MalformedPayload);
    assert!(handle.snapshot().is_empty());
    assert_eq!(handle.status().offset(), 0);
}

#[tokio::test]
async fn test_missing_credential_never_reaches_server() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(servers(0, 1)))
        .expect(0)
        .mount(&server)
        .await;

    let auth = "  type: env\n  var: SERVER_BROWSER_INTEGRATION_TOKEN_UNSET";
    let config = AppConfig::from_yaml_str(&config_yaml(&server, 10, auth)).unwrap();
    let (handle, mut events) = spawn(&config);

    handle.request_more().unwrap();
    let AggregatorEvent::FetchFailed(failure) = next_event(&mut events).await else {
        panic!("expected a failed fetch");
    };
    assert!(failure.kind.is_configuration());
    assert!(handle.snapshot().is_empty());
}

#[tokio::test]
async fn test_duplicate_triggers_during_slow_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(servers(0, 5))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = AppConfig::from_yaml_str(&config_yaml(&server, 10, TOKEN_AUTH)).unwrap();
    let (handle, mut events) = spawn(&config);

    for _ in 0..20 {
        handle.request_more().unwrap();
    }

    let update = next_page(&mut events).await;
    assert_eq!(update.snapshot.len(), 5);
    assert_eq!(handle.status().stats.requests_issued, 1);
}
