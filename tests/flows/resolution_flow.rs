#[path = "../common/mod.rs"]
mod common;

use common::{provider_detail, MockProvider, TestServer, SPRINGFIELD_QUERY};

async fn springfield_provider() -> MockProvider {
    let provider = MockProvider::start().await;
    provider
        .put(
            "123 MAIN ST",
            provider_detail("PRV-100", "123 Main Street", "Springfield", "IL", "62704"),
        )
        .await;
    provider
}

#[tokio::test]
async fn test_first_search_fetches_then_serves_from_cache() {
    let provider = springfield_provider().await;
    let server = TestServer::start(&provider.config()).await;

    let (status, first) = server.search(SPRINGFIELD_QUERY).await;
    assert_eq!(status, 200);
    assert_eq!(first["source"], "EXTERNAL_API");
    assert_eq!(first["cache_hit"], false);
    assert_eq!(first["property"]["property_id"], "PRV-100");
    assert_eq!(
        first["property"]["address"]["normalized"],
        "123 MAIN ST, SPRINGFIELD, IL 62704"
    );

    let (status, second) = server.search("123 main street,  springfield, il 62704").await;
    assert_eq!(status, 200);
    assert_eq!(second["source"], "CACHE");
    assert_eq!(second["cache_hit"], true);
    assert_eq!(provider.searches(), 1);
}

#[tokio::test]
async fn test_fresh_record_is_served_from_store_after_cache_loss() {
    let provider = springfield_provider().await;
    let server = TestServer::start(&provider.config()).await;

    server.search(SPRINGFIELD_QUERY).await;
    server.cache.clear().await;

    let (status, body) = server.search(SPRINGFIELD_QUERY).await;
    assert_eq!(status, 200);
    assert_eq!(body["source"], "STORE");
    assert_eq!(provider.searches(), 1);
}

#[tokio::test]
async fn test_stale_record_is_refreshed_in_place() {
    let provider = springfield_provider().await;
    let server = TestServer::start(&provider.config()).await;

    let (_, first) = server.search(SPRINGFIELD_QUERY).await;
    let created_at = first["property"]["created_at"].clone();

    server.age_record("PRV-100", 400).await;
    server.cache.clear().await;

    let (status, body) = server.search(SPRINGFIELD_QUERY).await;
    assert_eq!(status, 200);
    assert_eq!(body["source"], "EXTERNAL_API");
    assert_eq!(body["property"]["created_at"], created_at);
    assert_eq!(provider.searches(), 2);

    let (_, listing) = server.get("/api/properties").await;
    assert_eq!(listing["total"], 1);
}

#[tokio::test]
async fn test_provider_outage_surfaces_as_unavailable() {
    let provider = MockProvider::start().await;
    provider.set_down(true);
    let server = TestServer::start(&provider.config()).await;

    let (status, body) = server.search(SPRINGFIELD_QUERY).await;
    assert_eq!(status, 503);
    assert!(!body.to_string().contains("HTTP 503"));
}

#[tokio::test]
async fn test_unknown_id_is_bootstrapped_once() {
    let provider = MockProvider::start().await;
    let server = TestServer::start(&provider.config()).await;

    let (status, first) = server.get("/api/properties/NEW-1").await;
    assert_eq!(status, 200);
    assert_eq!(first["source"], "BOOTSTRAP");
    assert_eq!(first["property"]["property_id"], "NEW-1");

    let (status, second) = server.get("/api/properties/NEW-1").await;
    assert_eq!(status, 200);
    assert_eq!(second["source"], "CACHE");
    assert_eq!(second["property"]["address"], first["property"]["address"]);

    server.cache.clear().await;
    let (_, third) = server.get("/api/properties/NEW-1").await;
    assert_eq!(third["source"], "STORE");
}

#[tokio::test]
async fn test_search_without_city_is_rejected() {
    let provider = MockProvider::start().await;
    let server = TestServer::start(&provider.config()).await;

    let (status, _) = server.search("123 Main St").await;
    assert_eq!(status, 400);
    assert_eq!(provider.searches(), 0);
}
