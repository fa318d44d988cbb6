#[path = "../common/mod.rs"]
mod common;

use common::{property_body, provider_detail, MockProvider, TestServer, SPRINGFIELD_QUERY};
use parcel_application::ports::PropertyCache;
use parcel_domain::cache_key::{key_set_key, property_key, search_key};

#[tokio::test]
async fn test_update_is_visible_on_every_read_path() {
    let provider = MockProvider::start().await;
    provider
        .put(
            "123 MAIN ST",
            provider_detail("PRV-100", "123 Main St", "Springfield", "IL", "62704"),
        )
        .await;
    let server = TestServer::start(&provider.config()).await;

    server.search(SPRINGFIELD_QUERY).await;
    server.get("/api/properties/PRV-100").await;
    server.get("/api/properties").await;
    assert!(!server.cache.members(&key_set_key("PRV-100")).await.is_empty());

    let body = property_body("PRV-100", "9 Elm Road", "Springfield", "IL", "62704");
    let (status, updated) = server.put("/api/properties/PRV-100", &body).await;
    assert_eq!(status, 200);
    assert_eq!(updated["address"]["normalized"], "9 ELM RD, SPRINGFIELD, IL 62704");

    let old_search = search_key("123 MAIN ST", "SPRINGFIELD");
    assert!(server.cache.get(&old_search).await.unwrap().is_none());

    let (_, by_id) = server.get("/api/properties/PRV-100").await;
    assert_eq!(by_id["property"]["address"]["street"], "9 ELM RD");

    let (_, listing) = server.get("/api/properties").await;
    assert_eq!(listing["cache_hit"], false);
    assert_eq!(listing["items"][0]["address"]["street"], "9 ELM RD");

    let (_, by_new_address) = server.search("9 Elm Rd, Springfield, IL 62704").await;
    assert_eq!(by_new_address["source"], "STORE");
    assert_eq!(by_new_address["property"]["property_id"], "PRV-100");
}

#[tokio::test]
async fn test_delete_removes_record_and_cached_copies() {
    let provider = MockProvider::start().await;
    let server = TestServer::start(&provider.config()).await;

    let body = property_body("P-9", "77 Harbor Way", "Portland", "ME", "04101");
    let (status, _) = server.post("/api/properties", &body).await;
    assert_eq!(status, 201);

    let (_, cached) = server.get("/api/properties/P-9").await;
    assert_eq!(cached["source"], "CACHE");
    server.get("/api/properties").await;

    assert_eq!(server.delete("/api/properties/P-9").await, 204);
    assert!(server.cache.get(&property_key("P-9")).await.unwrap().is_none());
    assert!(server.cache.members(&key_set_key("P-9")).await.is_empty());

    let (_, listing) = server.get("/api/properties").await;
    assert_eq!(listing["total"], 0);

    assert_eq!(server.delete("/api/properties/P-9").await, 404);
}

#[tokio::test]
async fn test_create_then_search_hits_store_not_provider() {
    let provider = MockProvider::start().await;
    let server = TestServer::start(&provider.config()).await;

    let body = property_body("P-5", "500 Oak Avenue", "Miami", "FL", "33101");
    let (status, created) = server.post("/api/properties", &body).await;
    assert_eq!(status, 201);
    assert_eq!(created["address"]["normalized"], "500 OAK AVE, MIAMI, FL 33101");

    let (status, found) = server.search("500 Oak Ave, Miami, FL 33101").await;
    assert_eq!(status, 200);
    assert_eq!(found["property"]["property_id"], "P-5");
    assert_ne!(found["source"], "EXTERNAL_API");
    assert_eq!(provider.searches(), 0);

    let (status, _) = server.post("/api/properties", &body).await;
    assert_eq!(status, 409);
}

#[tokio::test]
async fn test_same_street_in_another_state_is_not_served_from_cache() {
    let provider = MockProvider::start().await;
    let server = TestServer::start(&provider.config()).await;

    server
        .post(
            "/api/properties",
            &property_body("IL-1", "123 Main St", "Springfield", "IL", "62704"),
        )
        .await;
    server
        .post(
            "/api/properties",
            &property_body("MO-1", "123 Main St", "Springfield", "MO", "65801"),
        )
        .await;

    let (_, illinois) = server.search(SPRINGFIELD_QUERY).await;
    assert_eq!(illinois["property"]["property_id"], "IL-1");

    let (_, missouri) = server.search("123 Main St, Springfield, MO 65801").await;
    assert_eq!(missouri["property"]["property_id"], "MO-1");
    assert_eq!(missouri["cache_hit"], false);
}
