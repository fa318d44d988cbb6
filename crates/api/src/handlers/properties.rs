use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use parcel_domain::Property;
use tracing::debug;

use crate::{
    dto::{ListQuery, PropertyListResponse, PropertyRequest, ResolutionResponse, SearchQuery},
    errors::into_response,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/properties", get(list_properties).post(create_property))
        .route("/api/properties/search", get(search_property))
        .route(
            "/api/properties/{id}",
            get(get_property)
                .put(update_property)
                .delete(delete_property),
        )
}

async fn list_properties(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PropertyListResponse>, (StatusCode, String)> {
    let ctx = state.request_context();
    let listing = state
        .list_properties
        .execute(&ctx, query.offset.unwrap_or(0), query.limit.unwrap_or(0))
        .await
        .map_err(into_response)?;

    debug!(count = listing.items.len(), cache_hit = listing.cache_hit, "Properties listed");
    Ok(Json(listing.into()))
}

async fn search_property(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ResolutionResponse>, (StatusCode, String)> {
    let ctx = state.request_context();
    let resolution = state
        .resolve_by_address
        .execute(&ctx, &query.address)
        .await
        .map_err(into_response)?;

    Ok(Json(resolution.into()))
}

async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResolutionResponse>, (StatusCode, String)> {
    let ctx = state.request_context();
    let resolution = state
        .resolve_by_id
        .execute(&ctx, &id)
        .await
        .map_err(into_response)?;

    Ok(Json(resolution.into()))
}

async fn create_property(
    State(state): State<AppState>,
    Json(req): Json<PropertyRequest>,
) -> Result<(StatusCode, Json<Property>), (StatusCode, String)> {
    let ctx = state.request_context();
    let created = state
        .create_property
        .execute(&ctx, req.into_property())
        .await
        .map_err(into_response)?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PropertyRequest>,
) -> Result<Json<Property>, (StatusCode, String)> {
    let ctx = state.request_context();
    let updated = state
        .update_property
        .execute(&ctx, &id, req.into_property())
        .await
        .map_err(into_response)?;

    Ok(Json(updated))
}

async fn delete_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let ctx = state.request_context();
    state
        .delete_property
        .execute(&ctx, &id)
        .await
        .map_err(into_response)?;

    Ok(StatusCode::NO_CONTENT)
}
