use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    auth::dtos::ErrorResponse,
    context::RequestContext,
    extract::{JsonBody, QueryParams},
    items::{
        dtos::{
            BatchImportRequest, BatchImportResponse, DiscoverLinksRequest, DiscoverLinksResponse,
            ImportItemRequest, ItemListResponse, ItemResponse, ListItemsQuery,
        },
        errors::ItemsError,
    },
};

#[utoipa::path(
    get,
    path = "/v1/items",
    tag = "items",
    params(ListItemsQuery),
    responses(
        (status = 200, description = "Caller's items, newest first", body = ItemListResponse),
        (status = 400, description = "Unknown status filter", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip_all, fields(user_id = %ctx.user_id, request_id = %ctx.request_id()))]
pub async fn list_items(
    ctx: RequestContext,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListItemsQuery>,
) -> Result<Json<ItemListResponse>, ItemsError> {
    let items = state
        .item_repo
        .list_for_user(ctx.user_id, &query.into())
        .await?;

    Ok(Json(ItemListResponse {
        items: items.into_iter().map(ItemResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/v1/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "The item", body = ItemResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such item for this user", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip_all, fields(user_id = %ctx.user_id, request_id = %ctx.request_id(), item_id = %id))]
pub async fn get_item(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse>, ItemsError> {
    // An id that is not a UUID cannot name a stored item.
    let id = Uuid::parse_str(&id).map_err(|_| ItemsError::NotFound)?;

    state
        .item_repo
        .find_for_user(id, ctx.user_id)
        .await?
        .map(|item| Json(item.into()))
        .ok_or(ItemsError::NotFound)
}

#[utoipa::path(
    post,
    path = "/v1/items",
    tag = "items",
    request_body = ImportItemRequest,
    responses(
        (status = 201, description = "Item stored as COMPLETED or FAILED", body = ItemResponse),
        (status = 400, description = "Invalid URL", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn import_item(
    ctx: RequestContext,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ImportItemRequest>,
) -> Result<(StatusCode, Json<ItemResponse>), ItemsError> {
    payload.validate().map_err(ItemsError::Validation)?;

    let outcome = state.importer.import_url(&ctx, &payload.url).await?;
    Ok((StatusCode::CREATED, Json(outcome.item.into())))
}

#[utoipa::path(
    post,
    path = "/v1/items/batch",
    tag = "items",
    request_body = BatchImportRequest,
    responses(
        (status = 200, description = "One terminal item per URL, in order", body = BatchImportResponse),
        (status = 400, description = "At least one invalid URL", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn import_batch(
    ctx: RequestContext,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<BatchImportRequest>,
) -> Result<Json<BatchImportResponse>, ItemsError> {
    payload.validate().map_err(ItemsError::Validation)?;

    let report = state.importer.import_batch(&ctx, &payload.urls).await?;
    Ok(Json(report.into()))
}

#[utoipa::path(
    post,
    path = "/v1/items/discover",
    tag = "items",
    request_body = DiscoverLinksRequest,
    responses(
        (status = 200, description = "Up to 25 links found on the site", body = DiscoverLinksResponse),
        (status = 400, description = "Invalid URL", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 502, description = "Extraction service failed", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn discover_links(
    ctx: RequestContext,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<DiscoverLinksRequest>,
) -> Result<Json<DiscoverLinksResponse>, ItemsError> {
    payload.validate().map_err(ItemsError::Validation)?;

    let links = state.importer.discover(&ctx, &payload.into()).await?;
    info!(user_id = %ctx.user_id, count = links.len(), "returning discovered links");
    Ok(Json(DiscoverLinksResponse { links }))
}
