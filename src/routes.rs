use axum::{
    Router,
    body::Body,
    http::{HeaderName, Request},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    app_state::AppState,
    auth::{self, dtos::ErrorResponse},
    context::REQUEST_ID_HEADER,
    entities::ItemStatus,
    extraction::DiscoveredLink,
    health, items,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::handlers::signup,
        auth::handlers::login,
        items::handlers::list_items,
        items::handlers::get_item,
        items::handlers::import_item,
        items::handlers::import_batch,
        items::handlers::discover_links,
    ),
    components(schemas(
        ErrorResponse,
        ItemStatus,
        DiscoveredLink,
        health::HealthResponse,
        auth::dtos::SignupRequest,
        auth::dtos::LoginRequest,
        auth::dtos::LoginResponse,
        items::dtos::ImportItemRequest,
        items::dtos::BatchImportRequest,
        items::dtos::DiscoverLinksRequest,
        items::dtos::ItemResponse,
        items::dtos::ItemListResponse,
        items::dtos::BatchImportResponse,
        items::dtos::DiscoverLinksResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "items", description = "Import and browse saved items"),
        (name = "auth", description = "Accounts and tokens"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/healthz", get(health::health_check))
        .route("/v1/auth/signup", post(auth::handlers::signup))
        .route("/v1/auth/login", post(auth::handlers::login))
        .route(
            "/v1/items",
            get(items::handlers::list_items).post(items::handlers::import_item),
        )
        .route("/v1/items/batch", post(items::handlers::import_batch))
        .route("/v1/items/discover", post(items::handlers::discover_links))
        .route("/v1/items/{id}", get(items::handlers::get_item))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get(REQUEST_ID_HEADER)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("-");
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id,
                        )
                    }),
                )
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .with_state(state)
}
