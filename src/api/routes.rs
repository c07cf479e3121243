//! Application route configuration.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    account_routes, audio_routes, author_routes, category_routes, narrator_routes, rating_routes,
    story_routes,
};
use super::openapi::ApiDoc;
use super::AppState;
use crate::infra::BlobKind;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let cover_images = BlobKind::CoverImage.dir();
    let audio_files = BlobKind::Audio.dir();

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/account", account_routes())
        .nest("/api/audio", audio_routes())
        .nest("/api/author", author_routes())
        .nest("/api/category", category_routes())
        .nest("/api/narrator", narrator_routes())
        .nest("/api/rating", rating_routes())
        .nest("/api/story", story_routes())
        // Uploaded blobs, served under the same path the database stores
        .nest_service(
            &format!("/{}", cover_images),
            ServeDir::new(state.storage_root.join(cover_images)),
        )
        .nest_service(
            &format!("/{}", audio_files),
            ServeDir::new(state.storage_root.join(audio_files)),
        )
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> &'static str {
    "Audiobook API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
}

#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check with a database round trip
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match state.uow.ping().await {
        Ok(()) => ServiceStatus {
            status: "healthy",
            error: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            ServiceStatus {
                status: "unhealthy",
                error: Some(e.to_string()),
            }
        }
    };

    let healthy = database.error.is_none();
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        services: ServiceHealth { database },
    };
    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
