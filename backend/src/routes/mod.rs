mod health;
pub mod notes;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderValue, StatusCode,
    },
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

/// Creates the router with all handler routes
///
/// Every response, errors included, carries permissive CORS headers.
pub fn handler() -> Router {
    Router::new()
        .route("/health", get(health::handler))
        .route("/fetch", get(notes::fetch_notes).options(preflight))
        .route(
            "/upload",
            post(notes::upload_note)
                .options(preflight)
                .layer(DefaultBodyLimit::max(notes::MAX_UPLOAD_BODY_BYTES)),
        )
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        ))
}

async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Accept"),
        ],
    )
}
