use std::any::Any;

use axum::{
    http::{header, Uri},
    response::{Html, IntoResponse, Json, Response},
};
use modkit::ErrorResponse;
use serde_json::{json, Value};

pub const NOT_FOUND_CODE: &str = "NOT_FOUND";

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Fallback for every unmatched route
pub async fn not_found(uri: Uri) -> ErrorResponse {
    tracing::debug!(path = %uri.path(), "no route matched");
    modkit::api::error::not_found(NOT_FOUND_CODE, format!("No route for {}", uri.path()))
}

/// Turn a handler panic into the shared 500 error body.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "handler panicked");
    modkit::api::error::internal_error("Internal server error").into_response()
}

pub fn openapi_json(doc: &Value) -> Response {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(doc.clone()),
    )
        .into_response()
}

pub async fn serve_docs() -> Html<&'static str> {
    // External mode: load from CDN @latest
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>API Docs</title>
  <script src="https://unpkg.com/@stoplight/elements@latest/web-components.min.js"></script>
  <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements@latest/styles.min.css">
</head>
<body>
  <elements-api apiDescriptionUrl="/openapi.json" router="hash" layout="sidebar"></elements-api>
</body>
</html>"#,
    )
}
