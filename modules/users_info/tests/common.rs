#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use parking_lot::Mutex;
use tower::ServiceExt;

use users_info::domain::service::{Service, ServiceConfig};
use users_info::infra::storage::InMemoryUsersRepository;

/// Records the OpenAPI fragments handed to it.
#[derive(Default)]
pub struct RecordingOpenApiRegistry {
    pub docs: Mutex<Vec<utoipa::openapi::OpenApi>>,
}

impl modkit::OpenApiRegistry for RecordingOpenApiRegistry {
    fn register_openapi(&self, doc: utoipa::openapi::OpenApi) {
        self.docs.lock().push(doc);
    }
}

pub fn seeded_service() -> Arc<Service> {
    Arc::new(Service::new(
        Arc::new(InMemoryUsersRepository::seeded()),
        ServiceConfig::default(),
    ))
}

pub fn empty_service() -> Arc<Service> {
    Arc::new(Service::new(
        Arc::new(InMemoryUsersRepository::new()),
        ServiceConfig::default(),
    ))
}

/// Build an Axum router by calling the real route registration.
pub fn router_for(service: Arc<Service>) -> Router {
    let openapi = RecordingOpenApiRegistry::default();
    users_info::api::rest::routes::register_routes(Router::new(), &openapi, service)
        .expect("Failed to register routes")
}

pub async fn send(router: &Router, method: &str, uri: &str, body: Option<&str>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_owned()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    router.clone().oneshot(request).await.unwrap()
}

pub async fn json_of(resp: Response) -> (StatusCode, serde_json::Value) {
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}
