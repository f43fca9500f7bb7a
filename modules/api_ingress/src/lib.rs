use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use arc_swap::ArcSwap;
use axum::http::{header, Method};
use axum::{extract::DefaultBodyLimit, middleware::from_fn, routing::get, Router};
use modkit::OpenApiRegistry;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

mod config;
mod openapi;
pub mod request_id;
pub mod web;

pub use config::ApiIngressConfig;
pub use openapi::OpenApiDocument;

pub const MODULE_NAME: &str = "api_ingress";

/// HTTP host: owns the global middleware stack and the merged OpenAPI document.
/// REST modules contribute routes and fragments; the host wraps them and serves.
pub struct ApiIngress {
    // Lock-free config using arc-swap for read-mostly access
    config: ArcSwap<ApiIngressConfig>,
    openapi: OpenApiDocument,
}

impl Default for ApiIngress {
    fn default() -> Self {
        Self::new(ApiIngressConfig::default())
    }
}

impl ApiIngress {
    /// Create a new ApiIngress instance with the given configuration
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            openapi: OpenApiDocument::new("Profile Server API", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Get the current configuration (cheap clone from ArcSwap)
    pub fn get_config(&self) -> ApiIngressConfig {
        (**self.config.load()).clone()
    }

    /// The OpenAPI document as merged so far.
    pub fn build_openapi(&self) -> utoipa::openapi::OpenApi {
        self.openapi.snapshot()
    }

    /// Wrap the module routes with host endpoints, the 404 fallback and the
    /// global middleware stack.
    pub fn build_router(&self, routes: Router) -> Result<Router> {
        let config = self.get_config();
        tracing::debug!("Building router");

        let mut router = routes.route("/health", get(web::health_check));

        if config.enable_docs {
            let op_count = self.openapi.operation_count();
            tracing::info!("Emitting OpenAPI with {} operations", op_count);

            // Build once, serve as static JSON
            let openapi_value = Arc::new(serde_json::to_value(self.build_openapi())?);
            router = router
                .route(
                    "/openapi.json",
                    get(move || {
                        let v = openapi_value.clone();
                        async move { web::openapi_json(&v) }
                    }),
                )
                .route("/docs", get(web::serve_docs));
        }

        router = router.fallback(web::not_found);

        // Layers added later wrap the earlier ones, so this list runs bottom-up:
        // PropagateRequestId -> SetRequestId -> push_req_id_to_extensions -> Trace
        // -> CatchPanic -> Timeout -> CORS -> BodyLimit -> handler
        // Extractors carry axum's own 2 MiB cap; raise it to the configured limit.
        router = router.layer(DefaultBodyLimit::max(config.body_limit_bytes));
        router = router.layer(RequestBodyLimitLayer::new(config.body_limit_bytes));

        if config.cors_enabled {
            router = router.layer(cors_layer());
        }

        router = router.layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_sec,
        )));
        router = router.layer(CatchPanicLayer::custom(web::panic_response));
        router = router.layer(request_id::create_trace_layer());
        router = router.layer(from_fn(request_id::push_req_id_to_extensions));

        let x_request_id = request_id::header();
        router = router.layer(SetRequestIdLayer::new(
            x_request_id.clone(),
            request_id::MakeReqId,
        ));
        router = router.layer(PropagateRequestIdLayer::new(x_request_id));

        Ok(router)
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Bind `addr` and serve `router` until `cancel` fires.
pub async fn serve(addr: SocketAddr, router: Router, cancel: CancellationToken) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {addr}: {e}"))?;
    serve_listener(listener, router, cancel).await
}

/// Serve on an already bound listener until `cancel` fires.
pub async fn serve_listener(
    listener: TcpListener,
    router: Router,
    cancel: CancellationToken,
) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("HTTP server bound on {}", addr);

    // Graceful shutdown on cancel
    let shutdown = async move {
        cancel.cancelled().await;
        tracing::info!("HTTP server shutting down gracefully (cancellation)");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

#[async_trait]
impl modkit::Module for ApiIngress {
    async fn init(&self, ctx: &modkit::ModuleCtx) -> anyhow::Result<()> {
        let cfg = ctx.module_config::<ApiIngressConfig>();
        tracing::debug!(
            module = MODULE_NAME,
            enable_docs = cfg.enable_docs,
            cors_enabled = cfg.cors_enabled,
            "Module initialized with context"
        );
        self.config.store(Arc::new(cfg));
        Ok(())
    }
}

impl OpenApiRegistry for ApiIngress {
    fn register_openapi(&self, doc: utoipa::openapi::OpenApi) {
        self.openapi.merge(doc);
    }
}
