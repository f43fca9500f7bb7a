use async_trait::async_trait;
use axum::Router;

/// Core module: DI/wiring from the module's config section.
#[async_trait]
pub trait Module: Send + Sync + 'static {
    async fn init(&self, ctx: &crate::context::ModuleCtx) -> anyhow::Result<()>;
}

/// Sink for the OpenAPI fragments contributed by REST modules.
pub trait OpenApiRegistry: Send + Sync {
    /// Merge a module's paths and component schemas into the host document.
    fn register_openapi(&self, doc: utoipa::openapi::OpenApi);
}

/// Pure wiring; must be sync. Runs AFTER `Module::init`.
pub trait RestfulModule: Send + Sync {
    fn register_rest(
        &self,
        ctx: &crate::context::ModuleCtx,
        router: Router,
        openapi: &dyn OpenApiRegistry,
    ) -> anyhow::Result<Router>;
}
