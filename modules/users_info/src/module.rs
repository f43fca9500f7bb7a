use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use modkit::{Module, ModuleCtx, OpenApiRegistry, RestfulModule};
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::UsersInfoConfig;
use crate::contract::client::UsersInfoApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::UsersInfoLocalClient;
use crate::infra::storage::InMemoryUsersRepository;

pub const MODULE_NAME: &str = "users_info";

/// The users module: owns the in-memory store and the domain service built on it.
#[derive(Default)]
pub struct UsersInfo {
    // Keep the domain service behind ArcSwap for cheap read-mostly access.
    service: ArcSwapOption<Service>,
    client: ArcSwapOption<Arc<dyn UsersInfoApi>>,
}

impl UsersInfo {
    /// In-process client; `None` until `init` has run.
    pub fn client(&self) -> Option<Arc<dyn UsersInfoApi>> {
        self.client.load().as_ref().map(|c| Arc::clone(&**c))
    }
}

#[async_trait]
impl Module for UsersInfo {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing users_info module");

        let cfg: UsersInfoConfig = ctx.module_config();
        debug!(
            "Loaded users_info config: seed_sample_data={}, max_profile_fields={}",
            cfg.seed_sample_data, cfg.max_profile_fields
        );

        let repo = if cfg.seed_sample_data {
            InMemoryUsersRepository::seeded()
        } else {
            InMemoryUsersRepository::new()
        };
        debug!(users = repo.len(), "user store ready");

        let service = Arc::new(Service::new(
            Arc::new(repo),
            ServiceConfig {
                max_profile_fields: cfg.max_profile_fields,
            },
        ));

        // Store service for REST and local client
        self.service.store(Some(service.clone()));
        let api: Arc<dyn UsersInfoApi> = Arc::new(UsersInfoLocalClient::new(service));
        self.client.store(Some(Arc::new(api)));

        info!("users_info module initialized");
        Ok(())
    }
}

impl RestfulModule for UsersInfo {
    fn register_rest(
        &self,
        _ctx: &ModuleCtx,
        router: axum::Router,
        openapi: &dyn OpenApiRegistry,
    ) -> anyhow::Result<axum::Router> {
        info!("Registering users_info REST routes");

        let service = self
            .service
            .load()
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?
            .clone();

        let router = routes::register_routes(router, openapi, service)?;
        info!("Users REST routes registered successfully");
        Ok(router)
    }
}
