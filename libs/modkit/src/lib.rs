//! # ModKit
//!
//! Small contract layer shared by the server modules:
//!
//! - **Contracts**: `Module` (init from a scoped context) and `RestfulModule`
//!   (contribute routes and an OpenAPI fragment to the REST host)
//! - **Context**: `ModuleCtx` hands each module its own config section and the
//!   process-wide cancellation token
//! - **API helpers**: the shared `{message, code}` error body and a JSON body
//!   extractor with a stable rejection
//! - **Shutdown**: OS signal wait that cooperates with cancellation

pub use anyhow::Result;
pub use async_trait::async_trait;

pub mod api;
pub mod context;
pub mod contracts;
pub mod shutdown;

pub use api::error::{ErrorBody, ErrorResponse};
pub use api::json::JsonBody;
pub use context::{ConfigProvider, ModuleCtx};
pub use contracts::{Module, OpenApiRegistry, RestfulModule};
