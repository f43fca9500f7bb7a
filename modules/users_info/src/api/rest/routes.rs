use axum::{routing::get, Extension, Router};
use modkit::{ErrorBody, OpenApiRegistry};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_users,
        handlers::get_user,
        handlers::create_user,
        handlers::update_user,
        handlers::delete_user,
        handlers::hello,
    ),
    components(schemas(
        dto::UserDto,
        dto::CreateUserReq,
        dto::UpdateUserReq,
        dto::HelloResponse,
        dto::KnownProfileField,
        dto::TextFieldDto,
        dto::NumberFieldDto,
        dto::GenderFieldDto,
        dto::GenderDto,
        ErrorBody,
    )),
    tags(
        (name = "users", description = "Users and their profile fields"),
        (name = "hello", description = "Greeting endpoint")
    )
)]
pub struct UsersInfoApiDoc;

/// Mount the users API under `/api` and contribute its OpenAPI fragment.
pub fn register_routes(
    router: Router,
    openapi: &dyn OpenApiRegistry,
    service: Arc<Service>,
) -> anyhow::Result<Router> {
    let api = Router::new()
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/hello", get(handlers::hello))
        .layer(Extension(service));

    openapi.register_openapi(UsersInfoApiDoc::openapi());

    Ok(router.nest("/api", api))
}
