use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::Json,
    Extension,
};
use modkit::{ErrorBody, ErrorResponse, JsonBody};
use std::sync::Arc;
use tracing::{error, info};

use crate::api::rest::dto::{CreateUserReq, HelloResponse, ListUsersQuery, UpdateUserReq, UserDto};
use crate::api::rest::error::map_domain_error;
use crate::domain::profile;
use crate::domain::service::Service;

pub const HELLO_MESSAGE: &str = "Hello, World! Profile Server is working!";

/// List all users, optionally narrowing each user's profile fields by name
#[utoipa::path(
    get,
    path = "/api/users",
    operation_id = "users_info.list_users",
    tag = "users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "List of users", body = [UserDto]),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    )
)]
pub async fn list_users(
    Extension(svc): Extension<Arc<Service>>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<UserDto>>, ErrorResponse> {
    info!("Listing users with query: {:?}", query);

    match svc.list_users().await {
        Ok(mut users) => {
            if let Some(target) = query.field_name.as_deref() {
                for user in &mut users {
                    if let Some(fields) = user.profile_fields.as_deref() {
                        user.profile_fields = Some(profile::filter_by_name(fields, target));
                    }
                }
            }
            Ok(Json(users.into_iter().map(UserDto::from).collect()))
        }
        Err(e) => {
            error!("Failed to list users: {}", e);
            Err(map_domain_error(&e))
        }
    }
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    operation_id = "users_info.get_user",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i64>,
) -> Result<Json<UserDto>, ErrorResponse> {
    info!("Getting user with id: {}", id);

    match svc.get_user(id).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e) => {
            error!("Failed to get user {}: {}", id, e);
            Err(map_domain_error(&e))
        }
    }
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/users",
    operation_id = "users_info.create_user",
    tag = "users",
    request_body = CreateUserReq,
    responses(
        (status = 201, description = "Created user", body = UserDto),
        (status = 400, description = "Invalid profile fields", body = ErrorBody)
    )
)]
pub async fn create_user(
    Extension(svc): Extension<Arc<Service>>,
    JsonBody(req): JsonBody<CreateUserReq>,
) -> Result<(StatusCode, Json<UserDto>), ErrorResponse> {
    info!("Creating user: {:?}", req);

    match svc.create_user(req.into()).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(UserDto::from(user)))),
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err(map_domain_error(&e))
        }
    }
}

/// Update an existing user; only the provided attributes change
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    operation_id = "users_info.update_user",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserReq,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 400, description = "Invalid profile fields", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn update_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<UpdateUserReq>,
) -> Result<Json<UserDto>, ErrorResponse> {
    info!("Updating user {} with: {:?}", id, req);

    match svc.update_user(id, req.into()).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e) => {
            error!("Failed to update user {}: {}", id, e);
            Err(map_domain_error(&e))
        }
    }
}

/// Delete a user by ID
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    operation_id = "users_info.delete_user",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ErrorResponse> {
    info!("Deleting user: {}", id);

    match svc.delete_user(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete user {}: {}", id, e);
            Err(map_domain_error(&e))
        }
    }
}

/// Liveness greeting
#[utoipa::path(
    get,
    path = "/api/hello",
    operation_id = "users_info.hello",
    tag = "hello",
    responses((status = 200, description = "Greeting", body = HelloResponse))
)]
pub async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: HELLO_MESSAGE.to_string(),
    })
}
