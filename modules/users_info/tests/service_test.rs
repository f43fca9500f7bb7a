//! Domain service and local client behavior, including emitted tracing.

use std::sync::Arc;

use anyhow::Result;
use tracing_test::traced_test;

use users_info::contract::client::UsersInfoApi;
use users_info::contract::error::UsersInfoError;
use users_info::contract::model::{Gender, NewUser, ProfileField, User, UserPatch};
use users_info::domain::error::DomainError;
use users_info::domain::repo::{NewUserRecord, UsersRepository};
use users_info::domain::service::{Service, ServiceConfig};
use users_info::gateways::local::UsersInfoLocalClient;
use users_info::infra::storage::InMemoryUsersRepository;

mod common;
use common::{empty_service, seeded_service};

// Repository whose every call fails
struct BrokenRepository;

#[async_trait::async_trait]
impl UsersRepository for BrokenRepository {
    async fn list(&self) -> Result<Vec<User>> {
        anyhow::bail!("connection lost")
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<User>> {
        anyhow::bail!("connection lost")
    }

    async fn insert(&self, _record: NewUserRecord) -> Result<User> {
        anyhow::bail!("connection lost")
    }

    async fn update(&self, _u: User) -> Result<bool> {
        anyhow::bail!("connection lost")
    }

    async fn delete(&self, _id: i64) -> Result<bool> {
        anyhow::bail!("connection lost")
    }
}

fn new_user(fields: Option<Vec<ProfileField>>) -> NewUser {
    NewUser {
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        profile_fields: fields,
    }
}

#[tokio::test]
async fn test_domain_service_crud() -> Result<()> {
    let service = empty_service();

    // create
    let created = service
        .create_user(new_user(Some(vec![ProfileField::text("job", "engineer")])))
        .await?;
    assert_eq!(created.id, 1);
    assert_eq!(created.created_at, created.updated_at);

    // get
    let retrieved = service.get_user(created.id).await?;
    assert_eq!(retrieved, created);

    // list
    let users = service.list_users().await?;
    assert_eq!(users.len(), 1);

    // update
    let patch = UserPatch {
        email: Some("updated@example.com".to_string()),
        ..Default::default()
    };
    let updated = service.update_user(created.id, patch).await?;
    assert_eq!(updated.email, "updated@example.com");
    assert_eq!(updated.name, "Test User");
    assert_eq!(updated.profile_fields, created.profile_fields);
    assert!(updated.updated_at >= created.updated_at);

    // delete
    service.delete_user(created.id).await?;
    let err = service.get_user(created.id).await.unwrap_err();
    assert_eq!(err, DomainError::user_not_found(created.id));

    Ok(())
}

#[tokio::test]
async fn create_rejects_invalid_names_with_all_errors() {
    let service = empty_service();

    let err = service
        .create_user(new_user(Some(vec![
            ProfileField::text("", "a"),
            ProfileField::text("趣味", "b"),
            ProfileField::number("趣味", 1.0),
        ])))
        .await
        .unwrap_err();

    match err {
        DomainError::InvalidProfileFields { errors } => {
            assert_eq!(
                errors,
                vec!["field[0]: name is empty", "field[2]: name '趣味' is duplicated"]
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(service.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn too_many_fields_is_a_validation_error() {
    let service = Service::new(
        Arc::new(InMemoryUsersRepository::new()),
        ServiceConfig {
            max_profile_fields: 2,
        },
    );

    let fields = (0..3)
        .map(|i| ProfileField::text(format!("f{i}"), "v"))
        .collect();
    let err = service
        .create_user(new_user(Some(fields)))
        .await
        .unwrap_err();
    match err {
        DomainError::InvalidProfileFields { errors } => {
            assert_eq!(errors, vec!["too many profile fields: 3 (max: 2)"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn update_missing_user_is_not_found() {
    let service = seeded_service();
    let err = service
        .update_user(42, UserPatch::default())
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::user_not_found(42));
}

#[tokio::test]
async fn storage_failures_surface_as_storage_errors() {
    let service = Service::new(Arc::new(BrokenRepository), ServiceConfig::default());

    let err = service.list_users().await.unwrap_err();
    assert!(matches!(err, DomainError::Storage { .. }));
    assert!(err.to_string().contains("connection lost"));

    let err = service.create_user(new_user(None)).await.unwrap_err();
    assert!(matches!(err, DomainError::Storage { .. }));
}

#[tokio::test]
async fn test_local_client() -> Result<()> {
    let client: Arc<dyn UsersInfoApi> = Arc::new(UsersInfoLocalClient::new(seeded_service()));

    let users = client.list_users().await?;
    assert_eq!(users.len(), 2);

    let created = client
        .create_user(new_user(Some(vec![ProfileField::gender(
            "性別",
            Gender::Male,
        )])))
        .await?;
    assert_eq!(created.id, 3);

    let fetched = client.get_user(3).await?;
    assert_eq!(fetched.name, "Test User");

    let updated = client
        .update_user(
            3,
            UserPatch {
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.name, "Renamed");

    client.delete_user(3).await?;
    assert_eq!(
        client.get_user(3).await.unwrap_err(),
        UsersInfoError::not_found(3)
    );

    let err = client
        .create_user(new_user(Some(vec![
            ProfileField::text("a", "1"),
            ProfileField::text("a", "2"),
        ])))
        .await
        .unwrap_err();
    assert!(matches!(err, UsersInfoError::Validation { ref errors, .. } if errors.len() == 1));

    Ok(())
}

#[traced_test]
#[tokio::test]
async fn list_logs_field_name_statistics() {
    let service = seeded_service();
    service.list_users().await.unwrap();

    assert!(logs_contain("users_info.service.list_users"));
    assert!(logs_contain("profile field name statistics"));
}

#[traced_test]
#[tokio::test]
async fn list_on_empty_store_skips_statistics() {
    let service = empty_service();
    service.list_users().await.unwrap();

    assert!(!logs_contain("profile field name statistics"));
}

#[traced_test]
#[tokio::test]
async fn create_logs_each_field_and_the_new_id() {
    let service = seeded_service();
    service
        .create_user(new_user(Some(vec![
            ProfileField::text("趣味", "読書"),
            ProfileField::number("年齢", 41.0),
        ])))
        .await
        .unwrap();

    assert!(logs_contain("users_info.service.create_user"));
    assert!(logs_contain("field_type=number"));
    assert!(logs_contain("Successfully created user with id=3"));
}
