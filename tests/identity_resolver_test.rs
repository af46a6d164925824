use std::sync::Arc;

use registrar::{
    auth::{Credentials, IdentityProvider, PasswordProvider, ProviderIdentity},
    domain::{Role, SwitchAccountRequest},
    error::AppError,
    identity::IdentityResolver,
    repository::{SqliteUserRepository, UserRepository},
    service::UserService,
};
use sqlx::SqlitePool;

async fn setup() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePool::connect(":memory:").await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

fn identity(subject: &str) -> ProviderIdentity {
    ProviderIdentity {
        subject: subject.to_string(),
        email: None,
        display_name: None,
    }
}

#[tokio::test]
async fn test_first_identity_becomes_admin_rest_become_students() -> anyhow::Result<()> {
    let pool = setup().await?;
    let users = Arc::new(SqliteUserRepository::new(pool.clone()));
    let resolver = IdentityResolver::new(users.clone());

    let first = resolver.resolve(&identity("subject-1")).await?;
    assert_eq!(first.role, Role::Admin);

    let second = resolver.resolve(&identity("subject-2")).await?;
    assert_eq!(second.role, Role::Student);

    let third = resolver.resolve(&identity("subject-3")).await?;
    assert_eq!(third.role, Role::Student);

    Ok(())
}

#[tokio::test]
async fn test_resolve_is_idempotent_per_subject() -> anyhow::Result<()> {
    let pool = setup().await?;
    let users = Arc::new(SqliteUserRepository::new(pool.clone()));
    let resolver = IdentityResolver::new(users.clone());

    let created = resolver.resolve(&identity("subject-1")).await?;
    let resolved = resolver.resolve(&identity("subject-1")).await?;

    assert_eq!(created.id, resolved.id);
    assert_eq!(created.display_name, resolved.display_name);
    assert_eq!(users.count().await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_display_name_synthesized_when_provider_has_none() -> anyhow::Result<()> {
    let pool = setup().await?;
    let users = Arc::new(SqliteUserRepository::new(pool.clone()));
    let resolver = IdentityResolver::new(users);

    let anonymous = resolver.resolve(&identity("subject-1")).await?;
    assert!(!anonymous.display_name.is_empty());

    let named = resolver
        .resolve(&ProviderIdentity {
            subject: "subject-2".to_string(),
            email: Some("ada@university.edu".to_string()),
            display_name: Some("Ada Lovelace".to_string()),
        })
        .await?;
    assert_eq!(named.display_name, "Ada Lovelace");
    assert_eq!(named.email.as_deref(), Some("ada@university.edu"));

    Ok(())
}

#[tokio::test]
async fn test_resolve_surfaces_profile_load_when_storage_unavailable() -> anyhow::Result<()> {
    let pool = setup().await?;
    let users = Arc::new(SqliteUserRepository::new(pool.clone()));
    let resolver = IdentityResolver::new(users);

    pool.close().await;

    let err = resolver.resolve(&identity("subject-1")).await.unwrap_err();
    assert!(matches!(err, AppError::ProfileLoad(_)));

    Ok(())
}

#[tokio::test]
async fn test_switch_account_authorization() -> anyhow::Result<()> {
    let pool = setup().await?;
    let users = Arc::new(SqliteUserRepository::new(pool.clone()));
    let resolver = IdentityResolver::new(users.clone());
    let user_service = UserService::new(users.clone());

    let admin = resolver.resolve(&identity("subject-admin")).await?;
    let student = resolver.resolve(&identity("subject-student")).await?;

    // Anyone may switch their own record
    let switched = user_service
        .switch_account(
            &student,
            SwitchAccountRequest {
                user_id: None,
                role: Role::Faculty,
                display_name: Some("Dr. Example".to_string()),
            },
        )
        .await?;
    assert_eq!(switched.role, Role::Faculty);
    assert_eq!(switched.display_name, "Dr. Example");

    // A non-admin may not touch another user's record
    let err = user_service
        .switch_account(
            &switched,
            SwitchAccountRequest {
                user_id: Some(admin.id),
                role: Role::Student,
                display_name: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Authorization));

    // Admins may switch anyone
    let demoted = user_service
        .switch_account(
            &admin,
            SwitchAccountRequest {
                user_id: Some(switched.id),
                role: Role::Student,
                display_name: None,
            },
        )
        .await?;
    assert_eq!(demoted.role, Role::Student);
    // Display name is kept when the request leaves it out
    assert_eq!(demoted.display_name, "Dr. Example");

    Ok(())
}

#[tokio::test]
async fn test_admin_directory_listing_is_admin_only() -> anyhow::Result<()> {
    let pool = setup().await?;
    let users = Arc::new(SqliteUserRepository::new(pool.clone()));
    let resolver = IdentityResolver::new(users.clone());
    let user_service = UserService::new(users);

    let admin = resolver.resolve(&identity("subject-admin")).await?;
    let student = resolver.resolve(&identity("subject-student")).await?;

    let listed = user_service.list_users(&admin).await?;
    assert_eq!(listed.len(), 2);

    let err = user_service.list_users(&student).await.unwrap_err();
    assert!(matches!(err, AppError::Authorization));

    Ok(())
}

#[tokio::test]
async fn test_password_provider_register_and_authenticate() -> anyhow::Result<()> {
    let pool = setup().await?;
    let provider = PasswordProvider::new(pool.clone());

    let registered = provider
        .register("ada@university.edu", "correct-horse-battery", Some("Ada".to_string()))
        .await?;

    let authenticated = provider
        .authenticate(Credentials::Password {
            email: "ada@university.edu".to_string(),
            password: "correct-horse-battery".to_string(),
        })
        .await?;
    assert_eq!(registered.subject, authenticated.subject);

    let err = provider
        .authenticate(Credentials::Password {
            email: "ada@university.edu".to_string(),
            password: "wrong-password".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Auth(_)));

    let err = provider
        .register("ada@university.edu", "another-password", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    Ok(())
}
