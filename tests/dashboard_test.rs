use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use registrar::{
    api,
    auth::{AnonymousProvider, AuthService},
    config::Settings,
    domain::Announcement,
    error::{AppError, Result},
    repository::{
        AnnouncementRepository, SqliteCourseRepository, SqliteEnrollmentRepository,
        SqliteUserRepository,
    },
    service::ServiceContext,
};
use sqlx::SqlitePool;
use tower::util::ServiceExt;

struct FailingAnnouncementRepository;

#[async_trait]
impl AnnouncementRepository for FailingAnnouncementRepository {
    async fn create(&self, _announcement: Announcement) -> Result<Announcement> {
        Err(AppError::DataFetch("announcement store offline".to_string()))
    }

    async fn list(&self) -> Result<Vec<Announcement>> {
        Err(AppError::DataFetch("announcement store offline".to_string()))
    }
}

async fn build_app() -> anyhow::Result<axum::Router> {
    let pool = SqlitePool::connect(":memory:").await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
    let course_repo = Arc::new(SqliteCourseRepository::new(pool.clone()));
    let enrollment_repo = Arc::new(SqliteEnrollmentRepository::new(pool.clone()));
    let announcement_repo = Arc::new(FailingAnnouncementRepository);

    let auth_service = Arc::new(AuthService::new(pool.clone()));

    let service_context = Arc::new(ServiceContext::new(
        user_repo,
        course_repo,
        enrollment_repo,
        announcement_repo,
        auth_service,
        Arc::new(AnonymousProvider::new()),
        None,
        pool,
    ));

    Ok(api::create_app(
        service_context,
        Arc::new(Settings::default()),
    ))
}

async fn sign_in(app: &axum::Router) -> anyhow::Result<String> {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/sign-in")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()?
        .to_string();

    // "session=<token>; Path=/; ..." -> "session=<token>"
    Ok(cookie.split(';').next().unwrap().to_string())
}

#[tokio::test]
async fn test_dashboard_requires_a_session() -> anyhow::Result<()> {
    let app = build_app().await?;

    let response = app
        .oneshot(Request::builder().uri("/api/dashboard").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_failed_announcements_panel_does_not_blank_courses() -> anyhow::Result<()> {
    let app = build_app().await?;
    let session = sign_in(&app).await?;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/dashboard")
                .header(header::COOKIE, &session)
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let json: serde_json::Value = serde_json::from_slice(&bytes)?;

    // Courses resolved even though the announcements fetch failed
    assert!(json["courses"]["data"].is_array());
    assert!(json["courses"]["error"].is_null());
    assert!(json["announcements"]["data"].is_null());
    assert!(json["announcements"]["error"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_session_resolves_to_a_profile() -> anyhow::Result<()> {
    let app = build_app().await?;
    let session = sign_in(&app).await?;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .header(header::COOKIE, &session)
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let json: serde_json::Value = serde_json::from_slice(&bytes)?;

    // The first identity ever resolved picks up the bootstrap admin role
    assert_eq!(json["role"], "admin");
    assert!(json["display_name"].is_string());

    Ok(())
}
