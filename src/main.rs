use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use registrar::{
    api,
    auth::{AnonymousProvider, AuthService, IdentityProvider, PasswordProvider},
    config::Settings,
    integrations::{HttpSummarizer, Summarizer},
    repository,
    service::ServiceContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "registrar=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!(
        "Starting Registrar server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    // Initialize database
    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    // Initialize auth service and the configured identity-provider adapter
    let auth_service = Arc::new(AuthService::new(db_pool.clone()));

    let identity_provider: Arc<dyn IdentityProvider> = match settings.auth.provider.as_str() {
        "password" => Arc::new(PasswordProvider::new(db_pool.clone())),
        _ => Arc::new(AnonymousProvider::new()),
    };
    tracing::info!("Identity provider: {}", identity_provider.name());

    // Initialize the summarization client if configured
    let summarizer: Option<Arc<dyn Summarizer>> = HttpSummarizer::new(settings.summarizer.clone())
        .map(|s| Arc::new(s) as Arc<dyn Summarizer>);

    match &summarizer {
        Some(summarizer) => match summarizer.health_check().await {
            Ok(_) => tracing::info!("Summarizer {} is healthy", summarizer.name()),
            Err(e) => tracing::warn!("Summarizer {} health check failed: {:?}", summarizer.name(), e),
        },
        None => tracing::info!("Announcement summarization disabled"),
    }

    // Initialize repositories
    let user_repo = Arc::new(repository::SqliteUserRepository::new(db_pool.clone()));
    let course_repo = Arc::new(repository::SqliteCourseRepository::new(db_pool.clone()));
    let enrollment_repo = Arc::new(repository::SqliteEnrollmentRepository::new(db_pool.clone()));
    let announcement_repo = Arc::new(repository::SqliteAnnouncementRepository::new(db_pool.clone()));

    // Create service context
    let service_context = Arc::new(ServiceContext::new(
        user_repo,
        course_repo,
        enrollment_repo,
        announcement_repo,
        auth_service,
        identity_provider,
        summarizer,
        db_pool.clone(),
    ));

    let app = api::create_app(service_context, Arc::new(settings.clone()));

    let listener = tokio::net::TcpListener::bind(format!(
        "{}:{}",
        settings.server.host, settings.server.port
    ))
    .await?;

    tracing::info!(
        "Server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
