pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{config::Settings, service::ServiceContext};
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>, settings: Arc<Settings>) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))
        // Auth routes
        .route("/auth/sign-in", post(handlers::auth::sign_in))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/sign-out", post(handlers::auth::sign_out))
        // Authenticated API routes
        .nest("/api", api_routes(app_state.clone()))
        // Add state to the router
        .with_state(app_state)
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::auth::me))
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .route("/users", get(handlers::users::list))
        .route("/account/switch", post(handlers::users::switch_account))
        .route("/courses", get(handlers::courses::list))
        .route("/courses", post(handlers::courses::create))
        .route("/courses/:id/enroll", post(handlers::courses::enroll))
        .route("/courses/:id/roster", get(handlers::courses::roster))
        .route("/enrollments", get(handlers::courses::list_enrollments))
        .route("/announcements", get(handlers::announcements::list))
        .route("/announcements", post(handlers::announcements::create))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}
