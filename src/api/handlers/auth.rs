use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    auth::{AuthService, Credentials},
    domain::User,
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    /// Returning-guest subject for the anonymous provider.
    pub subject: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: User,
}

pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<SignInRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let credentials = match (req.email, req.password) {
        (Some(email), Some(password)) => Credentials::Password { email, password },
        _ => Credentials::Anonymous { subject: req.subject },
    };

    let identity = state
        .service_context
        .identity_provider
        .authenticate(credentials)
        .await?;

    let user = state
        .service_context
        .identity_resolver
        .resolve(&identity)
        .await?;

    let (_session, token) = state
        .service_context
        .auth_service
        .create_session(user.id, state.settings.auth.session_duration_hours)
        .await?;

    let cookie = state
        .service_context
        .auth_service
        .create_session_cookie(&token, false);

    Ok((jar.add(cookie), Json(SessionResponse { user })))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub display_name: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    req.validate()?;

    let identity = state
        .service_context
        .identity_provider
        .register(&req.email, &req.password, req.display_name)
        .await?;

    let user = state
        .service_context
        .identity_resolver
        .resolve(&identity)
        .await?;

    let (_session, token) = state
        .service_context
        .auth_service
        .create_session(user.id, state.settings.auth.session_duration_hours)
        .await?;

    let cookie = state
        .service_context
        .auth_service
        .create_session_cookie(&token, false);

    Ok((jar.add(cookie), Json(SessionResponse { user })))
}

pub async fn sign_out(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode)> {
    if let Some(session_cookie) = jar.get("session") {
        let _ = state
            .service_context
            .auth_service
            .invalidate_session(session_cookie.value())
            .await;
    }

    let jar = jar.add(AuthService::create_logout_cookie());

    Ok((jar, StatusCode::NO_CONTENT))
}

pub async fn me(Extension(current_user): Extension<CurrentUser>) -> Json<User> {
    Json(current_user.user)
}
