use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{api::state::AppState, domain::User, error::AppError};

#[derive(Clone)]
pub struct CurrentUser {
    pub user: User,
}

/// Resolves the session cookie to a `CurrentUser` extension. A missing or
/// expired session is an authentication failure; a session whose profile
/// cannot be loaded surfaces as `ProfileLoad`, never as a guest view.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session_cookie = jar
        .get("session")
        .ok_or_else(|| AppError::Auth("Missing session cookie".to_string()))?;

    let session = state
        .service_context
        .auth_service
        .validate_session(session_cookie.value())
        .await?
        .ok_or_else(|| AppError::Auth("Session invalid or expired".to_string()))?;

    let user = state
        .service_context
        .user_repo
        .find_by_id(session.user_id)
        .await
        .map_err(|e| AppError::ProfileLoad(e.to_string()))?
        .ok_or_else(|| AppError::Auth("No profile for session".to_string()))?;

    request.extensions_mut().insert(CurrentUser { user });

    Ok(next.run(request).await)
}
