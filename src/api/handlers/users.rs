use axum::{extract::State, Extension, Json};

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{SwitchAccountRequest, User},
    error::Result,
};

pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<Vec<User>>> {
    let users = state
        .service_context
        .user_service
        .list_users(&current_user.user)
        .await?;

    Ok(Json(users))
}

pub async fn switch_account(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(request): Json<SwitchAccountRequest>,
) -> Result<Json<User>> {
    let user = state
        .service_context
        .user_service
        .switch_account(&current_user.user, request)
        .await?;

    Ok(Json(user))
}
