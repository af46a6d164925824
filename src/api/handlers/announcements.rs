use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{Announcement, CreateAnnouncementRequest},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct ListAnnouncementsQuery {
    pub limit: Option<usize>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListAnnouncementsQuery>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<Vec<Announcement>>> {
    let limit = params.limit.unwrap_or(20).min(100);

    let announcements = state
        .service_context
        .announcement_service
        .list_visible_to(&current_user.user, limit)
        .await?;

    Ok(Json(announcements))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(request): Json<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<Announcement>)> {
    request.validate()?;

    let announcement = state
        .service_context
        .announcement_service
        .create(&current_user.user, request)
        .await?;

    Ok((StatusCode::CREATED, Json(announcement)))
}
