use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{Course, CreateCourseRequest, EnrollRequest, Enrollment},
    error::Result,
};

pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<Vec<Course>>> {
    let courses = state
        .service_context
        .course_service
        .list_visible_to(&current_user.user)
        .await?;

    Ok(Json(courses))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(request): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<Course>)> {
    request.validate()?;

    let course = state
        .service_context
        .course_service
        .create_course(&current_user.user, request)
        .await?;

    Ok((StatusCode::CREATED, Json(course)))
}

pub async fn enroll(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Extension(current_user): Extension<CurrentUser>,
    Json(request): Json<EnrollRequest>,
) -> Result<(StatusCode, Json<Enrollment>)> {
    let student_id = request.student_id.unwrap_or(current_user.user.id);

    let enrollment = state
        .service_context
        .course_service
        .enroll(&current_user.user, student_id, course_id)
        .await?;

    Ok((StatusCode::CREATED, Json(enrollment)))
}

pub async fn roster(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<Vec<Enrollment>>> {
    let roster = state
        .service_context
        .course_service
        .roster(&current_user.user, course_id)
        .await?;

    Ok(Json(roster))
}

#[derive(Debug, Deserialize)]
pub struct ListEnrollmentsQuery {
    pub student_id: Option<Uuid>,
}

pub async fn list_enrollments(
    State(state): State<AppState>,
    Query(params): Query<ListEnrollmentsQuery>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<Vec<Enrollment>>> {
    let student_id = params.student_id.unwrap_or(current_user.user.id);

    let enrollments = state
        .service_context
        .course_service
        .list_enrollments(&current_user.user, student_id)
        .await?;

    Ok(Json(enrollments))
}
