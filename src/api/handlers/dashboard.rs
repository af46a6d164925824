use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{Announcement, Course},
    error::Result,
};

const ANNOUNCEMENT_PREVIEW: usize = 5;

#[derive(Serialize)]
pub struct DashboardPanel<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub courses: DashboardPanel<Vec<Course>>,
    pub announcements: DashboardPanel<Vec<Announcement>>,
}

/// Courses and announcements are fetched concurrently and resolve
/// independently: one failed panel never blanks the other.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Json<DashboardResponse> {
    let user = &current_user.user;

    let (courses, announcements) = tokio::join!(
        state.service_context.course_service.list_visible_to(user),
        state
            .service_context
            .announcement_service
            .list_visible_to(user, ANNOUNCEMENT_PREVIEW),
    );

    Json(DashboardResponse {
        courses: panel("courses", courses),
        announcements: panel("announcements", announcements),
    })
}

fn panel<T>(name: &str, result: Result<T>) -> DashboardPanel<T> {
    match result {
        Ok(data) => DashboardPanel {
            data: Some(data),
            error: None,
        },
        Err(e) => {
            tracing::warn!("Dashboard panel {} failed: {:?}", name, e);
            DashboardPanel {
                data: None,
                error: Some(e.to_string()),
            }
        }
    }
}
