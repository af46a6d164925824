use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Global announcements (`course_id` absent) are filtered by `audience`;
/// course-scoped announcements are visible only to readers with access to
/// that course. `summary` is best-effort output from the summarization
/// service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub summary: Option<String>,
    pub author_id: Uuid,
    pub author_name: String,
    pub course_id: Option<Uuid>,
    pub audience: Option<Audience>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    All,
    Student,
    Faculty,
    Admin,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 10000))]
    pub body: String,
    pub course_id: Option<Uuid>,
    pub audience: Option<Audience>,
}
