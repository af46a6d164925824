use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::*,
    error::{AppError, Result},
    integrations::Summarizer,
    repository::{AnnouncementRepository, CourseRepository},
    service::CourseService,
};

/// Audience and course-scope filtering for announcements, plus authorized
/// creation. Course visibility is delegated to `CourseService` so the two
/// stay consistent.
pub struct AnnouncementService {
    announcements: Arc<dyn AnnouncementRepository>,
    courses: Arc<dyn CourseRepository>,
    course_service: Arc<CourseService>,
    summarizer: Option<Arc<dyn Summarizer>>,
}

impl AnnouncementService {
    pub fn new(
        announcements: Arc<dyn AnnouncementRepository>,
        courses: Arc<dyn CourseRepository>,
        course_service: Arc<CourseService>,
        summarizer: Option<Arc<dyn Summarizer>>,
    ) -> Self {
        Self {
            announcements,
            courses,
            course_service,
            summarizer,
        }
    }

    /// Newest first. Global announcements are kept when their audience is
    /// absent, `all`, or the reader's own role; course-scoped announcements
    /// are kept when the reader can see the course. `limit` is applied
    /// after filtering.
    pub async fn list_visible_to(&self, user: &User, limit: usize) -> Result<Vec<Announcement>> {
        let visible_courses: HashSet<Uuid> = self
            .course_service
            .list_visible_to(user)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();

        let announcements = self.announcements.list().await?;

        Ok(announcements
            .into_iter()
            .filter(|a| match a.course_id {
                Some(course_id) => visible_courses.contains(&course_id),
                None => audience_matches(a.audience, user.role),
            })
            .take(limit)
            .collect())
    }

    /// Faculty may post to their own courses only; admins may post globally
    /// or to any course. Students are rejected before the store is touched.
    pub async fn create(&self, actor: &User, request: CreateAnnouncementRequest) -> Result<Announcement> {
        match actor.role {
            Role::Student => return Err(AppError::Authorization),
            Role::Faculty => {
                let course_id = request.course_id.ok_or_else(|| {
                    AppError::BadRequest("Faculty announcements must target a course".to_string())
                })?;
                let course = self
                    .courses
                    .find_by_id(course_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
                if course.instructor_id != actor.id {
                    return Err(AppError::Authorization);
                }
            }
            Role::Admin => {
                if let Some(course_id) = request.course_id {
                    self.courses
                        .find_by_id(course_id)
                        .await?
                        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
                }
            }
        }

        // Best-effort enrichment. A summarizer failure must never block the
        // announcement itself.
        let summary = match &self.summarizer {
            Some(summarizer) => match summarizer.summarize(&request.body).await {
                Ok(summary) => Some(summary),
                Err(e) => {
                    tracing::warn!("Summarization failed, storing announcement without summary: {:?}", e);
                    None
                }
            },
            None => None,
        };

        let announcement = Announcement {
            id: Uuid::new_v4(),
            title: request.title,
            body: request.body,
            summary,
            author_id: actor.id,
            author_name: actor.display_name.clone(),
            course_id: request.course_id,
            audience: request.audience,
            created_at: Utc::now(),
        };

        self.announcements.create(announcement).await
    }
}

fn audience_matches(audience: Option<Audience>, role: Role) -> bool {
    match audience {
        None | Some(Audience::All) => true,
        Some(Audience::Student) => role == Role::Student,
        Some(Audience::Faculty) => role == Role::Faculty,
        Some(Audience::Admin) => role == Role::Admin,
    }
}
