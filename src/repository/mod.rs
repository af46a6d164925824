use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::*;
use crate::error::Result;

pub mod announcement_repository;
pub mod course_repository;
pub mod enrollment_repository;
pub mod user_repository;

pub use announcement_repository::SqliteAnnouncementRepository;
pub use course_repository::SqliteCourseRepository;
pub use enrollment_repository::SqliteEnrollmentRepository;
pub use user_repository::SqliteUserRepository;

// Raw storage access. Visibility filtering and write authorization live in
// the service layer; nothing here checks roles.

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, request: CreateUserRequest) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_subject(&self, subject: &str) -> Result<Option<User>>;
    async fn count(&self) -> Result<i64>;
    async fn list(&self) -> Result<Vec<User>>;
    async fn update_profile(&self, id: Uuid, role: Role, display_name: &str) -> Result<User>;
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create(&self, course: Course) -> Result<Course>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>>;
    async fn list(&self) -> Result<Vec<Course>>;
    async fn list_by_instructor(&self, instructor_id: Uuid) -> Result<Vec<Course>>;
}

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    async fn create(&self, enrollment: Enrollment) -> Result<Enrollment>;
    async fn find_by_student_and_course(
        &self,
        student_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<Enrollment>>;
    async fn list_by_student(&self, student_id: Uuid) -> Result<Vec<Enrollment>>;
    async fn list_by_course(&self, course_id: Uuid) -> Result<Vec<Enrollment>>;
}

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create(&self, announcement: Announcement) -> Result<Announcement>;
    async fn list(&self) -> Result<Vec<Announcement>>;
}
