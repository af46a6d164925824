pub mod announcement_service;
pub mod course_service;
pub mod user_service;

use std::sync::Arc;
use sqlx::SqlitePool;

use crate::auth::{AuthService, IdentityProvider};
use crate::identity::IdentityResolver;
use crate::integrations::Summarizer;
use crate::repository::*;

pub use announcement_service::AnnouncementService;
pub use course_service::CourseService;
pub use user_service::UserService;

pub struct ServiceContext {
    pub user_repo: Arc<dyn UserRepository>,
    pub course_repo: Arc<dyn CourseRepository>,
    pub enrollment_repo: Arc<dyn EnrollmentRepository>,
    pub announcement_repo: Arc<dyn AnnouncementRepository>,
    pub auth_service: Arc<AuthService>,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub identity_resolver: Arc<IdentityResolver>,
    pub course_service: Arc<CourseService>,
    pub announcement_service: Arc<AnnouncementService>,
    pub user_service: Arc<UserService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        course_repo: Arc<dyn CourseRepository>,
        enrollment_repo: Arc<dyn EnrollmentRepository>,
        announcement_repo: Arc<dyn AnnouncementRepository>,
        auth_service: Arc<AuthService>,
        identity_provider: Arc<dyn IdentityProvider>,
        summarizer: Option<Arc<dyn Summarizer>>,
        db_pool: SqlitePool,
    ) -> Self {
        let identity_resolver = Arc::new(IdentityResolver::new(user_repo.clone()));

        let course_service = Arc::new(CourseService::new(
            course_repo.clone(),
            enrollment_repo.clone(),
            user_repo.clone(),
        ));
        let announcement_service = Arc::new(AnnouncementService::new(
            announcement_repo.clone(),
            course_repo.clone(),
            course_service.clone(),
            summarizer,
        ));
        let user_service = Arc::new(UserService::new(user_repo.clone()));

        Self {
            user_repo,
            course_repo,
            enrollment_repo,
            announcement_repo,
            auth_service,
            identity_provider,
            identity_resolver,
            course_service,
            announcement_service,
            user_service,
            db_pool,
        }
    }
}
