use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::*,
    error::{AppError, Result},
    repository::{CourseRepository, EnrollmentRepository, UserRepository},
};

/// Visibility scoping and write authorization for courses and enrollments.
/// Every course/enrollment read or mutation goes through here; handlers
/// never decide visibility themselves.
pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
    users: Arc<dyn UserRepository>,
}

impl CourseService {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            courses,
            enrollments,
            users,
        }
    }

    /// Admin sees every course, faculty the ones they instruct, students the
    /// ones they hold an enrollment for. Insertion order throughout.
    pub async fn list_visible_to(&self, user: &User) -> Result<Vec<Course>> {
        match user.role {
            Role::Admin => self.courses.list().await,
            Role::Faculty => self.courses.list_by_instructor(user.id).await,
            Role::Student => {
                let enrolled: HashSet<Uuid> = self
                    .enrollments
                    .list_by_student(user.id)
                    .await?
                    .into_iter()
                    .map(|e| e.course_id)
                    .collect();

                let courses = self.courses.list().await?;
                Ok(courses
                    .into_iter()
                    .filter(|c| enrolled.contains(&c.id))
                    .collect())
            }
        }
    }

    /// A student may list their own enrollments; admins may list anyone's.
    pub async fn list_enrollments(&self, actor: &User, student_id: Uuid) -> Result<Vec<Enrollment>> {
        if actor.id != student_id && actor.role != Role::Admin {
            return Err(AppError::Authorization);
        }

        self.enrollments.list_by_student(student_id).await
    }

    /// Enrollments for one course, readable by the owning faculty or an
    /// admin.
    pub async fn roster(&self, actor: &User, course_id: Uuid) -> Result<Vec<Enrollment>> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        match actor.role {
            Role::Admin => {}
            Role::Faculty if course.instructor_id == actor.id => {}
            _ => return Err(AppError::Authorization),
        }

        self.enrollments.list_by_course(course_id).await
    }

    /// Faculty create courses they instruct themselves; admins may assign
    /// any faculty member. Students are rejected before the store is
    /// touched.
    pub async fn create_course(&self, actor: &User, request: CreateCourseRequest) -> Result<Course> {
        let (instructor_id, instructor_name) = match actor.role {
            Role::Student => return Err(AppError::Authorization),
            Role::Faculty => (actor.id, actor.display_name.clone()),
            Role::Admin => match request.instructor_id {
                Some(id) if id != actor.id => {
                    let instructor = self
                        .users
                        .find_by_id(id)
                        .await?
                        .ok_or_else(|| AppError::NotFound("Instructor not found".to_string()))?;
                    if instructor.role != Role::Faculty {
                        return Err(AppError::BadRequest(
                            "Instructor must have the faculty role".to_string(),
                        ));
                    }
                    (instructor.id, instructor.display_name)
                }
                _ => (actor.id, actor.display_name.clone()),
            },
        };

        let course = Course {
            id: Uuid::new_v4(),
            name: request.name,
            description: request.description,
            instructor_id,
            instructor_name,
            created_by: actor.id,
            created_at: Utc::now(),
        };

        self.courses.create(course).await
    }

    /// Students may enroll themselves; admins may enroll anyone. Enrolling
    /// in the same course twice returns the existing record.
    pub async fn enroll(&self, actor: &User, student_id: Uuid, course_id: Uuid) -> Result<Enrollment> {
        if actor.id != student_id && actor.role != Role::Admin {
            return Err(AppError::Authorization);
        }

        let student_name = if student_id == actor.id {
            actor.display_name.clone()
        } else {
            let student = self
                .users
                .find_by_id(student_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
            student.display_name
        };

        if self.courses.find_by_id(course_id).await?.is_none() {
            return Err(AppError::NotFound("Course not found".to_string()));
        }

        if let Some(existing) = self
            .enrollments
            .find_by_student_and_course(student_id, course_id)
            .await?
        {
            return Ok(existing);
        }

        let enrollment = Enrollment {
            id: Uuid::new_v4(),
            student_id,
            student_name,
            course_id,
            enrolled_at: Utc::now(),
        };

        self.enrollments.create(enrollment).await
    }
}
