use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::Enrollment,
    error::{AppError, Result},
    repository::EnrollmentRepository,
};

#[derive(FromRow)]
struct EnrollmentRow {
    id: String,
    student_id: String,
    student_name: String,
    course_id: String,
    enrolled_at: NaiveDateTime,
}

pub struct SqliteEnrollmentRepository {
    pool: SqlitePool,
}

impl SqliteEnrollmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_enrollment(row: EnrollmentRow) -> Result<Enrollment> {
        Ok(Enrollment {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::DataFetch(e.to_string()))?,
            student_id: Uuid::parse_str(&row.student_id)
                .map_err(|e| AppError::DataFetch(e.to_string()))?,
            student_name: row.student_name,
            course_id: Uuid::parse_str(&row.course_id)
                .map_err(|e| AppError::DataFetch(e.to_string()))?,
            enrolled_at: DateTime::from_naive_utc_and_offset(row.enrolled_at, Utc),
        })
    }
}

#[async_trait]
impl EnrollmentRepository for SqliteEnrollmentRepository {
    async fn create(&self, enrollment: Enrollment) -> Result<Enrollment> {
        let id_str = enrollment.id.to_string();
        let student_id_str = enrollment.student_id.to_string();
        let course_id_str = enrollment.course_id.to_string();
        let now = Utc::now();
        let now_naive = now.naive_utc();

        sqlx::query(
            r#"
            INSERT INTO enrollments (id, student_id, student_name, course_id, enrolled_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&student_id_str)
        .bind(&enrollment.student_name)
        .bind(&course_id_str)
        .bind(now_naive)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            // The (student_id, course_id) unique index rejects duplicates
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Student is already enrolled in this course".to_string())
            }
            other => AppError::DataFetch(other.to_string()),
        })?;

        Ok(Enrollment {
            enrolled_at: now,
            ..enrollment
        })
    }

    async fn find_by_student_and_course(
        &self,
        student_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<Enrollment>> {
        let student_id_str = student_id.to_string();
        let course_id_str = course_id.to_string();
        let row = sqlx::query_as::<_, EnrollmentRow>(
            r#"
            SELECT id, student_id, student_name, course_id, enrolled_at
            FROM enrollments
            WHERE student_id = ? AND course_id = ?
            "#,
        )
        .bind(student_id_str)
        .bind(course_id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DataFetch(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_enrollment(r)?)),
            None => Ok(None),
        }
    }

    async fn list_by_student(&self, student_id: Uuid) -> Result<Vec<Enrollment>> {
        let student_id_str = student_id.to_string();
        let rows = sqlx::query_as::<_, EnrollmentRow>(
            r#"
            SELECT id, student_id, student_name, course_id, enrolled_at
            FROM enrollments
            WHERE student_id = ?
            ORDER BY enrolled_at ASC
            "#,
        )
        .bind(student_id_str)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DataFetch(e.to_string()))?;

        rows.into_iter().map(Self::row_to_enrollment).collect()
    }

    async fn list_by_course(&self, course_id: Uuid) -> Result<Vec<Enrollment>> {
        let course_id_str = course_id.to_string();
        let rows = sqlx::query_as::<_, EnrollmentRow>(
            r#"
            SELECT id, student_id, student_name, course_id, enrolled_at
            FROM enrollments
            WHERE course_id = ?
            ORDER BY enrolled_at ASC
            "#,
        )
        .bind(course_id_str)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DataFetch(e.to_string()))?;

        rows.into_iter().map(Self::row_to_enrollment).collect()
    }
}
