use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::Course,
    error::{AppError, Result},
    repository::CourseRepository,
};

#[derive(FromRow)]
struct CourseRow {
    id: String,
    name: String,
    description: String,
    instructor_id: String,
    instructor_name: String,
    created_by: String,
    created_at: NaiveDateTime,
}

pub struct SqliteCourseRepository {
    pool: SqlitePool,
}

impl SqliteCourseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_course(row: CourseRow) -> Result<Course> {
        Ok(Course {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::DataFetch(e.to_string()))?,
            name: row.name,
            description: row.description,
            instructor_id: Uuid::parse_str(&row.instructor_id)
                .map_err(|e| AppError::DataFetch(e.to_string()))?,
            instructor_name: row.instructor_name,
            created_by: Uuid::parse_str(&row.created_by)
                .map_err(|e| AppError::DataFetch(e.to_string()))?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl CourseRepository for SqliteCourseRepository {
    async fn create(&self, course: Course) -> Result<Course> {
        let id_str = course.id.to_string();
        let instructor_id_str = course.instructor_id.to_string();
        let created_by_str = course.created_by.to_string();
        // Timestamp assigned at write time so ordering keys are server-side
        let now = Utc::now();
        let now_naive = now.naive_utc();

        sqlx::query(
            r#"
            INSERT INTO courses (
                id, name, description, instructor_id, instructor_name,
                created_by, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&course.name)
        .bind(&course.description)
        .bind(&instructor_id_str)
        .bind(&course.instructor_name)
        .bind(&created_by_str)
        .bind(now_naive)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DataFetch(e.to_string()))?;

        Ok(Course {
            created_at: now,
            ..course
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT id, name, description, instructor_id, instructor_name,
                   created_by, created_at
            FROM courses
            WHERE id = ?
            "#,
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DataFetch(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_course(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Course>> {
        let rows = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT id, name, description, instructor_id, instructor_name,
                   created_by, created_at
            FROM courses
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DataFetch(e.to_string()))?;

        rows.into_iter().map(Self::row_to_course).collect()
    }

    async fn list_by_instructor(&self, instructor_id: Uuid) -> Result<Vec<Course>> {
        let instructor_id_str = instructor_id.to_string();
        let rows = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT id, name, description, instructor_id, instructor_name,
                   created_by, created_at
            FROM courses
            WHERE instructor_id = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(instructor_id_str)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DataFetch(e.to_string()))?;

        rows.into_iter().map(Self::row_to_course).collect()
    }
}
