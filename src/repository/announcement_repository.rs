use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Announcement, Audience},
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

#[derive(FromRow)]
struct AnnouncementRow {
    id: String,
    title: String,
    body: String,
    summary: Option<String>,
    author_id: String,
    author_name: String,
    course_id: Option<String>,
    audience: Option<String>,
    created_at: NaiveDateTime,
}

pub struct SqliteAnnouncementRepository {
    pool: SqlitePool,
}

impl SqliteAnnouncementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_announcement(row: AnnouncementRow) -> Result<Announcement> {
        Ok(Announcement {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::DataFetch(e.to_string()))?,
            title: row.title,
            body: row.body,
            summary: row.summary,
            author_id: Uuid::parse_str(&row.author_id)
                .map_err(|e| AppError::DataFetch(e.to_string()))?,
            author_name: row.author_name,
            course_id: row
                .course_id
                .map(|s| Uuid::parse_str(&s).map_err(|e| AppError::DataFetch(e.to_string())))
                .transpose()?,
            audience: row.audience.map(|s| Self::parse_audience(&s)).transpose()?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }

    fn parse_audience(s: &str) -> Result<Audience> {
        match s {
            "all" => Ok(Audience::All),
            "student" => Ok(Audience::Student),
            "faculty" => Ok(Audience::Faculty),
            "admin" => Ok(Audience::Admin),
            _ => Err(AppError::DataFetch(format!("Invalid audience: {}", s))),
        }
    }

    fn audience_to_str(audience: &Audience) -> &'static str {
        match audience {
            Audience::All => "all",
            Audience::Student => "student",
            Audience::Faculty => "faculty",
            Audience::Admin => "admin",
        }
    }
}

#[async_trait]
impl AnnouncementRepository for SqliteAnnouncementRepository {
    async fn create(&self, announcement: Announcement) -> Result<Announcement> {
        let id_str = announcement.id.to_string();
        let author_id_str = announcement.author_id.to_string();
        let course_id_str = announcement.course_id.map(|id| id.to_string());
        let audience_str = announcement.audience.as_ref().map(Self::audience_to_str);
        let now = Utc::now();
        let now_naive = now.naive_utc();

        sqlx::query(
            r#"
            INSERT INTO announcements (
                id, title, body, summary, author_id, author_name,
                course_id, audience, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&announcement.title)
        .bind(&announcement.body)
        .bind(&announcement.summary)
        .bind(&author_id_str)
        .bind(&announcement.author_name)
        .bind(&course_id_str)
        .bind(audience_str)
        .bind(now_naive)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DataFetch(e.to_string()))?;

        Ok(Announcement {
            created_at: now,
            ..announcement
        })
    }

    async fn list(&self) -> Result<Vec<Announcement>> {
        let rows = sqlx::query_as::<_, AnnouncementRow>(
            r#"
            SELECT id, title, body, summary, author_id, author_name,
                   course_id, audience, created_at
            FROM announcements
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DataFetch(e.to_string()))?;

        rows.into_iter().map(Self::row_to_announcement).collect()
    }
}
