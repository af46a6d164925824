use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Join record between a student and a course. Immutable once created;
/// unique per (student_id, course_id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub course_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrollRequest {
    /// Defaults to the caller when absent. Only admins may enroll others.
    pub student_id: Option<Uuid>,
}
