use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A local profile for a provider-authenticated identity. `subject` is the
/// stable id issued by the identity provider; `role` is the sole
/// authorization attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub subject: String,
    pub role: Role,
    pub display_name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Admin,
}

#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub subject: String,
    pub role: Role,
    pub display_name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwitchAccountRequest {
    /// Defaults to the caller's own record when absent.
    pub user_id: Option<Uuid>,
    pub role: Role,
    pub display_name: Option<String>,
}
