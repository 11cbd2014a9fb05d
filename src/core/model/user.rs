use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Main user model for the `users` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Primary key.
    pub id: Uuid,

    /// Unique login name.
    pub username: String,

    pub created_at: DateTime<Utc>,
}
