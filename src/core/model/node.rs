use crate::error::{LockboxErr, LockboxError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A project grouping files and the users allowed to work on them.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Primary key.
    pub id: Uuid,

    /// Human readable title.
    pub title: String,

    pub created_at: DateTime<Utc>,
}

/// Access level a contributor holds on a node. Levels are ordered, each one
/// includes the capabilities of the ones below it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
    Admin,
}

impl Permission {
    pub fn can_read(self) -> bool {
        self >= Permission::Read
    }

    pub fn can_write(self) -> bool {
        self >= Permission::Write
    }

    pub fn is_admin(self) -> bool {
        self == Permission::Admin
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::Read => write!(f, "read"),
            Permission::Write => write!(f, "write"),
            Permission::Admin => write!(f, "admin"),
        }
    }
}

impl TryFrom<&str> for Permission {
    type Error = LockboxError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "admin" => Ok(Self::Admin),
            _ => Err(LockboxError::new(
                file!(),
                line!(),
                column!(),
                LockboxErr::InvalidRow(format!("unknown permission '{value}'")),
            )),
        }
    }
}

/// A user's entry in a node's contributor list.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    pub node_id: Uuid,
    pub user_id: Uuid,
    pub permission: Permission,
    pub created_at: DateTime<Utc>,
}
