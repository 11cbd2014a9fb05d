use crate::error::{LockboxErr, LockboxError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Holds file metadata.
/// Main file model for the `files` table.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// Primary key.
    pub id: Uuid,

    /// The node the file belongs to.
    pub node_id: Uuid,

    /// File name.
    pub name: String,

    /// Path of the file within its provider.
    pub path: String,

    pub kind: FileKind,

    /// Storage backend owning the file.
    pub provider: String,

    /// The user currently holding the file checked out.
    pub checkout: Option<Uuid>,

    /// Last time the file's metadata was refreshed from its provider.
    pub last_touched: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Whether a user other than `user` holds the checkout.
    pub fn is_checked_out_by_other(&self, user: Uuid) -> bool {
        self.checkout.is_some_and(|holder| holder != user)
    }
}

/// A file along with the size of its latest version.
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub file: File,

    /// Size of the most recent version, `None` if the file has no versions.
    pub size: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Folder,
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileKind::File => write!(f, "file"),
            FileKind::Folder => write!(f, "folder"),
        }
    }
}

impl TryFrom<&str> for FileKind {
    type Error = LockboxError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "file" => Ok(Self::File),
            "folder" => Ok(Self::Folder),
            _ => Err(LockboxError::new(
                file!(),
                line!(),
                column!(),
                LockboxErr::InvalidRow(format!("unknown file kind '{value}'")),
            )),
        }
    }
}

/// A recorded revision of a file's content.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileVersion {
    pub id: Uuid,
    pub file_id: Uuid,

    /// The user who uploaded the version.
    pub creator: Uuid,

    /// Content size in bytes.
    pub size: i64,

    pub content_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// DTO for inserting files.
#[derive(Debug)]
pub struct FileInsert<'a> {
    pub id: Uuid,
    pub node_id: Uuid,
    pub name: &'a str,
    pub path: &'a str,
    pub kind: FileKind,
    pub provider: &'a str,
}

impl<'a> FileInsert<'a> {
    pub fn new(node_id: Uuid, name: &'a str, path: &'a str, provider: &'a str) -> Self {
        Self {
            id: Uuid::new_v4(),
            node_id,
            name,
            path,
            kind: FileKind::File,
            provider,
        }
    }
}

/// DTO for inserting file versions.
#[derive(Debug)]
pub struct VersionInsert<'a> {
    pub id: Uuid,
    pub file_id: Uuid,
    pub creator: Uuid,
    pub size: i64,
    pub content_type: Option<&'a str>,
}

impl<'a> VersionInsert<'a> {
    pub fn new(file_id: Uuid, creator: Uuid, size: i64, content_type: Option<&'a str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_id,
            creator,
            size,
            content_type,
        }
    }
}
