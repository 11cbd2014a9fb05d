//! Http specific DTOs.

use crate::core::model::file::{FileKind, FileMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Envelope for a single file resource.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileDocument {
    pub data: FileData,
}

impl From<FileMetadata> for FileDocument {
    fn from(value: FileMetadata) -> Self {
        Self {
            data: FileData::from(value),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FileData {
    pub id: Uuid,

    /// Always `files`.
    #[serde(rename = "type")]
    pub ty: String,

    pub attributes: FileAttributes,
}

impl From<FileMetadata> for FileData {
    fn from(FileMetadata { file, size }: FileMetadata) -> Self {
        Self {
            id: file.id,
            ty: "files".to_string(),
            attributes: FileAttributes {
                path: file.path,
                kind: file.kind,
                name: file.name,
                size,
                provider: file.provider,
                last_touched: file.last_touched,
                checkout: file.checkout,
            },
        }
    }
}

/// Public attributes of a file.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileAttributes {
    pub path: String,
    pub kind: FileKind,
    pub name: String,

    /// Size of the latest version.
    pub size: Option<i64>,

    pub provider: String,
    pub last_touched: Option<DateTime<Utc>>,

    /// ID of the user holding the file checked out.
    pub checkout: Option<Uuid>,
}

/// Body for changing a file's checkout holder.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutPayload {
    /// ID of the new holder, which must be the requesting user, or `null` to check the file in.
    /// The field is required.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub checkout: Option<Option<String>>,
}
