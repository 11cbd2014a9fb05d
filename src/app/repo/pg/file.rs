use super::is_unique_violation;
use crate::{
    core::{
        model::{
            file::{File, FileInsert, FileKind, FileMetadata, FileVersion, VersionInsert},
            List, Pagination,
        },
        repo::{file::FileRepo, Atomic},
    },
    err,
    error::LockboxError,
    map_err, transaction,
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Selects a file along with the size of its latest version.
const SELECT_METADATA: &str = r#"
    SELECT
        f.id,
        f.node_id,
        f.name,
        f.path,
        f.kind,
        f.provider,
        f.checkout,
        f.last_touched,
        f.created_at,
        f.updated_at,
        (
            SELECT v.size FROM file_versions v
            WHERE v.file_id = f.id
            ORDER BY v.created_at DESC
            LIMIT 1
        ) AS size
    FROM files f"#;

#[async_trait::async_trait]
impl FileRepo for PgPool {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<File>, LockboxError> {
        Ok(self.get_metadata(id).await?.map(|metadata| metadata.file))
    }

    async fn get_metadata(&self, id: Uuid) -> Result<Option<FileMetadata>, LockboxError> {
        let row: Option<FileRow> = map_err!(
            sqlx::query_as(&format!("{SELECT_METADATA} WHERE f.id = $1"))
                .bind(id)
                .fetch_optional(self)
                .await
        );
        row.map(FileMetadata::try_from).transpose()
    }

    async fn get_by_path(&self, node_id: Uuid, path: &str) -> Result<Option<File>, LockboxError> {
        let row: Option<FileRow> = map_err!(
            sqlx::query_as(&format!(
                "{SELECT_METADATA} WHERE f.node_id = $1 AND f.path = $2"
            ))
            .bind(node_id)
            .bind(path)
            .fetch_optional(self)
            .await
        );
        Ok(row
            .map(FileMetadata::try_from)
            .transpose()?
            .map(|metadata| metadata.file))
    }

    async fn list_by_node(
        &self,
        node_id: Uuid,
        p: Pagination,
    ) -> Result<List<FileMetadata>, LockboxError> {
        let total: i64 = map_err!(
            sqlx::query_scalar("SELECT COUNT(id) FROM files WHERE node_id = $1")
                .bind(node_id)
                .fetch_one(self)
                .await
        );

        let (limit, offset) = p.to_limit_offset()?;

        let rows: Vec<FileRow> = map_err!(
            sqlx::query_as(&format!(
                "{SELECT_METADATA} WHERE f.node_id = $1 ORDER BY f.path LIMIT $2 OFFSET $3"
            ))
            .bind(node_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self)
            .await
        );

        let files = rows
            .into_iter()
            .map(FileMetadata::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(List::new(Some(total as usize), files))
    }

    async fn insert_with_version(
        &self,
        file: FileInsert<'_>,
        version: VersionInsert<'_>,
    ) -> Result<FileMetadata, LockboxError> {
        let id = file.id;

        transaction!(self, |tx| insert_file(file, version, tx))?;

        match self.get_metadata(id).await? {
            Some(metadata) => Ok(metadata),
            None => err!(DoesNotExist, "File with ID '{id}'"),
        }
    }

    async fn list_versions(&self, file_id: Uuid) -> Result<Vec<FileVersion>, LockboxError> {
        Ok(map_err!(
            sqlx::query_as(
                "SELECT id, file_id, creator, size, content_type, created_at
                 FROM file_versions
                 WHERE file_id = $1
                 ORDER BY created_at DESC",
            )
            .bind(file_id)
            .fetch_all(self)
            .await
        ))
    }

    async fn insert_version(
        &self,
        version: VersionInsert<'_>,
    ) -> Result<FileVersion, LockboxError> {
        let mut conn = map_err!(self.acquire().await);
        insert_version(version, &mut conn).await
    }

    async fn swap_checkout(
        &self,
        id: Uuid,
        expected: Option<Uuid>,
        holder: Option<Uuid>,
    ) -> Result<bool, LockboxError> {
        let result = map_err!(
            sqlx::query(
                "UPDATE files SET checkout = $2, updated_at = NOW()
                 WHERE id = $1 AND checkout IS NOT DISTINCT FROM $3",
            )
            .bind(id)
            .bind(holder)
            .bind(expected)
            .execute(self)
            .await
        );
        Ok(result.rows_affected() == 1)
    }
}

async fn insert_file(
    file: FileInsert<'_>,
    version: VersionInsert<'_>,
    tx: &mut <PgPool as Atomic>::Tx,
) -> Result<(), LockboxError> {
    let FileInsert {
        id,
        node_id,
        name,
        path,
        kind,
        provider,
    } = file;

    let result = sqlx::query(
        "INSERT INTO files (id, node_id, name, path, kind, provider)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(id)
    .bind(node_id)
    .bind(name)
    .bind(path)
    .bind(kind.to_string())
    .bind(provider)
    .execute(&mut **tx)
    .await;

    match result {
        Err(e) if is_unique_violation(&e) => {
            return err!(AlreadyExists, "File '{path}' on node '{node_id}'")
        }
        result => {
            map_err!(result);
        }
    }

    insert_version(version, tx).await?;

    Ok(())
}

async fn insert_version(
    version: VersionInsert<'_>,
    conn: &mut sqlx::PgConnection,
) -> Result<FileVersion, LockboxError> {
    let VersionInsert {
        id,
        file_id,
        creator,
        size,
        content_type,
    } = version;

    Ok(map_err!(
        sqlx::query_as(
            "INSERT INTO file_versions (id, file_id, creator, size, content_type)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, file_id, creator, size, content_type, created_at",
        )
        .bind(id)
        .bind(file_id)
        .bind(creator)
        .bind(size)
        .bind(content_type)
        .fetch_one(conn)
        .await
    ))
}

#[derive(Debug, FromRow)]
struct FileRow {
    id: Uuid,
    node_id: Uuid,
    name: String,
    path: String,
    kind: String,
    provider: String,
    checkout: Option<Uuid>,
    last_touched: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    size: Option<i64>,
}

impl TryFrom<FileRow> for FileMetadata {
    type Error = LockboxError;

    fn try_from(row: FileRow) -> Result<Self, Self::Error> {
        let kind = FileKind::try_from(row.kind.as_str())?;
        Ok(FileMetadata {
            file: File {
                id: row.id,
                node_id: row.node_id,
                name: row.name,
                path: row.path,
                kind,
                provider: row.provider,
                checkout: row.checkout,
                last_touched: row.last_touched,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            size: row.size,
        })
    }
}
