use crate::{
    core::model::{
        file::{File, FileInsert, FileMetadata, FileVersion, VersionInsert},
        List, Pagination,
    },
    error::LockboxError,
};
use uuid::Uuid;

/// Keeps track of file metadata, their versions and checkout holders.
#[async_trait::async_trait]
pub trait FileRepo {
    /// Get file metadata based on ID.
    ///
    /// * `id`: File ID.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<File>, LockboxError>;

    /// Get file metadata along with the size of its latest version.
    ///
    /// * `id`: File ID.
    async fn get_metadata(&self, id: Uuid) -> Result<Option<FileMetadata>, LockboxError>;

    /// Get a file by its path within a node.
    ///
    /// * `node_id`: Node ID.
    /// * `path`: File path.
    async fn get_by_path(&self, node_id: Uuid, path: &str) -> Result<Option<File>, LockboxError>;

    /// List the files of a node with limit and offset, sorted by path.
    ///
    /// * `node_id`: Node ID.
    /// * `p`: Pagination params.
    async fn list_by_node(
        &self,
        node_id: Uuid,
        p: Pagination,
    ) -> Result<List<FileMetadata>, LockboxError>;

    /// Insert file metadata and its first version atomically.
    ///
    /// * `file`: File insert payload.
    /// * `version`: Initial version, its `file_id` must match `file.id`.
    async fn insert_with_version(
        &self,
        file: FileInsert<'_>,
        version: VersionInsert<'_>,
    ) -> Result<FileMetadata, LockboxError>;

    /// List a file's versions, newest first.
    ///
    /// * `file_id`: File ID.
    async fn list_versions(&self, file_id: Uuid) -> Result<Vec<FileVersion>, LockboxError>;

    /// Insert a new file version.
    ///
    /// * `version`: Version insert payload.
    async fn insert_version(&self, version: VersionInsert<'_>)
        -> Result<FileVersion, LockboxError>;

    /// Set the checkout holder of a file only if it still equals `expected`.
    /// Returns `false` if the file is missing or its holder changed in the meantime.
    ///
    /// * `id`: File ID.
    /// * `expected`: The holder observed when the change was decided.
    /// * `holder`: The new holder, `None` to clear the checkout.
    async fn swap_checkout(
        &self,
        id: Uuid,
        expected: Option<Uuid>,
        holder: Option<Uuid>,
    ) -> Result<bool, LockboxError>;
}
