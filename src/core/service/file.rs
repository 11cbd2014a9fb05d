use super::{require_permission, FileRepository, NodeRepository};
use crate::{
    core::{
        checkout::{self, CheckoutChange},
        model::{
            file::{FileInsert, FileMetadata, FileVersion, VersionInsert},
            node::Permission,
            List, Pagination,
        },
    },
    err,
    error::LockboxError,
    map_err,
};
use dto::{FileUpload, VersionUpload};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validify::{Validate, Validify};

/// High level operations for file management.
#[derive(Clone)]
pub struct FileService {
    files: FileRepository,
    nodes: NodeRepository,

    /// Provider tag of the storage owned by this service.
    native_provider: Arc<str>,
}

impl FileService {
    pub fn new(files: FileRepository, nodes: NodeRepository, native_provider: &str) -> Self {
        Self {
            files,
            nodes,
            native_provider: Arc::from(native_provider),
        }
    }

    pub fn native_provider(&self) -> &str {
        &self.native_provider
    }

    /// Get a file and the size of its latest version.
    ///
    /// * `requester`: The authenticated caller.
    /// * `id`: File ID.
    pub async fn get_file(
        &self,
        requester: Option<Uuid>,
        id: Uuid,
    ) -> Result<FileMetadata, LockboxError> {
        let Some(requester) = requester else {
            return err!(Unauthorized);
        };

        let Some(metadata) = self.files.get_metadata(id).await? else {
            return err!(DoesNotExist, "File with ID '{id}'");
        };

        require_permission(
            &self.nodes,
            metadata.file.node_id,
            requester,
            Permission::Read,
        )
        .await?;

        Ok(metadata)
    }

    /// Check a file out to `holder`, or check it in if `holder` is `None`.
    ///
    /// The holder observed when deciding is the one replaced; if it changed in the
    /// meantime nothing is written and the call fails with a conflict.
    ///
    /// * `requester`: The authenticated caller.
    /// * `id`: File ID.
    /// * `holder`: The requested checkout holder.
    pub async fn update_checkout(
        &self,
        requester: Option<Uuid>,
        id: Uuid,
        holder: Option<Uuid>,
    ) -> Result<FileMetadata, LockboxError> {
        let Some(requester) = requester else {
            return err!(Unauthorized);
        };

        let Some(file) = self.files.get_by_id(id).await? else {
            return err!(DoesNotExist, "File with ID '{id}'");
        };

        let permission = self.nodes.get_permission(file.node_id, requester).await?;

        let holder = map_err!(checkout::evaluate(CheckoutChange {
            provider: &file.provider,
            native_provider: &self.native_provider,
            current: file.checkout,
            requester: Some(requester),
            permission,
            new_holder: holder,
        }));

        if holder != file.checkout {
            if !self.files.swap_checkout(id, file.checkout, holder).await? {
                return err!(Conflict, "Checkout of file '{id}' changed concurrently");
            }

            match holder {
                Some(holder) => info!("File '{id}' checked out by '{holder}'"),
                None => info!("File '{id}' checked in by '{requester}'"),
            }
        }

        match self.files.get_metadata(id).await? {
            Some(metadata) => Ok(metadata),
            None => err!(DoesNotExist, "File with ID '{id}'"),
        }
    }

    /// List a file's versions, newest first.
    ///
    /// * `requester`: The authenticated caller.
    /// * `id`: File ID.
    pub async fn list_versions(
        &self,
        requester: Option<Uuid>,
        id: Uuid,
    ) -> Result<Vec<FileVersion>, LockboxError> {
        let Some(requester) = requester else {
            return err!(Unauthorized);
        };

        let Some(file) = self.files.get_by_id(id).await? else {
            return err!(DoesNotExist, "File with ID '{id}'");
        };

        require_permission(&self.nodes, file.node_id, requester, Permission::Read).await?;

        self.files.list_versions(id).await
    }

    /// Record a new version of a file. Refused while someone else holds the file checked out.
    ///
    /// * `requester`: The authenticated caller.
    /// * `id`: File ID.
    /// * `upload`: Version metadata.
    pub async fn add_version(
        &self,
        requester: Option<Uuid>,
        id: Uuid,
        upload: VersionUpload,
    ) -> Result<FileVersion, LockboxError> {
        map_err!(upload.validate());

        let Some(requester) = requester else {
            return err!(Unauthorized);
        };

        let Some(file) = self.files.get_by_id(id).await? else {
            return err!(DoesNotExist, "File with ID '{id}'");
        };

        require_permission(&self.nodes, file.node_id, requester, Permission::Write).await?;

        if file.provider != *self.native_provider {
            return err!(
                ForbiddenProvider,
                "files stored in '{}' cannot be versioned here",
                file.provider
            );
        }

        if file.is_checked_out_by_other(requester) {
            return err!(Forbidden, "File '{id}' is checked out by another user");
        }

        let version = self
            .files
            .insert_version(VersionInsert::new(
                id,
                requester,
                upload.size,
                upload.content_type.as_deref(),
            ))
            .await?;

        info!("Added version '{}' to file '{id}'", version.id);

        Ok(version)
    }

    /// Register a file in the native provider together with its first version.
    ///
    /// * `requester`: The authenticated caller.
    /// * `node_id`: Node the file belongs to.
    /// * `upload`: File metadata.
    pub async fn create_file(
        &self,
        requester: Option<Uuid>,
        node_id: Uuid,
        mut upload: FileUpload,
    ) -> Result<FileMetadata, LockboxError> {
        map_err!(upload.validify());

        let Some(requester) = requester else {
            return err!(Unauthorized);
        };

        if self.nodes.get_by_id(node_id).await?.is_none() {
            return err!(DoesNotExist, "Node with ID '{node_id}'");
        }

        require_permission(&self.nodes, node_id, requester, Permission::Write).await?;

        let FileUpload {
            ref name,
            ref path,
            size,
            ref content_type,
        } = upload;

        if let Some(existing) = self.files.get_by_path(node_id, path).await? {
            return err!(
                AlreadyExists,
                "File '{path}' already exists on node '{node_id}' ({})",
                existing.id
            );
        }

        let insert = FileInsert::new(node_id, name, path, &self.native_provider);
        let version = VersionInsert::new(insert.id, requester, size, content_type.as_deref());

        let metadata = self.files.insert_with_version(insert, version).await?;

        info!("Created file '{}' at '{path}'", metadata.file.id);

        Ok(metadata)
    }

    /// Get a paginated list of a node's files.
    ///
    /// * `requester`: The authenticated caller.
    /// * `node_id`: Node ID.
    /// * `p`: Pagination.
    pub async fn list_node_files(
        &self,
        requester: Option<Uuid>,
        node_id: Uuid,
        p: Pagination,
    ) -> Result<List<FileMetadata>, LockboxError> {
        map_err!(p.validate());

        let Some(requester) = requester else {
            return err!(Unauthorized);
        };

        if self.nodes.get_by_id(node_id).await?.is_none() {
            return err!(DoesNotExist, "Node with ID '{node_id}'");
        }

        require_permission(&self.nodes, node_id, requester, Permission::Read).await?;

        self.files.list_by_node(node_id, p).await
    }
}

/// File service DTOs.
pub mod dto {
    use serde::Deserialize;
    use utoipa::ToSchema;
    use validify::{field_err, Validate, ValidationError, Validify};

    fn absolute(s: &str) -> Result<(), ValidationError> {
        if !s.starts_with('/') {
            return Err(field_err!("path", "file path must start with '/'"));
        }
        Ok(())
    }

    /// Metadata of a file uploaded to the native provider.
    #[derive(Debug, Deserialize, Validify, ToSchema)]
    #[serde(rename_all = "camelCase")]
    pub struct FileUpload {
        /// File name.
        #[modify(trim)]
        #[validate(length(min = 1, message = "File name cannot be empty."))]
        pub name: String,

        /// Absolute path of the file within its node.
        #[modify(trim)]
        #[validate(custom(absolute))]
        pub path: String,

        /// Size in bytes of the initial version.
        #[validate(range(min = 0.))]
        pub size: i64,

        pub content_type: Option<String>,
    }

    /// Metadata of a new file version.
    #[derive(Debug, Deserialize, Validate, ToSchema)]
    #[serde(rename_all = "camelCase")]
    pub struct VersionUpload {
        /// Size in bytes.
        #[validate(range(min = 0.))]
        pub size: i64,

        pub content_type: Option<String>,
    }
}
