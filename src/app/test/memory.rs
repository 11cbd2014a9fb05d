//! In-memory repositories backing service and router tests.

use crate::{
    core::{
        model::{
            file::{File, FileInsert, FileMetadata, FileVersion, VersionInsert},
            node::{Contributor, Node, Permission},
            user::User,
            List, Pagination,
        },
        repo::{
            file::FileRepo,
            node::{ContributorRemoval, NodeRepo},
            user::UserRepo,
        },
    },
    err,
    error::LockboxError,
};
use chrono::Utc;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    tokens: HashMap<String, Uuid>,
    nodes: HashMap<Uuid, Node>,
    contributors: Vec<Contributor>,
    files: HashMap<Uuid, File>,
    /// Insertion ordered, the last entry of a file is its latest version.
    versions: Vec<FileVersion>,
}

impl Tables {
    fn other_admins(&self, node_id: Uuid, user_id: Uuid) -> usize {
        self.contributors
            .iter()
            .filter(|c| c.node_id == node_id && c.user_id != user_id && c.permission.is_admin())
            .count()
    }

    fn metadata(&self, file: &File) -> FileMetadata {
        let size = self
            .versions
            .iter()
            .rev()
            .find(|v| v.file_id == file.id)
            .map(|v| v.size);
        FileMetadata {
            file: file.clone(),
            size,
        }
    }
}

impl MemoryStore {
    /// Overwrite a file's provider, bypassing the services.
    pub async fn set_provider(&self, id: Uuid, provider: &str) {
        let mut tables = self.tables.write().await;
        if let Some(file) = tables.files.get_mut(&id) {
            file.provider = provider.to_string();
        }
    }

    /// Overwrite a file's checkout holder, bypassing the services.
    pub async fn set_checkout(&self, id: Uuid, holder: Option<Uuid>) {
        let mut tables = self.tables.write().await;
        if let Some(file) = tables.files.get_mut(&id) {
            file.checkout = holder;
        }
    }

    pub async fn checkout(&self, id: Uuid) -> Option<Uuid> {
        self.tables
            .read()
            .await
            .files
            .get(&id)
            .and_then(|file| file.checkout)
    }
}

#[async_trait::async_trait]
impl FileRepo for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<File>, LockboxError> {
        Ok(self.tables.read().await.files.get(&id).cloned())
    }

    async fn get_metadata(&self, id: Uuid) -> Result<Option<FileMetadata>, LockboxError> {
        let tables = self.tables.read().await;
        Ok(tables.files.get(&id).map(|file| tables.metadata(file)))
    }

    async fn get_by_path(&self, node_id: Uuid, path: &str) -> Result<Option<File>, LockboxError> {
        Ok(self
            .tables
            .read()
            .await
            .files
            .values()
            .find(|f| f.node_id == node_id && f.path == path)
            .cloned())
    }

    async fn list_by_node(
        &self,
        node_id: Uuid,
        p: Pagination,
    ) -> Result<List<FileMetadata>, LockboxError> {
        let tables = self.tables.read().await;

        let mut files: Vec<&File> = tables
            .files
            .values()
            .filter(|f| f.node_id == node_id)
            .collect();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let total = files.len();
        let (limit, offset) = p.to_limit_offset()?;

        let items = files
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|file| tables.metadata(file))
            .collect();

        Ok(List::new(Some(total), items))
    }

    async fn insert_with_version(
        &self,
        file: FileInsert<'_>,
        version: VersionInsert<'_>,
    ) -> Result<FileMetadata, LockboxError> {
        let id = file.id;
        {
            let mut tables = self.tables.write().await;

            if tables
                .files
                .values()
                .any(|f| f.node_id == file.node_id && f.path == file.path)
            {
                return err!(
                    AlreadyExists,
                    "File '{}' on node '{}'",
                    file.path,
                    file.node_id
                );
            }

            let now = Utc::now();
            tables.files.insert(
                id,
                File {
                    id,
                    node_id: file.node_id,
                    name: file.name.to_string(),
                    path: file.path.to_string(),
                    kind: file.kind,
                    provider: file.provider.to_string(),
                    checkout: None,
                    last_touched: None,
                    created_at: now,
                    updated_at: now,
                },
            );
        }
        self.insert_version(version).await?;
        match self.get_metadata(id).await? {
            Some(metadata) => Ok(metadata),
            None => err!(DoesNotExist, "File with ID '{id}'"),
        }
    }

    async fn list_versions(&self, file_id: Uuid) -> Result<Vec<FileVersion>, LockboxError> {
        Ok(self
            .tables
            .read()
            .await
            .versions
            .iter()
            .rev()
            .filter(|v| v.file_id == file_id)
            .cloned()
            .collect())
    }

    async fn insert_version(
        &self,
        version: VersionInsert<'_>,
    ) -> Result<FileVersion, LockboxError> {
        let version = FileVersion {
            id: version.id,
            file_id: version.file_id,
            creator: version.creator,
            size: version.size,
            content_type: version.content_type.map(String::from),
            created_at: Utc::now(),
        };
        self.tables.write().await.versions.push(version.clone());
        Ok(version)
    }

    async fn swap_checkout(
        &self,
        id: Uuid,
        expected: Option<Uuid>,
        holder: Option<Uuid>,
    ) -> Result<bool, LockboxError> {
        let mut tables = self.tables.write().await;
        match tables.files.get_mut(&id) {
            Some(file) if file.checkout == expected => {
                file.checkout = holder;
                file.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait::async_trait]
impl NodeRepo for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Node>, LockboxError> {
        Ok(self.tables.read().await.nodes.get(&id).cloned())
    }

    async fn insert_with_admin(&self, title: &str, creator: Uuid) -> Result<Node, LockboxError> {
        let mut tables = self.tables.write().await;
        let node = Node {
            id: Uuid::new_v4(),
            title: title.to_string(),
            created_at: Utc::now(),
        };
        tables.nodes.insert(node.id, node.clone());
        tables.contributors.push(Contributor {
            node_id: node.id,
            user_id: creator,
            permission: Permission::Admin,
            created_at: Utc::now(),
        });
        Ok(node)
    }

    async fn get_permission(
        &self,
        node_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Permission>, LockboxError> {
        Ok(self
            .tables
            .read()
            .await
            .contributors
            .iter()
            .find(|c| c.node_id == node_id && c.user_id == user_id)
            .map(|c| c.permission))
    }

    async fn list_contributors(&self, node_id: Uuid) -> Result<Vec<Contributor>, LockboxError> {
        Ok(self
            .tables
            .read()
            .await
            .contributors
            .iter()
            .filter(|c| c.node_id == node_id)
            .cloned()
            .collect())
    }

    async fn upsert_contributor(
        &self,
        node_id: Uuid,
        user_id: Uuid,
        permission: Permission,
    ) -> Result<Option<Contributor>, LockboxError> {
        let mut tables = self.tables.write().await;

        if !permission.is_admin() && tables.other_admins(node_id, user_id) == 0 {
            return Ok(None);
        }

        let existing = tables
            .contributors
            .iter_mut()
            .find(|c| c.node_id == node_id && c.user_id == user_id);

        if let Some(existing) = existing {
            existing.permission = permission;
            return Ok(Some(existing.clone()));
        }

        let contributor = Contributor {
            node_id,
            user_id,
            permission,
            created_at: Utc::now(),
        };
        tables.contributors.push(contributor.clone());
        Ok(Some(contributor))
    }

    async fn remove_contributor(
        &self,
        node_id: Uuid,
        user_id: Uuid,
    ) -> Result<ContributorRemoval, LockboxError> {
        let mut tables = self.tables.write().await;

        let Some(current) = tables
            .contributors
            .iter()
            .find(|c| c.node_id == node_id && c.user_id == user_id)
            .map(|c| c.permission)
        else {
            return Ok(ContributorRemoval::Missing);
        };

        if current.is_admin() && tables.other_admins(node_id, user_id) == 0 {
            return Ok(ContributorRemoval::LastAdmin);
        }

        tables
            .contributors
            .retain(|c| !(c.node_id == node_id && c.user_id == user_id));

        Ok(ContributorRemoval::Removed)
    }
}

#[async_trait::async_trait]
impl UserRepo for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, LockboxError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, LockboxError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn insert_with_token(
        &self,
        username: &str,
        token_hash: &str,
    ) -> Result<User, LockboxError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.username == username) {
            return err!(AlreadyExists, "User '{username}'");
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        tables.tokens.insert(token_hash.to_string(), user.id);
        Ok(user)
    }

    async fn get_by_token_hash(&self, token_hash: &str) -> Result<Option<User>, LockboxError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tokens
            .get(token_hash)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }
}
