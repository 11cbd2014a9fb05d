use crate::{
    core::model::node::{Contributor, Node, Permission},
    error::LockboxError,
};
use uuid::Uuid;

/// Keeps track of nodes and their contributor lists.
#[async_trait::async_trait]
pub trait NodeRepo {
    /// Get a node based on ID.
    ///
    /// * `id`: Node ID.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Node>, LockboxError>;

    /// Insert a node and grant `creator` admin permission on it in one transaction.
    ///
    /// * `title`: Node title.
    /// * `creator`: User ID of the creator.
    async fn insert_with_admin(&self, title: &str, creator: Uuid) -> Result<Node, LockboxError>;

    /// Get the permission `user_id` holds on the node, `None` if they are not a contributor.
    ///
    /// * `node_id`: Node ID.
    /// * `user_id`: User ID.
    async fn get_permission(
        &self,
        node_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Permission>, LockboxError>;

    /// List all contributors of a node, ordered by the time they were added.
    ///
    /// * `node_id`: Node ID.
    async fn list_contributors(&self, node_id: Uuid) -> Result<Vec<Contributor>, LockboxError>;

    /// Add a contributor or change their permission.
    ///
    /// Returns `None` without writing anything if the change would leave the node
    /// without an admin. The check and the write happen atomically.
    async fn upsert_contributor(
        &self,
        node_id: Uuid,
        user_id: Uuid,
        permission: Permission,
    ) -> Result<Option<Contributor>, LockboxError>;

    /// Remove a contributor, unless they are the node's last admin.
    /// The check and the write happen atomically.
    async fn remove_contributor(
        &self,
        node_id: Uuid,
        user_id: Uuid,
    ) -> Result<ContributorRemoval, LockboxError>;
}

/// Outcome of [NodeRepo::remove_contributor].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributorRemoval {
    Removed,

    /// The user is not a contributor on the node.
    Missing,

    /// The user is the only admin left, nothing was removed.
    LastAdmin,
}
