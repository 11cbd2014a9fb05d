use super::{require_permission, NodeRepository, UserRepository};
use crate::{
    core::{
        model::node::{Contributor, Node, Permission},
        repo::node::ContributorRemoval,
    },
    err,
    error::LockboxError,
    map_err,
};
use dto::CreateNodePayload;
use tracing::info;
use uuid::Uuid;
use validify::Validify;

/// High level operations for nodes and their contributor lists.
#[derive(Clone)]
pub struct NodeService {
    nodes: NodeRepository,
    users: UserRepository,
}

impl NodeService {
    pub fn new(nodes: NodeRepository, users: UserRepository) -> Self {
        Self { nodes, users }
    }

    /// Create a node. The creator becomes its first admin.
    ///
    /// * `requester`: The authenticated caller.
    /// * `payload`: Node parameters.
    pub async fn create_node(
        &self,
        requester: Option<Uuid>,
        mut payload: CreateNodePayload,
    ) -> Result<Node, LockboxError> {
        map_err!(payload.validify());

        let Some(requester) = requester else {
            return err!(Unauthorized);
        };

        let node = self
            .nodes
            .insert_with_admin(&payload.title, requester)
            .await?;

        info!("User '{requester}' created node '{}'", node.id);

        Ok(node)
    }

    pub async fn get_node(&self, requester: Option<Uuid>, id: Uuid) -> Result<Node, LockboxError> {
        let Some(requester) = requester else {
            return err!(Unauthorized);
        };

        let Some(node) = self.nodes.get_by_id(id).await? else {
            return err!(DoesNotExist, "Node with ID '{id}'");
        };

        require_permission(&self.nodes, id, requester, Permission::Read).await?;

        Ok(node)
    }

    pub async fn list_contributors(
        &self,
        requester: Option<Uuid>,
        id: Uuid,
    ) -> Result<Vec<Contributor>, LockboxError> {
        self.get_node(requester, id).await?;
        self.nodes.list_contributors(id).await
    }

    /// Add a contributor or change their permission. Admin only.
    ///
    /// A node always keeps at least one admin, so demoting the last one fails.
    ///
    /// * `requester`: The authenticated caller.
    /// * `id`: Node ID.
    /// * `user_id`: The contributor.
    /// * `permission`: The permission to grant.
    pub async fn set_contributor(
        &self,
        requester: Option<Uuid>,
        id: Uuid,
        user_id: Uuid,
        permission: Permission,
    ) -> Result<Contributor, LockboxError> {
        self.require_admin(requester, id).await?;

        if self.users.get_by_id(user_id).await?.is_none() {
            return err!(DoesNotExist, "User with ID '{user_id}'");
        }

        let Some(contributor) = self
            .nodes
            .upsert_contributor(id, user_id, permission)
            .await?
        else {
            return err!(BadRequest, "Node '{id}' must keep at least one admin");
        };

        info!("Granted '{permission}' on node '{id}' to '{user_id}'");

        Ok(contributor)
    }

    /// Remove a contributor. Admin only.
    ///
    /// * `requester`: The authenticated caller.
    /// * `id`: Node ID.
    /// * `user_id`: The contributor to remove.
    pub async fn remove_contributor(
        &self,
        requester: Option<Uuid>,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<(), LockboxError> {
        self.require_admin(requester, id).await?;

        match self.nodes.remove_contributor(id, user_id).await? {
            ContributorRemoval::Removed => {}
            ContributorRemoval::Missing => {
                return err!(DoesNotExist, "Contributor '{user_id}' on node '{id}'")
            }
            ContributorRemoval::LastAdmin => {
                return err!(BadRequest, "Node '{id}' must keep at least one admin")
            }
        }

        info!("Removed '{user_id}' from node '{id}'");

        Ok(())
    }

    async fn require_admin(&self, requester: Option<Uuid>, id: Uuid) -> Result<(), LockboxError> {
        let Some(requester) = requester else {
            return err!(Unauthorized);
        };

        if self.nodes.get_by_id(id).await?.is_none() {
            return err!(DoesNotExist, "Node with ID '{id}'");
        }

        require_permission(&self.nodes, id, requester, Permission::Admin).await?;

        Ok(())
    }
}

/// Node service DTOs.
pub mod dto {
    use crate::core::model::node::Permission;
    use serde::Deserialize;
    use utoipa::ToSchema;
    use validify::Validify;

    #[derive(Debug, Deserialize, Validify, ToSchema)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateNodePayload {
        /// Node title.
        #[modify(trim)]
        #[validate(length(min = 1, message = "Node title cannot be empty."))]
        pub title: String,
    }

    #[derive(Debug, Deserialize, ToSchema)]
    #[serde(rename_all = "camelCase")]
    pub struct ContributorPayload {
        pub permission: Permission,
    }
}
