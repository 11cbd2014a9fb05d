//! High level operations. Services load state through the repositories,
//! enforce contributor permissions and persist the results.

use super::{model::node::Permission, repo::node::NodeRepo};
use crate::{err, error::LockboxError};
use std::sync::Arc;
use uuid::Uuid;

pub mod file;
pub mod node;
pub mod user;

pub type FileRepository = Arc<dyn super::repo::file::FileRepo + Send + Sync>;
pub type NodeRepository = Arc<dyn NodeRepo + Send + Sync>;
pub type UserRepository = Arc<dyn super::repo::user::UserRepo + Send + Sync>;

/// Ensure `user` holds at least `required` on the node and return their actual permission.
async fn require_permission(
    nodes: &NodeRepository,
    node_id: Uuid,
    user: Uuid,
    required: Permission,
) -> Result<Permission, LockboxError> {
    match nodes.get_permission(node_id, user).await? {
        Some(permission) if permission >= required => Ok(permission),
        Some(permission) => {
            err!(
                Forbidden,
                "'{required}' permission required on node '{node_id}', user has '{permission}'"
            )
        }
        None => err!(Forbidden, "not a contributor on node '{node_id}'"),
    }
}
