use crate::{core::model::user::User, error::LockboxError};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait UserRepo {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, LockboxError>;

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, LockboxError>;

    /// Insert a user together with the digest of their first access token.
    ///
    /// * `username`: Unique login name.
    /// * `token_hash`: Hex encoded SHA-256 of the access token.
    async fn insert_with_token(
        &self,
        username: &str,
        token_hash: &str,
    ) -> Result<User, LockboxError>;

    /// Resolve an access token digest to its owner.
    ///
    /// * `token_hash`: Hex encoded SHA-256 of the access token.
    async fn get_by_token_hash(&self, token_hash: &str) -> Result<Option<User>, LockboxError>;
}
