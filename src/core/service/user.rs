use super::UserRepository;
use crate::{
    core::{
        auth::{token_hash, AccessToken},
        model::user::User,
    },
    err,
    error::LockboxError,
    map_err,
};
use dto::{Registration, RegisterPayload};
use tracing::info;
use validify::Validify;

/// User registration and token based authentication.
#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
}

impl UserService {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    /// Create a user and issue their access token.
    /// The token is only ever returned here.
    ///
    /// * `payload`: Registration parameters.
    pub async fn register(
        &self,
        mut payload: RegisterPayload,
    ) -> Result<Registration, LockboxError> {
        map_err!(payload.validify());

        if self.users.get_by_username(&payload.username).await?.is_some() {
            return err!(AlreadyExists, "User '{}'", payload.username);
        }

        let AccessToken { token, hash } = AccessToken::issue();

        let user = self
            .users
            .insert_with_token(&payload.username, &hash)
            .await?;

        info!("Registered user '{}' ({})", user.username, user.id);

        Ok(Registration { user, token })
    }

    /// Resolve an access token to its user.
    ///
    /// * `token`: Access token as presented by the client.
    pub async fn authenticate(&self, token: &str) -> Result<Option<User>, LockboxError> {
        if token.is_empty() {
            return Ok(None);
        }
        self.users.get_by_token_hash(&token_hash(token)).await
    }
}

/// User service DTOs.
pub mod dto {
    use crate::core::model::user::User;
    use serde::{Deserialize, Serialize};
    use utoipa::ToSchema;
    use validify::Validify;

    #[derive(Debug, Deserialize, Validify, ToSchema)]
    #[serde(rename_all = "camelCase")]
    pub struct RegisterPayload {
        /// Unique login name.
        #[modify(trim)]
        #[validate(length(min = 1, max = 64))]
        pub username: String,
    }

    /// A newly registered user and their access token.
    #[derive(Debug, Serialize, ToSchema)]
    #[serde(rename_all = "camelCase")]
    pub struct Registration {
        pub user: User,
        pub token: String,
    }
}
