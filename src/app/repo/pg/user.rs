use super::is_unique_violation;
use crate::{
    core::{
        model::user::User,
        repo::{user::UserRepo, Atomic},
    },
    err,
    error::LockboxError,
    map_err, transaction,
};
use sqlx::PgPool;
use uuid::Uuid;

#[async_trait::async_trait]
impl UserRepo for PgPool {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, LockboxError> {
        Ok(map_err!(
            sqlx::query_as("SELECT id, username, created_at FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(self)
                .await
        ))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, LockboxError> {
        Ok(map_err!(
            sqlx::query_as("SELECT id, username, created_at FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(self)
                .await
        ))
    }

    async fn insert_with_token(
        &self,
        username: &str,
        token_hash: &str,
    ) -> Result<User, LockboxError> {
        transaction!(self, |tx| insert_user(username, token_hash, tx))
    }

    async fn get_by_token_hash(&self, token_hash: &str) -> Result<Option<User>, LockboxError> {
        Ok(map_err!(
            sqlx::query_as(
                "SELECT u.id, u.username, u.created_at
                 FROM users u
                 INNER JOIN access_tokens t ON t.user_id = u.id
                 WHERE t.token_hash = $1",
            )
            .bind(token_hash)
            .fetch_optional(self)
            .await
        ))
    }
}

async fn insert_user(
    username: &str,
    token_hash: &str,
    tx: &mut <PgPool as Atomic>::Tx,
) -> Result<User, LockboxError> {
    let user: Result<User, _> = sqlx::query_as(
        "INSERT INTO users (id, username) VALUES ($1, $2) RETURNING id, username, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .fetch_one(&mut **tx)
    .await;

    let user = match user {
        Err(e) if is_unique_violation(&e) => return err!(AlreadyExists, "User '{username}'"),
        user => map_err!(user),
    };

    map_err!(
        sqlx::query("INSERT INTO access_tokens (token_hash, user_id) VALUES ($1, $2)")
            .bind(token_hash)
            .bind(user.id)
            .execute(&mut **tx)
            .await
    );

    Ok(user)
}
