use crate::{
    core::{
        model::node::{Contributor, Node, Permission},
        repo::{
            node::{ContributorRemoval, NodeRepo},
            Atomic,
        },
    },
    error::LockboxError,
    map_err, transaction,
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

#[async_trait::async_trait]
impl NodeRepo for PgPool {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Node>, LockboxError> {
        Ok(map_err!(
            sqlx::query_as("SELECT id, title, created_at FROM nodes WHERE id = $1")
                .bind(id)
                .fetch_optional(self)
                .await
        ))
    }

    async fn insert_with_admin(&self, title: &str, creator: Uuid) -> Result<Node, LockboxError> {
        transaction!(self, |tx| insert_node(title, creator, tx))
    }

    async fn get_permission(
        &self,
        node_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Permission>, LockboxError> {
        let permission: Option<String> = map_err!(
            sqlx::query_scalar(
                "SELECT permission FROM contributors WHERE node_id = $1 AND user_id = $2",
            )
            .bind(node_id)
            .bind(user_id)
            .fetch_optional(self)
            .await
        );

        permission
            .as_deref()
            .map(Permission::try_from)
            .transpose()
    }

    async fn list_contributors(&self, node_id: Uuid) -> Result<Vec<Contributor>, LockboxError> {
        let rows: Vec<ContributorRow> = map_err!(
            sqlx::query_as(
                "SELECT node_id, user_id, permission, created_at
                 FROM contributors
                 WHERE node_id = $1
                 ORDER BY created_at",
            )
            .bind(node_id)
            .fetch_all(self)
            .await
        );

        rows.into_iter().map(Contributor::try_from).collect()
    }

    async fn upsert_contributor(
        &self,
        node_id: Uuid,
        user_id: Uuid,
        permission: Permission,
    ) -> Result<Option<Contributor>, LockboxError> {
        transaction!(self, |tx| upsert_keeping_admin(node_id, user_id, permission, tx))
    }

    async fn remove_contributor(
        &self,
        node_id: Uuid,
        user_id: Uuid,
    ) -> Result<ContributorRemoval, LockboxError> {
        transaction!(self, |tx| remove_keeping_admin(node_id, user_id, tx))
    }
}

/// Lock the node row for the rest of the transaction, serializing contributor changes on it.
async fn lock_node(node_id: Uuid, conn: &mut PgConnection) -> Result<(), LockboxError> {
    map_err!(
        sqlx::query("SELECT id FROM nodes WHERE id = $1 FOR UPDATE")
            .bind(node_id)
            .fetch_optional(conn)
            .await
    );
    Ok(())
}

/// Count the node's admins other than `user_id`.
async fn other_admins(
    node_id: Uuid,
    user_id: Uuid,
    conn: &mut PgConnection,
) -> Result<i64, LockboxError> {
    Ok(map_err!(
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM contributors
             WHERE node_id = $1 AND user_id <> $2 AND permission = 'admin'",
        )
        .bind(node_id)
        .bind(user_id)
        .fetch_one(conn)
        .await
    ))
}

async fn upsert_keeping_admin(
    node_id: Uuid,
    user_id: Uuid,
    permission: Permission,
    tx: &mut <PgPool as Atomic>::Tx,
) -> Result<Option<Contributor>, LockboxError> {
    lock_node(node_id, tx).await?;

    if !permission.is_admin() && other_admins(node_id, user_id, tx).await? == 0 {
        return Ok(None);
    }

    let row: ContributorRow = map_err!(
        sqlx::query_as(
            "INSERT INTO contributors (node_id, user_id, permission)
             VALUES ($1, $2, $3)
             ON CONFLICT (node_id, user_id) DO UPDATE SET permission = EXCLUDED.permission
             RETURNING node_id, user_id, permission, created_at",
        )
        .bind(node_id)
        .bind(user_id)
        .bind(permission.to_string())
        .fetch_one(&mut **tx)
        .await
    );

    Contributor::try_from(row).map(Some)
}

async fn remove_keeping_admin(
    node_id: Uuid,
    user_id: Uuid,
    tx: &mut <PgPool as Atomic>::Tx,
) -> Result<ContributorRemoval, LockboxError> {
    lock_node(node_id, tx).await?;

    let current: Option<String> = map_err!(
        sqlx::query_scalar(
            "SELECT permission FROM contributors WHERE node_id = $1 AND user_id = $2",
        )
        .bind(node_id)
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await
    );

    let Some(current) = current else {
        return Ok(ContributorRemoval::Missing);
    };

    if Permission::try_from(current.as_str())?.is_admin()
        && other_admins(node_id, user_id, tx).await? == 0
    {
        return Ok(ContributorRemoval::LastAdmin);
    }

    map_err!(
        sqlx::query("DELETE FROM contributors WHERE node_id = $1 AND user_id = $2")
            .bind(node_id)
            .bind(user_id)
            .execute(&mut **tx)
            .await
    );

    Ok(ContributorRemoval::Removed)
}

async fn insert_node(
    title: &str,
    creator: Uuid,
    tx: &mut <PgPool as Atomic>::Tx,
) -> Result<Node, LockboxError> {
    let node: Node = map_err!(
        sqlx::query_as(
            "INSERT INTO nodes (id, title) VALUES ($1, $2) RETURNING id, title, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .fetch_one(&mut **tx)
        .await
    );

    map_err!(
        sqlx::query("INSERT INTO contributors (node_id, user_id, permission) VALUES ($1, $2, $3)")
            .bind(node.id)
            .bind(creator)
            .bind(Permission::Admin.to_string())
            .execute(&mut **tx)
            .await
    );

    Ok(node)
}

#[derive(Debug, FromRow)]
struct ContributorRow {
    node_id: Uuid,
    user_id: Uuid,
    permission: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ContributorRow> for Contributor {
    type Error = LockboxError;

    fn try_from(row: ContributorRow) -> Result<Self, Self::Error> {
        Ok(Contributor {
            node_id: row.node_id,
            user_id: row.user_id,
            permission: Permission::try_from(row.permission.as_str())?,
            created_at: row.created_at,
        })
    }
}
