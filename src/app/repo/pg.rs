use crate::{core::repo::Atomic, error::LockboxError, map_err};
use sqlx::{PgPool, Transaction};
use tracing::info;

pub mod file;
pub mod node;
pub mod user;

pub async fn init(url: &str) -> PgPool {
    let pool = sqlx::postgres::PgPool::connect(url)
        .await
        .expect("error while connecting to db");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("error in migrations");

    info!("Connected to postgres");
    pool
}

/// Postgres error code of unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Whether the error is a violated unique constraint, i.e. the row already exists.
fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(e) if e.code().as_deref() == Some(UNIQUE_VIOLATION))
}

impl Atomic for PgPool {
    type Tx = Transaction<'static, sqlx::Postgres>;

    async fn start_tx(&self) -> Result<Self::Tx, LockboxError> {
        let tx = map_err!(self.begin().await);
        Ok(tx)
    }

    async fn commit_tx(&self, tx: Self::Tx) -> Result<(), LockboxError> {
        map_err!(tx.commit().await);
        Ok(())
    }

    async fn abort_tx(&self, tx: Self::Tx) -> Result<(), LockboxError> {
        map_err!(tx.rollback().await);
        Ok(())
    }
}
