use crate::core::checkout::Denial;
use std::error::Error as _;
use thiserror::Error;
use tracing::error;
use validify::ValidationErrors;

pub mod http;

#[derive(Debug, Error)]
pub enum LockboxErr {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden; {0}")]
    Forbidden(String),

    #[error("Provider does not support this operation; {0}")]
    ForbiddenProvider(String),

    #[error("Bad request; {0}")]
    BadRequest(String),

    #[error("Does not exist; {0}")]
    DoesNotExist(String),

    #[error("Entity already exists; {0}")]
    AlreadyExists(String),

    #[error("Conflict; {0}")]
    Conflict(String),

    #[error("Invalid stored value; {0}")]
    InvalidRow(String),

    #[error("IO; {0}")]
    IO(#[from] std::io::Error),

    #[error("SQL; {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration; {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("JSON error; {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Validation; {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Http; {0}")]
    Http(#[from] axum::http::Error),

    #[error("Axum; {0}")]
    Axum(#[from] axum::Error),

    #[error("uuid: {0}")]
    Uuid(#[from] uuid::Error),
}

impl From<Denial> for LockboxErr {
    fn from(value: Denial) -> Self {
        match value {
            Denial::Unauthorized => LockboxErr::Unauthorized,
            Denial::Forbidden => {
                LockboxErr::Forbidden("insufficient permission to change checkout".to_string())
            }
            Denial::ForbiddenProvider(provider) => LockboxErr::ForbiddenProvider(format!(
                "files stored in '{provider}' cannot be checked out"
            )),
            Denial::BadRequest => LockboxErr::BadRequest(
                "checkout can only be set to the requesting user".to_string(),
            ),
        }
    }
}

#[derive(Debug, Error)]
#[error("{error}")]
pub struct LockboxError {
    file: &'static str,
    line: u32,
    column: u32,
    pub error: LockboxErr,
}

impl LockboxError {
    pub fn new(file: &'static str, line: u32, column: u32, error: LockboxErr) -> LockboxError {
        LockboxError {
            file,
            line,
            column,
            error,
        }
    }

    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.file, self.line, self.column)
    }

    pub fn print(&self) {
        let location = self.location();

        error!("{location} | {self}");

        if self.error.source().is_some() {
            error!("Causes:");
        }

        let mut src = self.error.source();
        while let Some(source) = src {
            error!(" - {source}");
            src = source.source();
        }
    }
}

/// Construct an `Err(LockboxError)` of the given kind, recording the call site.
#[macro_export]
macro_rules! err {
    ($ty:ident $(, $l:literal $(,)? $($args:expr),* )?) => {
        Err($crate::error::LockboxError::new(
            file!(),
            line!(),
            column!(),
            $crate::error::LockboxErr::$ty $( (format!($l, $( $args, )*)) )?,
        ))
    };
}

/// Convert the error of `$ex` into a located [LockboxError] and propagate it.
#[macro_export]
macro_rules! map_err {
    ($ex:expr) => {
        $ex.map_err(|e| $crate::error::LockboxError::new(file!(), line!(), column!(), e.into()))?
    };
}
