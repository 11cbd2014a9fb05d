use super::{LockboxErr, LockboxError};
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

impl LockboxError {
    pub fn status(&self) -> StatusCode {
        use LockboxErr as E;
        use StatusCode as SC;
        match self.error {
            E::Unauthorized => SC::UNAUTHORIZED,
            E::Forbidden(_) | E::ForbiddenProvider(_) => SC::FORBIDDEN,
            E::BadRequest(_) | E::Validation(_) | E::Uuid(_) => SC::BAD_REQUEST,
            E::DoesNotExist(_) => SC::NOT_FOUND,
            E::AlreadyExists(_) | E::Conflict(_) => SC::CONFLICT,
            E::InvalidRow(_)
            | E::IO(_)
            | E::Sqlx(_)
            | E::Migrate(_)
            | E::SerdeJson(_)
            | E::Http(_)
            | E::Axum(_) => SC::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response wrapper.
#[derive(Debug, Serialize)]
struct ResponseError<T: Serialize> {
    error_type: ErrorType,
    body: T,
}

impl<T> ResponseError<T>
where
    T: Serialize,
{
    pub fn new(error_type: ErrorType, body: T) -> Self {
        Self { error_type, body }
    }
}

#[derive(Debug, Serialize)]
enum ErrorType {
    Internal,
    Api,
}

impl<T> IntoResponse for ResponseError<T>
where
    T: Serialize,
{
    fn into_response(self) -> axum::response::Response {
        <Json<ResponseError<T>> as IntoResponse>::into_response(Json(self))
    }
}

impl IntoResponse for LockboxError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();

        self.print();

        use ErrorType as ET;
        use LockboxErr as LE;

        match self.error {
            LE::Unauthorized => (
                status,
                ResponseError::new(ET::Api, "Unauthorized".to_string()),
            )
                .into_response(),

            LE::Forbidden(e)
            | LE::ForbiddenProvider(e)
            | LE::BadRequest(e)
            | LE::DoesNotExist(e)
            | LE::AlreadyExists(e)
            | LE::Conflict(e) => (status, ResponseError::new(ET::Api, e)).into_response(),

            LE::Validation(errors) => (status, ResponseError::new(ET::Api, errors)).into_response(),

            LE::Uuid(e) => (status, ResponseError::new(ET::Api, e.to_string())).into_response(),

            LE::InvalidRow(_)
            | LE::IO(_)
            | LE::Sqlx(_)
            | LE::Migrate(_)
            | LE::SerdeJson(_)
            | LE::Http(_)
            | LE::Axum(_) => (
                status,
                ResponseError::new(ET::Internal, "Internal".to_string()),
            )
                .into_response(),
        }
    }
}
