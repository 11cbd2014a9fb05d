use crate::{
    app::state::ServiceState,
    core::service::user::dto::{RegisterPayload, Registration},
    error::LockboxError,
};
use axum::{extract::State, http::StatusCode, Json};

#[utoipa::path(
    post,
    path = "/users",
    responses(
        (status = 201, description = "User registered, the token is only returned once", body = Registration),
        (status = 400, description = "Invalid username"),
        (status = 409, description = "Username taken"),
        (status = 500, description = "Internal server error")
    ),
    request_body = RegisterPayload
)]
pub(super) async fn register(
    services: State<ServiceState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<Registration>), LockboxError> {
    let registration = services.user.register(payload).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}
