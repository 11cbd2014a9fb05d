use crate::{
    config::ACCESS_TOKEN_COOKIE,
    core::service::user::UserService,
    error::{LockboxErr, LockboxError},
};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_macros::debug_middleware;
use uuid::Uuid;

/// The authenticated caller, inserted into request extensions by [auth_check].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester(pub Uuid);

/// Resolve the access token of the request, if any, to a [Requester].
///
/// Requests without a token pass through anonymously so handlers can decide
/// whether identity is required. A token that does not resolve to a user is
/// rejected outright.
#[debug_middleware]
pub async fn auth_check(
    users: State<UserService>,
    cookies: axum_extra::extract::cookie::CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let access_token = match cookies.get(ACCESS_TOKEN_COOKIE) {
        Some(token) => Some(token.value().to_string()),
        None => match request.headers().get(AUTHORIZATION) {
            Some(header) => {
                let header = match header.to_str() {
                    Ok(header) => header,
                    Err(e) => {
                        tracing::error!("Invalid header: {e}");
                        return unauthorized();
                    }
                };

                let Some(token) = header.strip_prefix("Bearer ") else {
                    tracing::error!("Invalid authorization header");
                    return unauthorized();
                };

                Some(token.trim().to_string())
            }
            None => None,
        },
    };

    let Some(access_token) = access_token else {
        tracing::debug!("No access token found, continuing anonymously");
        return next.run(request).await;
    };

    match users.authenticate(&access_token).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(Requester(user.id));
            next.run(request).await
        }
        Ok(None) => {
            tracing::warn!("Unknown access token, rejecting request");
            unauthorized()
        }
        Err(e) => e.into_response(),
    }
}

fn unauthorized() -> Response {
    LockboxError::new(file!(), line!(), column!(), LockboxErr::Unauthorized).into_response()
}
