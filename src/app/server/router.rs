use super::api::ApiDoc;
use crate::app::{
    auth::{auth_check, Requester},
    state::AppState,
};
use axum::{
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Router,
};
use std::time::Duration;
use tower_http::{classify::ServerErrorsFailureClass, cors::CorsLayer, trace::TraceLayer};
use tracing::Span;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

pub(super) mod file;
pub(super) mod node;
pub(super) mod user;

pub fn router(state: AppState, origins: Vec<String>) -> Router {
    let origins = origins.into_iter().filter_map(|origin| {
        tracing::info!("Adding {origin} to allowed origins");
        match HeaderValue::from_str(&origin) {
            Ok(origin) => Some(origin),
            Err(e) => {
                tracing::error!("Invalid origin '{origin}': {e}");
                None
            }
        }
    });

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::list(origins))
        .allow_headers(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::PUT,
            Method::PATCH,
        ]);

    use file::*;
    use node::*;
    use user::*;

    let router = Router::new()
        .route(
            "/files/:id",
            get(get_file).put(update_checkout).patch(update_checkout),
        )
        .route("/files/:id/versions", get(list_versions).post(add_version))
        .route("/nodes", post(create_node))
        .route("/nodes/:id", get(get_node))
        .route(
            "/nodes/:id/files",
            get(list_node_files).post(create_file),
        )
        .route("/nodes/:id/contributors", get(list_contributors))
        .route(
            "/nodes/:id/contributors/:user_id",
            put(set_contributor).delete(remove_contributor),
        )
        .route("/users", post(register))
        .with_state(state.services.clone())
        .layer(axum::middleware::from_fn_with_state(
            state.services.user.clone(),
            auth_check,
        ));

    router
        .layer(
            TraceLayer::new_for_http()
                .on_request(|req: &axum::http::Request<_>, _span: &Span| {
                    let ctype = req
                        .headers()
                        .get("content-type")
                        .map(|v| v.to_str().unwrap_or("none"))
                        .unwrap_or("none");

                    tracing::info!(
                        "Processing request | {} {} | content-type: {ctype}",
                        req.method(),
                        req.uri().path()
                    );
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: Duration, _span: &Span| {
                        let status = res.status();
                        let ctype = res
                            .headers()
                            .get("content-type")
                            .map(|v| v.to_str().unwrap_or("none"))
                            .unwrap_or("none");

                        tracing::info!(
                            "Sending response | {status} | {}ms | {ctype}",
                            latency.as_millis()
                        );
                    },
                )
                .on_failure(
                    |error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                        tracing::error!("Error in request: {error}")
                    },
                ),
        )
        .layer(cors)
        // Unprotected at all times
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Has to go last to exclude all the tracing/cors layers
        .route("/_health", get(health_check))
}

/// Identity of the caller as resolved by [auth_check].
fn requester(requester: Option<Extension<Requester>>) -> Option<Uuid> {
    requester.map(|Extension(Requester(id))| id)
}

#[utoipa::path(
    get,
    path = "/_health",
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub(super) async fn health_check() -> impl IntoResponse {
    "OK"
}
