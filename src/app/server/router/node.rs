use super::requester;
use crate::{
    app::{auth::Requester, state::ServiceState},
    core::{
        model::node::{Contributor, Node},
        service::node::dto::{ContributorPayload, CreateNodePayload},
    },
    error::LockboxError,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/nodes",
    responses(
        (status = 201, description = "Node created, the caller is its admin", body = Node),
        (status = 400, description = "Invalid title"),
        (status = 401, description = "Unauthenticated"),
        (status = 500, description = "Internal server error")
    ),
    request_body = CreateNodePayload
)]
pub(super) async fn create_node(
    services: State<ServiceState>,
    caller: Option<Extension<Requester>>,
    Json(payload): Json<CreateNodePayload>,
) -> Result<(StatusCode, Json<Node>), LockboxError> {
    let node = services.node.create_node(requester(caller), payload).await?;
    Ok((StatusCode::CREATED, Json(node)))
}

#[utoipa::path(
    get,
    path = "/nodes/{id}",
    responses(
        (status = 200, description = "Get node by id", body = Node),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not a contributor"),
        (status = 404, description = "Node not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "Node ID")
    )
)]
pub(super) async fn get_node(
    services: State<ServiceState>,
    caller: Option<Extension<Requester>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Node>, LockboxError> {
    let node = services.node.get_node(requester(caller), id).await?;
    Ok(Json(node))
}

#[utoipa::path(
    get,
    path = "/nodes/{id}/contributors",
    responses(
        (status = 200, description = "List contributors", body = [Contributor]),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not a contributor"),
        (status = 404, description = "Node not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "Node ID")
    )
)]
pub(super) async fn list_contributors(
    services: State<ServiceState>,
    caller: Option<Extension<Requester>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Contributor>>, LockboxError> {
    let contributors = services
        .node
        .list_contributors(requester(caller), id)
        .await?;
    Ok(Json(contributors))
}

#[utoipa::path(
    put,
    path = "/nodes/{id}/contributors/{user_id}",
    responses(
        (status = 200, description = "Contributor added or updated", body = Contributor),
        (status = 400, description = "Would leave the node without an admin"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Node or user not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "Node ID"),
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    request_body = ContributorPayload
)]
pub(super) async fn set_contributor(
    services: State<ServiceState>,
    caller: Option<Extension<Requester>>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ContributorPayload>,
) -> Result<Json<Contributor>, LockboxError> {
    let contributor = services
        .node
        .set_contributor(requester(caller), id, user_id, payload.permission)
        .await?;
    Ok(Json(contributor))
}

#[utoipa::path(
    delete,
    path = "/nodes/{id}/contributors/{user_id}",
    responses(
        (status = 204, description = "Contributor removed"),
        (status = 400, description = "Would leave the node without an admin"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Node or contributor not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "Node ID"),
        ("user_id" = Uuid, Path, description = "User ID")
    )
)]
pub(super) async fn remove_contributor(
    services: State<ServiceState>,
    caller: Option<Extension<Requester>>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, LockboxError> {
    services
        .node
        .remove_contributor(requester(caller), id, user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
