use super::requester;
use crate::{
    app::{
        auth::Requester,
        server::dto::{CheckoutPayload, FileData, FileDocument},
        state::ServiceState,
    },
    core::{
        model::{file::FileVersion, List, Pagination},
        service::file::dto::{FileUpload, VersionUpload},
    },
    err,
    error::LockboxError,
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/files/{id}",
    responses(
        (status = 200, description = "Get file by id", body = FileDocument),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not a contributor on the file's node"),
        (status = 404, description = "File not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "File ID")
    )
)]
pub(super) async fn get_file(
    services: State<ServiceState>,
    caller: Option<Extension<Requester>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FileDocument>, LockboxError> {
    let file = services.file.get_file(requester(caller), id).await?;
    Ok(Json(file.into()))
}

#[utoipa::path(
    put,
    path = "/files/{id}",
    responses(
        (status = 200, description = "Checkout holder updated", body = FileDocument),
        (status = 400, description = "Holder missing, malformed or not the requesting user"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Insufficient permission or unsupported provider"),
        (status = 404, description = "File not found"),
        (status = 409, description = "Checkout changed concurrently"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    request_body = CheckoutPayload
)]
pub(super) async fn update_checkout(
    services: State<ServiceState>,
    caller: Option<Extension<Requester>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<CheckoutPayload>, JsonRejection>,
) -> Result<Json<FileDocument>, LockboxError> {
    let Some(caller) = requester(caller) else {
        return err!(Unauthorized);
    };

    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return err!(BadRequest, "{}", rejection.body_text()),
    };

    let holder = match payload.checkout {
        Some(Some(holder)) => match Uuid::parse_str(&holder) {
            Ok(holder) => Some(holder),
            Err(_) => return err!(BadRequest, "'{holder}' is not a valid user ID"),
        },
        Some(None) => None,
        None => return err!(BadRequest, "missing field `checkout`"),
    };

    let file = services
        .file
        .update_checkout(Some(caller), id, holder)
        .await?;

    Ok(Json(file.into()))
}

#[utoipa::path(
    get,
    path = "/files/{id}/versions",
    responses(
        (status = 200, description = "List file versions, newest first", body = [FileVersion]),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not a contributor on the file's node"),
        (status = 404, description = "File not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "File ID")
    )
)]
pub(super) async fn list_versions(
    services: State<ServiceState>,
    caller: Option<Extension<Requester>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<FileVersion>>, LockboxError> {
    let versions = services.file.list_versions(requester(caller), id).await?;
    Ok(Json(versions))
}

#[utoipa::path(
    post,
    path = "/files/{id}/versions",
    responses(
        (status = 201, description = "Version recorded", body = FileVersion),
        (status = 400, description = "Invalid version metadata"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "No write permission, unsupported provider or checked out by another user"),
        (status = 404, description = "File not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    request_body = VersionUpload
)]
pub(super) async fn add_version(
    services: State<ServiceState>,
    caller: Option<Extension<Requester>>,
    Path(id): Path<Uuid>,
    Json(upload): Json<VersionUpload>,
) -> Result<(StatusCode, Json<FileVersion>), LockboxError> {
    let version = services
        .file
        .add_version(requester(caller), id, upload)
        .await?;
    Ok((StatusCode::CREATED, Json(version)))
}

#[utoipa::path(
    get,
    path = "/nodes/{id}/files",
    responses(
        (status = 200, description = "List the node's files", body = inline(List<FileData>)),
        (status = 400, description = "Invalid pagination parameters"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not a contributor on the node"),
        (status = 404, description = "Node not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "Node ID"),
        Pagination
    )
)]
pub(super) async fn list_node_files(
    services: State<ServiceState>,
    caller: Option<Extension<Requester>>,
    Path(id): Path<Uuid>,
    pagination: Option<Query<Pagination>>,
) -> Result<Json<List<FileData>>, LockboxError> {
    let Query(pagination) = pagination.unwrap_or_default();

    let files = services
        .file
        .list_node_files(requester(caller), id, pagination)
        .await?;

    Ok(Json(files.map(FileData::from)))
}

#[utoipa::path(
    post,
    path = "/nodes/{id}/files",
    responses(
        (status = 201, description = "File created", body = FileDocument),
        (status = 400, description = "Invalid file metadata"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "No write permission on the node"),
        (status = 404, description = "Node not found"),
        (status = 409, description = "A file with the same path exists"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "Node ID")
    ),
    request_body = FileUpload
)]
pub(super) async fn create_file(
    services: State<ServiceState>,
    caller: Option<Extension<Requester>>,
    Path(id): Path<Uuid>,
    Json(upload): Json<FileUpload>,
) -> Result<(StatusCode, Json<FileDocument>), LockboxError> {
    let file = services
        .file
        .create_file(requester(caller), id, upload)
        .await?;
    Ok((StatusCode::CREATED, Json(file.into())))
}
