#[rustfmt::skip]
use super::router::{
    // App
    __path_health_check,
    // Files
    file::{
        __path_get_file,
        __path_update_checkout,
        __path_list_versions,
        __path_add_version,
        __path_list_node_files,
        __path_create_file,
    },
    // Nodes
    node::{
        __path_create_node,
        __path_get_node,
        __path_list_contributors,
        __path_set_contributor,
        __path_remove_contributor,
    },
    // Users
    user::__path_register,
};
use super::dto::{CheckoutPayload, FileAttributes, FileData, FileDocument};
use crate::core::{
    model::{
        file::{FileKind, FileVersion},
        node::{Contributor, Node, Permission},
        user::User,
        Pagination,
    },
    service::{
        file::dto::{FileUpload, VersionUpload},
        node::dto::{ContributorPayload, CreateNodePayload},
        user::dto::{RegisterPayload, Registration},
    },
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        // App
        health_check,
        // Files
        get_file,
        update_checkout,
        list_versions,
        add_version,
        list_node_files,
        create_file,
        // Nodes
        create_node,
        get_node,
        list_contributors,
        set_contributor,
        remove_contributor,
        // Users
        register,
    ),
    components(schemas(
        CheckoutPayload,
        FileAttributes,
        FileData,
        FileDocument,
        FileKind,
        FileVersion,
        FileUpload,
        VersionUpload,
        Node,
        Contributor,
        Permission,
        ContributorPayload,
        CreateNodePayload,
        User,
        RegisterPayload,
        Registration,
        Pagination,
    )),
    tags(
        (name = "lockbox", description = "Project file metadata and checkouts")
    )
)]
pub struct ApiDoc;
