use crate::core::service::{
    file::FileService, node::NodeService, user::UserService, FileRepository, NodeRepository,
    UserRepository,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
pub struct AppState {
    /// Lockbox services.
    pub services: ServiceState,
}

impl AppState {
    /// Load the application state using the provided configuration.
    pub async fn new(args: &crate::config::StartArgs) -> Self {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from(args.log()))
            .init();

        let postgres = crate::app::repo::pg::init(&args.db_url()).await;

        let native_provider = args.native_provider();

        tracing::info!("Native storage provider: {native_provider}");

        let services = ServiceState::new(
            Arc::new(postgres.clone()),
            Arc::new(postgres.clone()),
            Arc::new(postgres),
            &native_provider,
        );

        Self { services }
    }
}

#[derive(Clone)]
pub struct ServiceState {
    pub file: FileService,
    pub node: NodeService,
    pub user: UserService,
}

impl ServiceState {
    pub fn new(
        files: FileRepository,
        nodes: NodeRepository,
        users: UserRepository,
        native_provider: &str,
    ) -> Self {
        Self {
            file: FileService::new(files, nodes.clone(), native_provider),
            node: NodeService::new(nodes, users.clone()),
            user: UserService::new(users),
        }
    }
}
