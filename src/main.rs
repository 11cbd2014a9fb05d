use clap::Parser;
use lockbox::{app, config::StartArgs};
use tracing::info;

#[tokio::main]
async fn main() {
    let args = StartArgs::parse();
    let state = app::state::AppState::new(&args).await;

    let addr = args.address();
    let origins = args.allowed_origins();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("error while starting TCP listener");

    let router = app::server::router::router(state, origins);

    info!("Listening on {addr}");

    axum::serve(listener, router)
        .await
        .expect("error while starting server");
}
