use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tree_viewer::{
    config::ServerConfig, flat_store::FlatStore, graph_server::make_router,
    logging::init_logging,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::parse();
    init_logging();

    let store = match &config.data {
        Some(path) => FlatStore::load(path)?,
        None => FlatStore::builtin().clone(),
    };
    for anomaly in store.anomalies() {
        warn!(%anomaly, "flat store anomaly");
    }

    if !config.index_file().is_file() {
        warn!(
            "No frontend entry point at {}; only the API will work",
            config.index_file().display()
        );
    }

    let app = make_router(Arc::new(store), &config.static_dir);

    let addr = config.socket_addr();
    let server = axum::Server::try_bind(&addr)?.serve(app.into_make_service());
    info!("Server is running on http://{}", server.local_addr());

    server
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
