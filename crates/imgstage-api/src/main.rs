mod config;
mod error;
mod handlers;
mod routes;
mod state;
mod telemetry;

use std::sync::Arc;

use imgstage_storage::LocalStorage;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let server = config::ServerConfig::from_env()?;
    let upload = server.load_upload_config().await?;

    // Request bodies get headroom over the upload limit for multipart
    // framing; the byte-exact limit is enforced while streaming to storage.
    let max_body = imgstage_core::parse_size(&upload.max_file_size)? as usize + 1024 * 1024;

    let state = Arc::new(AppState {
        storage: LocalStorage::new(&upload.location),
        config: upload,
    });
    let app = routes::router(state, max_body);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", server.port)).await?;
    tracing::info!(port = server.port, "imgstage-api listening");
    axum::serve(listener, app).await?;

    Ok(())
}
