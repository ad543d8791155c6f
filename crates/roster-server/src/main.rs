//! Roster Server Binary
//!
//! Runs the user administration HTTP server.

use std::error::Error;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use roster_server::{
    create_router, AppState, KeyMaterial, MemoryStore, ServerConfig, UserService, UserStore,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_target(true)
        .with_thread_ids(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Nothing can be signed without keys, so a load failure ends the process
    let keys = KeyMaterial::load(&config.private_key_path, &config.public_key_path)?;

    let store: Arc<dyn UserStore> = Arc::new(MemoryStore::new());
    let users = UserService::new(store, Arc::new(keys));

    let state = Arc::new(AppState { users });
    let app = create_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        addr = %addr,
        private_key = %config.private_key_path.display(),
        public_key = %config.public_key_path.display(),
        "Roster server listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
