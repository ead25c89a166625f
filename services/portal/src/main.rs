use sea_orm::Database;
use tracing::info;

use belzir_core::tracing::{LogTarget, init_tracing};
use belzir_portal::config::PortalConfig;
use belzir_portal::router::build_router;
use belzir_portal::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing(LogTarget::Stdout);

    let config = PortalConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState { db };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.portal_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("portal service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
