//! Axum web server setup

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use super::handlers::{self, AppState, Session};

/// Routes under `/api`
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/leds", get(handlers::get_leds))
        .route("/leds/edits", post(handlers::apply_edits))
        .route("/leds/order", post(handlers::reorder))
        .route("/leds/validate", post(handlers::validate))
        .route("/leds/save", post(handlers::save))
        .route("/leds/reload", post(handlers::reload))
        .route("/buttons", get(handlers::list_buttons))
        .with_state(state)
}

/// Start the web server
pub async fn start_server(port: u16, session: Session) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let state = Arc::new(AppState::new(session));

    // CORS layer for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new().nest("/api", api_router(state)).layer(cors);

    info!("LED editor API available at http://localhost:{}/api", port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
