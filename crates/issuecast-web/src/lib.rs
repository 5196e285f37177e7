//! Issuecast Web Server
//!
//! Axum server wiring the webhook ingestor, the broadcast hub, the WebSocket
//! sessions, and the issue action gateway together.

pub mod hub;
pub mod routes;
pub mod state;
pub mod websocket;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/issues", get(routes::issues::list_issues))
        .route("/issues/{iid}", get(routes::issues::get_issue))
        .route("/issues/{iid}/close", post(routes::issues::close_issue))
        .route("/issues/{iid}/reopen", post(routes::issues::reopen_issue))
        .route("/issues/{iid}/checklist", post(routes::issues::update_checklist))
        .route("/webhook", post(routes::webhook::receive))
        .route("/ws", get(websocket::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("issuecast server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}
