pub mod error;
pub mod routes;
pub mod state;
pub mod unseal;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;
pub use unseal::{run_unseal_sweep, spawn_unseal_scheduler, SweepReport};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(routes::health))
        .route(
            "/api/create-capsule",
            post(routes::capsules::create_capsule),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the HTTP server and the unseal scheduler on `0.0.0.0:{port}`.
pub async fn serve(app_state: AppState, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    serve_on(app_state, listener).await
}

/// Like [`serve`], on a listener the caller already bound.
pub async fn serve_on(
    app_state: AppState,
    listener: tokio::net::TcpListener,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let scheduler = spawn_unseal_scheduler(app_state.clone());
    let app = build_router(app_state);

    tracing::info!("Visionary server listening on http://localhost:{actual_port}");

    let result = axum::serve(listener, app).await;
    scheduler.abort();
    result?;
    Ok(())
}
