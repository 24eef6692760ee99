//! Kitchenmap HTTP server
//!
//! JSON API under `/api` over the kitchen directory, ratings, accounts,
//! places import and recommendations.
//!
//! ```sh
//! KITCHENMAP_DATABASE=kitchens.db \
//! GOOGLE_MAPS_API_KEY=... \
//! RUST_LOG=info kitchenmap-server
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, patch, post},
    Router,
};
use kitchenmap_core::AppConfig;
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

pub mod error;
pub mod routes;
pub mod state;

use error::AppError;
use state::AppState;

/// Install the `RUST_LOG`-driven subscriber (idempotent)
pub fn init_tracing() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api", get(routes::index))
        .route("/api/", get(routes::index))
        .route(
            "/api/kitchens",
            get(routes::list_kitchens).post(routes::create_kitchen),
        )
        .route("/api/kitchens/nearest", get(routes::nearest_kitchens))
        .route("/api/kitchens/top-rated", get(routes::top_rated_kitchens))
        .route("/api/kitchens/search", get(routes::search_kitchens))
        .route("/api/kitchens/import", post(routes::import_kitchens))
        .route(
            "/api/kitchens/{id}",
            get(routes::get_kitchen)
                .patch(routes::update_kitchen)
                .delete(routes::delete_kitchen),
        )
        .route("/api/kitchens/{id}/ratings", get(routes::kitchen_ratings))
        .route("/api/kitchens/{id}/wait-time", get(routes::kitchen_wait_time))
        .route("/api/ratings", post(routes::create_rating))
        .route(
            "/api/ratings/{id}",
            patch(routes::update_rating).delete(routes::delete_rating),
        )
        .route("/api/users", post(routes::register_user))
        .route("/api/users/login", post(routes::login))
        .route(
            "/api/users/{id}",
            get(routes::get_user).delete(routes::delete_user),
        )
        .route("/api/recommendations", post(routes::recommend))
        .route("/api/stats", get(routes::stats))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server(config: AppConfig) -> Result<(), AppError> {
    info!("Initializing state...");
    let address = config.server.bind_address();
    let state = AppState::from_config(config)?;

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| AppError::Bind {
            address: address.clone(),
            source,
        })?;
    info!("Server running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Serve)?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
