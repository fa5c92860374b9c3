//! HTTP surface - router, shared state, CORS and the server loop.
//!
//! | Route              | Method              | Guard           |
//! |--------------------|---------------------|-----------------|
//! | `/admin/bean`      | GET, POST           | admin token     |
//! | `/admin/bean/:id`  | GET, PUT, DELETE    | admin token     |
//! | `/botd`            | GET                 | public          |
//! | `/search`          | GET (query), POST   | any valid token |

/// Admin bean CRUD handlers
pub mod admin;
/// Bearer token extractors
pub mod auth;
/// Public bean of the day handler
pub mod botd;
/// Error to response mapping
pub mod error;
/// Search handlers
pub mod search;

use crate::{
    auth::JwtVerifier,
    config::settings::Settings,
    errors::Result,
};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use sea_orm::DatabaseConnection;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Catalog database
    pub db: DatabaseConnection,
    /// Bearer token verifier
    pub verifier: Arc<JwtVerifier>,
}

impl AppState {
    /// Bundles the database and verifier for the router.
    pub const fn new(db: DatabaseConnection, verifier: Arc<JwtVerifier>) -> Self {
        Self { db, verifier }
    }
}

/// Builds the application router.
pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route(
            "/admin/bean",
            get(admin::list_beans).post(admin::create_bean),
        )
        .route(
            "/admin/bean/:id",
            get(admin::get_bean)
                .put(admin::update_bean)
                .delete(admin::delete_bean),
        )
        .route("/botd", get(botd::get_botd))
        .route(
            "/search",
            get(search::search_by_query).post(search::search_by_body),
        )
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS with credentials. An empty origin list mirrors the caller's origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| {
                HeaderValue::from_str(origin)
                    .inspect_err(|_| warn!("Ignoring invalid CORS origin: {}", origin))
                    .ok()
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

/// Binds the configured address and serves until ctrl-c or SIGTERM.
///
/// # Errors
/// Returns an error if the address is invalid or the listener cannot be bound.
pub async fn serve(settings: &Settings, state: AppState) -> Result<()> {
    let addr = settings.bind_address()?;
    let app = router(state, &settings.server.cors_origins);

    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
