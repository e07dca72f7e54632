use axum::http::{header, HeaderName, Method};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::Config;
use crate::error::Error;
use crate::google_calendar::client::{EventInserter, GoogleCalendarClient};
use crate::handlers::{add_event_handler, health_handler, index_handler, AppState};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Config(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config, once at startup
pub fn load_config() -> miette::Result<Arc<Config>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(config)),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Build the router with CORS and request tracing applied
pub fn build_router(state: AppState) -> Router {
    // Any origin, the fixed method/header set; preflight OPTIONS requests
    // are answered with an empty 200 by the layer itself
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ]);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/add-event", post(add_event_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind the listener and serve requests until the process is stopped
pub async fn start_server(config: Arc<Config>) -> miette::Result<()> {
    if config.credentials.is_none() {
        warn!("No Google credentials configured; /add-event will fail until they are set");
    }

    let inserter: Arc<dyn EventInserter> = Arc::new(GoogleCalendarClient::new(Arc::clone(&config)));

    let state = AppState {
        config: Arc::clone(&config),
        inserter,
    };

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Calendar relay listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(Error::from)?;
    axum::serve(listener, app).await.map_err(Error::from)?;

    Ok(())
}
