//! groundwork HTTP server
//!
//! Main entry point for the HTTP API server.

use std::{sync::Arc, time::Duration};

use infrastructure::{
    AppConfig, Logger, ServiceMetadata, StdoutSink, field_value, init_tracing,
};
use presentation_http::{readiness::Readiness, routes, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first so the logging setup honors the configured
    // format and level
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e.to_string())),
    };

    // Framework-level diagnostics (axum, tower, hyper)
    init_tracing(&config.logging)?;

    // The application logger; injected into the state and middleware,
    // flushed on shutdown
    let logger = Arc::new(Logger::new(
        ServiceMetadata {
            service: config.service_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: config.environment.to_string(),
        },
        config.logging.level,
        config.logging.format,
        Arc::new(StdoutSink::new()),
    ));

    if let Some(error) = config_error {
        logger.warn(
            "Failed to load config, using defaults",
            &[("error", field_value(error))],
        );
    }

    logger.info(
        "starting",
        &[
            ("host", field_value(&config.server.host)),
            ("port", field_value(config.server.port)),
            ("environment", field_value(config.environment.to_string())),
        ],
    );

    // Startup dependencies for the readiness endpoint. The scaffold has
    // only its configuration; services built on it register theirs here
    // before binding the listener.
    let readiness = Arc::new(Readiness::new());
    readiness.register("config");
    readiness.mark_ready("config");

    let state = AppState {
        logger: logger.clone(),
        readiness,
        config: Arc::new(config.clone()),
    };

    let app = routes::create_router(state);

    // Configure CORS layer
    let cors_layer = if config.server.allowed_origins.is_empty() {
        // Development mode: allow all origins
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production mode: restrict to configured origins
        use axum::http::{HeaderValue, Method};
        let origins: Vec<HeaderValue> = config
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any)
    };

    let app = app.layer(cors_layer);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    logger.info("server listening", &[("address", field_value(&addr))]);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    logger.info("server shutdown complete", &[]);
    logger.flush();

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM) and handle graceful shutdown
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        // Log error but continue waiting - this is a best-effort signal handler
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
    // The actual connection draining is handled by axum's graceful_shutdown
}
