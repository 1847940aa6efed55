use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dci_api::config::ServerConfig;
use dci_api::router::build_app_router;
use dci_api::state::AppState;
use dci_convert::ConvertConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dci_api=debug,dci_db=info,dci_convert=info,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let convert_config = ConvertConfig::from_env();
    tracing::info!(
        backend = convert_config.backend.as_str(),
        scratch_dir = %convert_config.scratch_root.display(),
        "Loaded converter configuration",
    );
    config
        .check_conversion_deadline(convert_config.deadline())
        .unwrap_or_else(|e| panic!("Invalid timeout configuration: {e}"));

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = dci_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    dci_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    dci_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let reload_pool = match &config.reload_database_url {
        Some(url) => {
            let pool = dci_db::create_pool(url)
                .await
                .expect("Failed to connect with RELOAD_DATABASE_URL");
            tracing::info!("Reload connection pool created");
            Some(pool)
        }
        None => None,
    };

    // --- Converter ---
    let converter =
        dci_convert::build_converter(&convert_config).expect("Failed to build converter");
    tokio::fs::create_dir_all(&convert_config.scratch_root)
        .await
        .expect("Failed to create scratch directory");

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        reload_pool,
        config: Arc::new(config.clone()),
        converter,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    // In-flight requests get `shutdown_timeout` to drain once a signal arrives.
    tokio::select! {
        result = server => result.expect("Server error"),
        () = async {
            shutdown_signal().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            tracing::warn!(timeout_secs = shutdown_timeout.as_secs(), "Shutdown drain timed out");
        }
    }

    // --- Post-shutdown cleanup ---
    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
