//! Subscription API server binary

use axum::Router;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use subtrack_core::SubscriptionService;
use subtrack_db::Storage;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use subscription_api::{build_router, AppEnv, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    init_tracing(config.env)?;
    tracing::info!(env = ?config.env, "Starting Subscription API");
    tracing::info!(
        http_address = %config.http_address,
        request_timeout_secs = config.request_timeout.as_secs(),
        "Configuration loaded"
    );

    // Initialize metrics
    let metrics_handle = if config.metrics_enabled {
        Some(setup_metrics()?)
    } else {
        None
    };

    // Open storage
    let storage = Storage::open(&config.storage).await?;
    tracing::info!(backend = storage.backend_name(), "Storage opened");

    let service = SubscriptionService::new(storage.subscriptions());
    let http_address = config.http_address;
    let state = AppState::new(service, config);

    let app = build_router(state, metrics_handle);

    let result = run_http_server(app, http_address).await;

    storage.close().await;
    tracing::info!("Shutdown complete");

    result
}

fn init_tracing(env: AppEnv) -> anyhow::Result<()> {
    let default_level = match env {
        AppEnv::Dev => "debug",
        AppEnv::Prod => "info",
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!(
            "subscription_api={default_level},subtrack_core={default_level},\
             subtrack_db={default_level},tower_http={default_level}"
        ))
    })?;

    // Text for humans in dev, JSON for log shipping in prod
    let (text, json) = match env {
        AppEnv::Dev => (Some(tracing_subscriber::fmt::layer()), None),
        AppEnv::Prod => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .init();

    Ok(())
}

async fn run_http_server(app: Router, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    // Storage-bound requests should finish well inside the request timeout
    let latency_buckets = &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("subscription_operation_duration_seconds".to_string()),
            latency_buckets,
        )?
        .install_recorder()?;

    metrics::describe_histogram!(
        "subscription_operation_duration_seconds",
        "Subscription operation latency in seconds by operation and result"
    );

    Ok(handle)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
