//! API server entry point.

use api::config::Config;
use ledger::{InMemoryLedger, Ledger, PostgresLedger};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

async fn serve<L: Ledger + Clone + 'static>(ledger: L, config: Config, metrics_handle: PrometheusHandle) {
    let (state, poller) = api::create_default_state(ledger, &config);

    // Warm the shared snapshot; roles refresh on demand if this fails.
    match state.orchestrator.inventory().refresh_all().await {
        Ok(items) => tracing::info!(items, "inventory loaded"),
        Err(e) => tracing::warn!(error = %e, "initial inventory load failed"),
    }

    let dashboard = tokio::spawn(poller.run());
    let app = api::create_app(state, metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    dashboard.abort();
    tracing::info!("server shut down gracefully");
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    match config.database_url.clone() {
        Some(url) => {
            let ledger = PostgresLedger::connect(&url)
                .await
                .expect("failed to connect to the ledger database");
            ledger
                .run_migrations()
                .await
                .expect("failed to run ledger migrations");
            tracing::info!("using Postgres ledger");
            serve(ledger, config, metrics_handle).await;
        }
        None => {
            tracing::info!("DATABASE_URL not set, using seeded in-memory ledger");
            serve(InMemoryLedger::seeded(), config, metrics_handle).await;
        }
    }
}
