use clap::Parser;
use minikube_service::{app, config::Config, host::HostSource, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    let _guard = telemetry::init_tracing(
        format!("{}-{}", env!("CARGO_PKG_NAME"), config.service_name),
        env!("CARGO_PKG_VERSION"),
    )?;

    if config.service_name.trim().parse::<i64>().is_err() {
        tracing::warn!(
            service_name = %config.service_name,
            "service name is not a number, /trace will never call upstream"
        );
    }

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        service_name = %config.service_name,
        forwards_upstream = config.forwards_upstream(),
        upstream = %config.upstream_url,
        "listening"
    );

    let state = AppState::new(config, HostSource::System)?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to listen for SIGTERM");
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
