// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, time::Duration};

use axum::Router;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use user_service_auth::{
    api::router, config::ServerConfig, state::AppState, telemetry::init_tracing,
};

/// Time allowed for in-flight requests after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    init_tracing(config.log_format)?;

    let app = router(AppState::from_config(&config));

    let handle = Handle::new();
    tokio::spawn(shutdown_on_signal(handle.clone()));

    tracing::info!(
        addr = %config.bind_addr,
        tls = config.tls.is_some(),
        token_validity_secs = config.token_validity.as_secs(),
        public_routes = config.public_routes.len(),
        "User service listening"
    );

    serve(app, &config, handle).await?;

    tracing::info!("User service stopped");
    Ok(())
}

/// Serve `app` on the configured address until `handle` shuts it down.
async fn serve(
    app: Router,
    config: &ServerConfig,
    handle: Handle<SocketAddr>,
) -> Result<(), Box<dyn std::error::Error>> {
    match &config.tls {
        Some(tls) => {
            // Install the ring crypto provider for rustls (must be done before any TLS operations)
            rustls::crypto::ring::default_provider()
                .install_default()
                .map_err(|_| "Failed to install rustls crypto provider")?;

            let tls_config = RustlsConfig::from_pem_file(&tls.cert, &tls.key).await?;
            axum_server::bind_rustls(config.bind_addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            axum_server::bind(config.bind_addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
    }
    Ok(())
}

async fn shutdown_on_signal(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received, draining connections");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn plain_server_stops_on_graceful_shutdown() {
        let config = ServerConfig::from_lookup(|name| match name {
            "JWT_SYMMETRIC_KEY" => Some("server-test-secret".to_string()),
            "HOST" => Some("127.0.0.1".to_string()),
            "PORT" => Some("0".to_string()),
            _ => None,
        })
        .unwrap();
        let app = router(AppState::from_config(&config));
        let handle: Handle<SocketAddr> = Handle::new();

        let stopper = handle.clone();
        let stop = async move {
            let addr = stopper.listening().await;
            assert!(addr.is_some_and(|addr| addr.port() != 0));
            stopper.graceful_shutdown(Some(Duration::from_millis(100)));
        };

        let (served, ()) = tokio::join!(serve(app, &config, handle), stop);
        assert!(served.is_ok());
    }
}
