// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{process::ExitCode, sync::Arc, time::Duration};

use axum_server::{tls_rustls::RustlsConfig, Handle};
use campus_coin_relay::{
    api::router,
    auth::SessionKeys,
    catalog::ActivityCatalog,
    config::{Config, LogFormat, DEFAULT_LOG_FILTER},
    ledger::HttpLedgerClient,
    state::AppState,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing(LogFormat::from_env());

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let ledger = match HttpLedgerClient::new(config.backend_url.clone(), config.ledger_timeout) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to build ledger client");
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(
        Arc::new(ledger),
        ActivityCatalog::predefined(),
        SessionKeys::new(config.session_secret.as_bytes(), config.session_ttl),
    );
    let app = router(state);

    let shutdown = CancellationToken::new();
    let handle = Handle::new();
    let signal_handle = handle.clone();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if shutdown_requested(signal_token).await {
            info!(
                grace_secs = SHUTDOWN_GRACE.as_secs(),
                "Shutdown signal received, draining connections"
            );
            signal_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        }
    });

    let addr = config.bind_addr;
    let served = match &config.tls {
        Some(tls) => {
            // Must run before any TLS operation
            if rustls::crypto::ring::default_provider()
                .install_default()
                .is_err()
            {
                error!("Failed to install rustls crypto provider");
                return ExitCode::FAILURE;
            }

            let tls_config = match RustlsConfig::from_pem_file(&tls.cert, &tls.key).await {
                Ok(tls_config) => tls_config,
                Err(e) => {
                    error!(error = %e, cert = %tls.cert.display(), "Failed to load TLS certificate");
                    return ExitCode::FAILURE;
                }
            };

            info!(
                %addr,
                backend = %config.backend_url,
                "Campus coin relay listening on https://{addr} (docs at /docs)"
            );
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
        }
        None => {
            info!(
                %addr,
                backend = %config.backend_url,
                "Campus coin relay listening on http://{addr} (docs at /docs)"
            );
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
        }
    };

    shutdown.cancel();

    match served {
        Ok(()) => {
            info!("Server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

/// Wait for SIGINT/SIGTERM. Returns `false` if `shutdown` was cancelled
/// first because the server already stopped.
async fn shutdown_requested(shutdown: CancellationToken) -> bool {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
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
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => true,
        _ = terminate => true,
        _ = shutdown.cancelled() => false,
    }
}
