//! Server lifecycle: bind, serve, drain on shutdown signal.

use std::future::{Future, IntoFuture};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::oneshot;

use visitor_core::error::{CounterError, Result};

use crate::{app_state::AppState, router};

/// Bind the configured address and serve until Ctrl-C / SIGTERM.
pub async fn run(state: AppState) -> Result<()> {
    let listen = state.cfg().server.listen_addr()?;
    let listener = TcpListener::bind(listen)
        .await
        .map_err(|e| CounterError::Internal(format!("bind {listen} failed: {e}")))?;

    tracing::info!(%listen, route = %state.cfg().server.route, "visitor-api starting");
    serve(listener, state, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
///
/// Readiness flips to draining first, then in-flight requests get
/// `server.shutdown_grace_ms` to finish.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let grace = Duration::from_millis(state.cfg().server.shutdown_grace_ms);
    let app = router::build_router(state.clone());

    let draining = state.clone();
    let (drain_tx, drain_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown.await;
        draining.set_draining();
        tracing::info!(grace_ms = millis(grace), "draining");
        let _ = drain_tx.send(());
    });
    let server = std::pin::pin!(server.into_future());

    let grace_elapsed = async move {
        match drain_rx.await {
            Ok(()) => tokio::time::sleep(grace).await,
            Err(_) => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        res = server => {
            res.map_err(|e| CounterError::Internal(format!("server failed: {e}")))?;
        }
        _ = grace_elapsed => {
            tracing::warn!("shutdown grace elapsed, dropping open connections");
        }
    }

    tracing::info!("visitor-api stopped");
    Ok(())
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        tracing::info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
