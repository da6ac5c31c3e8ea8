//! Application startup and lifecycle management.
//!
//! An [`Application`] is one server generation: a bound listener plus the router
//! built from the configuration it was given. The [`crate::supervisor`] decides
//! what happens after a generation stops.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use hyper_util::service::TowerToHyperService;
use service_core::error::AppError;
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::ServiceConfiguration;
use crate::routes::build_router;

/// How long in-flight requests get to finish once a restart is requested.
pub const RESTART_GRACE: Duration = Duration::from_millis(500);

/// Why a generation stopped serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// `POST /service/restart` asked for a fresh generation.
    Restart,
    /// The process received a shutdown signal.
    Shutdown,
}

/// Lets a handler ask the running generation to stop and be relaunched.
///
/// Fire-and-forget: the caller gets no feedback about the relaunch.
#[derive(Debug, Clone)]
pub struct RestartHandle {
    tx: mpsc::UnboundedSender<()>,
}

impl RestartHandle {
    /// Returns `false` when the generation is already gone.
    pub fn request(&self) -> bool {
        self.tx.send(()).is_ok()
    }
}

pub struct RestartSignal {
    rx: mpsc::UnboundedReceiver<()>,
}

impl RestartSignal {
    pub async fn requested(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }
}

pub fn restart_channel() -> (RestartHandle, RestartSignal) {
    let (tx, rx) = mpsc::unbounded_channel();
    (RestartHandle { tx }, RestartSignal { rx })
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    restart: RestartSignal,
}

impl Application {
    /// Binds the listener (port 0 picks a free port) and builds the router.
    pub async fn build(config: ServiceConfiguration) -> Result<Self, AppError> {
        let config = Arc::new(config);

        let addr = format!("{}:{}", config.server_host(), config.server_port());
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let (restart_handle, restart) = restart_channel();
        let router = build_router(config.clone(), restart_handle);

        tracing::info!(
            "{} service: HTTP on port {}, API base {}",
            config.service_name(),
            port,
            config.service_api_path()
        );

        Ok(Self {
            port,
            listener,
            router,
            restart,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until a restart request or a Ctrl+C / SIGTERM.
    pub async fn run_until_stopped(self) -> Result<RunOutcome, AppError> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until a restart request or until `shutdown` resolves.
    ///
    /// Shutdown drains open connections. Restart closes the listener, gives
    /// in-flight requests [`RESTART_GRACE`] to finish, then aborts every
    /// connection still open so no client keeps talking to this generation.
    pub async fn run_until<F>(self, shutdown: F) -> Result<RunOutcome, AppError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Self {
            listener,
            router,
            mut restart,
            ..
        } = self;

        let mut connections = JoinSet::new();
        let closing = CancellationToken::new();
        tokio::pin!(shutdown);

        let outcome = loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, remote) = match accepted {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            tracing::warn!("Failed to accept connection: {}", e);
                            continue;
                        }
                    };
                    connections.spawn(serve_connection(
                        stream,
                        remote,
                        router.clone(),
                        closing.clone(),
                    ));
                }
                Some(_) = connections.join_next() => {}
                _ = &mut shutdown => break RunOutcome::Shutdown,
                true = restart.requested() => break RunOutcome::Restart,
            }
        };

        drop(listener);
        closing.cancel();

        match outcome {
            RunOutcome::Shutdown => {
                while connections.join_next().await.is_some() {}
            }
            RunOutcome::Restart => {
                tracing::warn!(
                    open_connections = connections.len(),
                    "Restart requested, closing this server generation"
                );
                let drained = tokio::time::timeout(RESTART_GRACE, async {
                    while connections.join_next().await.is_some() {}
                })
                .await;
                if drained.is_err() {
                    tracing::warn!(aborted = connections.len(), "Aborting in-flight requests");
                    connections.shutdown().await;
                }
            }
        }

        Ok(outcome)
    }
}

/// Serves one accepted connection until it ends or `closing` fires.
///
/// On `closing` the connection finishes the request it is on and is closed,
/// keep-alive included.
async fn serve_connection(
    stream: TcpStream,
    remote: SocketAddr,
    router: Router,
    closing: CancellationToken,
) {
    let service = TowerToHyperService::new(router);
    let builder = Builder::new(TokioExecutor::new());
    let conn = builder.serve_connection_with_upgrades(TokioIo::new(stream), service);
    tokio::pin!(conn);

    let result = tokio::select! {
        result = conn.as_mut() => result,
        _ = closing.cancelled() => {
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    };

    if let Err(e) = result {
        tracing::debug!(%remote, "Connection closed with error: {}", e);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
