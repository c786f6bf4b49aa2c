//! TCP listener and session supervision.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::session::{SiteContext, run_session};

pub struct Server {
    listener: TcpListener,
    site: SiteContext,
    shutdown_grace: Duration,
}

impl Server {
    /// Binds the listening socket.
    ///
    /// # Errors
    /// Returns an error if the address cannot be bound.
    pub async fn bind(addr: &str, site: SiteContext, shutdown_grace: Duration) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        Ok(Self {
            listener,
            site,
            shutdown_grace,
        })
    }

    /// # Errors
    /// Returns an error if the socket has no local address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("Failed to read listener address")
    }

    /// Accepts connections until `token` is cancelled, then gives running
    /// sessions the grace period before aborting them.
    ///
    /// # Errors
    /// Only setup failures are returned; session failures are logged.
    pub async fn run(self, token: CancellationToken) -> Result<()> {
        info!(addr = %self.local_addr()?, "listening");
        let mut sessions: JoinSet<()> = JoinSet::new();

        loop {
            tokio::select! {
                () = token.cancelled() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        info!(%peer, "session opened");
                        let site = self.site.clone();
                        let token = token.child_token();
                        sessions.spawn(async move {
                            match run_session(stream, peer, site, token).await {
                                Ok(end) => info!(%peer, ?end, "session closed"),
                                Err(err) => error!(%peer, "session failed: {err:#}"),
                            }
                        });
                    }
                    Err(err) => warn!("accept failed: {err}"),
                },
                Some(joined) = sessions.join_next(), if !sessions.is_empty() => {
                    log_join(joined);
                }
            }
        }

        info!(active = sessions.len(), "listener stopped");
        let drained = tokio::time::timeout(self.shutdown_grace, async {
            while let Some(joined) = sessions.join_next().await {
                log_join(joined);
            }
        })
        .await;
        if drained.is_err() {
            warn!(
                remaining = sessions.len(),
                "shutdown grace period elapsed; aborting sessions"
            );
            sessions.abort_all();
            while sessions.join_next().await.is_some() {}
        }
        Ok(())
    }
}

fn log_join(joined: Result<(), JoinError>) {
    if let Err(err) = joined
        && err.is_panic()
    {
        error!("session task panicked: {err}");
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("shutdown requested");
}

