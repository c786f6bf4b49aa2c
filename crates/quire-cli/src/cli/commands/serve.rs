//! `quire serve`: the telnet listener.

use anyhow::Result;
use quire_core::Config;
use quire_core::logging::{self, LogTarget};
use quire_server::{Server, SiteContext, shutdown_signal};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::site_parts;

pub async fn run(config: Config) -> Result<()> {
    let _guard = logging::init(LogTarget::Stderr)?;

    let (store, converter, options) = site_parts(&config);
    let site = SiteContext {
        store,
        converter,
        options,
    };
    let server = Server::bind(&config.bind_addr(), site, config.shutdown_grace()).await?;
    info!(
        content_root = %config.content_root.display(),
        "serving {}",
        config.site_name
    );

    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_token.cancel();
    });

    server.run(token).await
}
