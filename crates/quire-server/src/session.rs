//! One remote viewer.
//!
//! Each connection gets its own session state, render cache and renderer.
//! Events are handled strictly one at a time; after each batch of input the
//! renderer's buffered output is flushed to the socket.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::cursor::Show;
use crossterm::queue;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use quire_core::ContentStore;
use quire_tui::{
    Flow, MarkdownConverter, SessionDriver, SessionEvent, SessionOptions, SessionRenderer,
    SessionState,
};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::telnet::{DEFAULT_SIZE, NEGOTIATION, TelnetDecoder};

const READ_BUFFER_SIZE: usize = 1024;

/// Everything a session shares with the rest of the server.
#[derive(Clone)]
pub struct SiteContext {
    pub store: Arc<dyn ContentStore>,
    pub converter: Arc<dyn MarkdownConverter>,
    pub options: SessionOptions,
}

impl SiteContext {
    fn session_state(&self) -> SessionState {
        SessionState::new(
            Arc::clone(&self.store),
            Arc::clone(&self.converter),
            self.options.clone(),
        )
    }
}

/// Why a session loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    Disconnected,
    Shutdown,
}

/// Serves one connection until the viewer quits, disconnects or the server
/// shuts down.
///
/// # Errors
/// Returns an error on socket failures or when a page fails to render.
pub async fn run_session<S>(
    stream: S,
    peer: SocketAddr,
    site: SiteContext,
    token: CancellationToken,
) -> Result<SessionEnd>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (mut reader, mut writer) = tokio::io::split(stream);
    writer
        .write_all(&NEGOTIATION)
        .await
        .context("Failed to send telnet negotiation")?;

    let (width, height) = DEFAULT_SIZE;
    let renderer = SessionRenderer::new(Vec::new(), width, height)?;
    let mut driver = SessionDriver::new(site.session_state(), renderer);
    queue!(driver.renderer_mut().writer_mut(), EnterAlternateScreen)
        .context("Failed to enter alternate screen")?;

    let result = drive(&mut reader, &mut writer, &mut driver, peer, &token).await;
    match result {
        Ok(SessionEnd::Disconnected) => Ok(SessionEnd::Disconnected),
        Ok(end) => {
            close(&mut writer, &mut driver).await?;
            Ok(end)
        }
        Err(err) => {
            // The client still gets its screen back before the error surfaces.
            if let Err(cleanup) = close(&mut writer, &mut driver).await {
                debug!(%peer, "failed to restore client screen: {cleanup:#}");
            }
            Err(err)
        }
    }
}

/// Feeds input to the driver until the session ends.
async fn drive<R, W>(
    reader: &mut R,
    writer: &mut W,
    driver: &mut SessionDriver<Vec<u8>>,
    peer: SocketAddr,
    token: &CancellationToken,
) -> Result<SessionEnd>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (width, height) = DEFAULT_SIZE;
    let first = driver.dispatch(SessionEvent::Resize { width, height })?;
    flush(writer, driver).await?;
    if first == Flow::Quit {
        return Ok(SessionEnd::Quit);
    }

    let mut decoder = TelnetDecoder::new();
    let mut buf = [0u8; READ_BUFFER_SIZE];
    loop {
        tokio::select! {
            () = token.cancelled() => return Ok(SessionEnd::Shutdown),
            read = reader.read(&mut buf) => {
                let n = read.context("Failed to read from connection")?;
                if n == 0 {
                    debug!(%peer, "connection closed by peer");
                    return Ok(SessionEnd::Disconnected);
                }
                for event in decoder.feed(&buf[..n]) {
                    if driver.dispatch(event)? == Flow::Quit {
                        flush(writer, driver).await?;
                        return Ok(SessionEnd::Quit);
                    }
                }
                flush(writer, driver).await?;
            }
        }
    }
}

/// Leaves the alternate screen, shows the cursor and closes the write side.
async fn close<W>(writer: &mut W, driver: &mut SessionDriver<Vec<u8>>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    queue!(driver.renderer_mut().writer_mut(), LeaveAlternateScreen, Show)
        .context("Failed to leave alternate screen")?;
    flush(writer, driver).await?;
    writer
        .shutdown()
        .await
        .context("Failed to close connection")
}

async fn flush<W>(writer: &mut W, driver: &mut SessionDriver<Vec<u8>>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let output = driver.renderer_mut().take_output();
    if output.is_empty() {
        return Ok(());
    }
    writer
        .write_all(&output)
        .await
        .context("Failed to write to connection")?;
    writer.flush().await.context("Failed to flush connection")
}
