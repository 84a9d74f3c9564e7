//! Unix socket server
//!
//! Serves the cached status line. Each connection is one exchange: the
//! client writes `<position> <identity>` and half-closes, the server answers
//! with the composed line for position `right` (any case) or an empty body
//! for anything else, then closes. The response is read from the cache at
//! reply time; no sampling happens on the request path.

use std::io::ErrorKind;
use std::os::unix::fs::{FileTypeExt, PermissionsExt};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, info, warn};

use crate::cache::SharedCache;

/// Socket setup and serve failures; all fatal
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("cannot unlink {0}: file is not a socket")]
    NotASocket(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct StatusServer {
    listener: UnixListener,
    cache: SharedCache,
}

impl StatusServer {
    /// Bind the well-known socket path. A stale socket left by a crashed
    /// instance is unlinked first; any other kind of file at the path is a
    /// hard error. Permissions open the socket to group/other after bind.
    pub async fn bind(path: &Path, cache: SharedCache) -> Result<Self, ServerError> {
        unlink_stale_socket(path).await?;

        let listener = UnixListener::bind(path)?;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await?;

        info!("listening on {}", path.display());
        Ok(Self { listener, cache })
    }

    /// Accept loop. Connections are handled in their own tasks with no
    /// concurrency limit; per-connection errors are logged and dropped.
    pub async fn run(&self) -> Result<(), ServerError> {
        loop {
            let (stream, _) = self.listener.accept().await?;
            let cache = self.cache.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, cache).await {
                    warn!("connection failed: {e}");
                }
            });
        }
    }
}

/// Remove the socket path on shutdown. Called from the single shutdown
/// routine; a path that is already gone is not an error.
pub fn unlink_socket(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => info!("removed socket {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("failed to remove socket {}: {e}", path.display()),
    }
}

async fn unlink_stale_socket(path: &Path) -> Result<(), ServerError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.file_type().is_socket() => {
            info!("removing stale socket {}", path.display());
            tokio::fs::remove_file(path).await?;
            Ok(())
        }
        Ok(_) => Err(ServerError::NotASocket(path.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// One request/response exchange. Reading to EOF relies on the peer
/// half-closing its write side once the request is complete.
async fn handle_connection(mut stream: UnixStream, cache: SharedCache) -> std::io::Result<()> {
    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await?;

    let request = String::from_utf8_lossy(&raw);
    if let Some(reply) = respond(request.trim(), &cache) {
        stream.write_all(reply.as_bytes()).await?;
    } else {
        debug!("unrecognized request: {:?}", request.trim());
    }

    stream.shutdown().await
}

/// Map a trimmed request line to a response body. `None` means close with
/// an empty body.
fn respond(request: &str, cache: &SharedCache) -> Option<String> {
    let mut tokens = request.splitn(2, char::is_whitespace);
    let position = tokens.next().unwrap_or_default();
    let whoami = tokens.next().unwrap_or_default().trim();

    if position.eq_ignore_ascii_case("right") {
        Some(format!("{}\n", cache.compose_right(whoami)))
    } else {
        None
    }
}
