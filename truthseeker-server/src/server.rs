//! Unix socket IPC transport.
//!
//! Each connection carries a sequence of request frames and gets one response
//! frame per request, in order. A frame that fails to decode is answered with
//! an error response and the connection stays open.

use std::os::unix::fs::FileTypeExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use anyhow::bail;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::broadcast;
use tokio_util::codec::{FramedRead, FramedWrite, LengthDelimitedCodec};
use truthseeker_core::ipc::{SeekerRequest, SeekerResponse};

use crate::router::{self, AppContext};

static NEXT_CONNECTION: AtomicU64 = AtomicU64::new(1);

/// 4-byte little-endian length prefix followed by a MessagePack payload.
pub fn frame_codec() -> LengthDelimitedCodec {
    LengthDelimitedCodec::builder().little_endian().new_codec()
}

/// Decode one request frame. A bad frame becomes the error response to send back.
pub fn decode_frame(frame: &[u8]) -> Result<SeekerRequest, SeekerResponse> {
    rmp_serde::from_slice(frame)
        .map_err(|e| SeekerResponse::err(format!("Deserialization error: {}", e)))
}

fn encode_response(response: &SeekerResponse) -> Option<Bytes> {
    match rmp_serde::to_vec_named(response) {
        Ok(bytes) => Some(Bytes::from(bytes)),
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            None
        }
    }
}

/// Remove a socket left behind by a previous run. Anything else at the path
/// is an error; the server never deletes a regular file.
fn clear_stale_socket(socket_path: &str) -> anyhow::Result<()> {
    match std::fs::symlink_metadata(socket_path) {
        Ok(meta) if meta.file_type().is_socket() => {
            tracing::info!(path = socket_path, "Removing stale socket");
            std::fs::remove_file(socket_path)?;
            Ok(())
        }
        Ok(_) => bail!("{} exists and is not a socket", socket_path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

async fn serve_connection(stream: UnixStream, ctx: AppContext, conn: u64) {
    let (read, write) = stream.into_split();
    let mut frames = FramedRead::new(read, frame_codec());
    let mut replies = FramedWrite::new(write, frame_codec());
    let mut handled = 0usize;

    while let Some(frame) = frames.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(conn, "Frame error: {}", e);
                break;
            }
        };

        let response = match decode_frame(&frame) {
            Ok(request) => {
                let action = request.action();
                let start = Instant::now();
                let response = router::handle_request(request, &ctx).await;
                tracing::info!(
                    conn,
                    action,
                    ok = response.is_ok(),
                    took_ms = start.elapsed().as_millis() as u64,
                    "IPC request"
                );
                response
            }
            Err(response) => {
                tracing::warn!(conn, bytes = frame.len(), "Undecodable IPC frame");
                response
            }
        };

        let Some(bytes) = encode_response(&response) else {
            break;
        };
        if let Err(e) = replies.send(bytes).await {
            tracing::error!(conn, "Failed to send response: {}", e);
            break;
        }
        handled += 1;
    }

    tracing::debug!(conn, handled, "IPC connection closed");
}

pub async fn run_unix_server(
    socket_path: &str,
    ctx: AppContext,
    mut shutdown: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    clear_stale_socket(socket_path)?;

    let listener = UnixListener::bind(socket_path)?;
    tracing::info!("IPC Server listening on {}", socket_path);

    loop {
        tokio::select! {
            res = listener.accept() => {
                let (stream, _) = res?;
                let conn = NEXT_CONNECTION.fetch_add(1, Ordering::Relaxed);
                tokio::spawn(serve_connection(stream, ctx.clone(), conn));
            }
            _ = shutdown.recv() => {
                tracing::info!("Shutting down IPC server...");
                break;
            }
        }
    }

    clear_stale_socket(socket_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;
    use truthseeker_core::config::WorkflowMode;
    use truthseeker_core::{FactChecker, MemoryReportStore, ReportService, SeekerConfig};

    fn context(socket: &str) -> AppContext {
        let mut config = SeekerConfig::default();
        config.workflow.mode = WorkflowMode::Disabled;
        AppContext {
            checker: FactChecker::from_config(&config, None).unwrap(),
            reports: ReportService::new(Arc::new(MemoryReportStore::default()), "admin@x"),
            socket_path: socket.to_string(),
        }
    }

    async fn wait_for(path: &Path) {
        for _ in 0..50 {
            if path.exists() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("socket {} never appeared", path.display());
    }

    #[test]
    fn test_decode_frame_garbage_is_error_response() {
        let response = decode_frame(&[0xc1]).unwrap_err();
        assert!(!response.is_ok());
        assert!(response.error.unwrap().starts_with("Deserialization error"));
    }

    #[test]
    fn test_decode_frame_ping() {
        let bytes = rmp_serde::to_vec_named(&SeekerRequest::Ping).unwrap();
        assert_eq!(decode_frame(&bytes).unwrap().action(), "ping");
    }

    #[test]
    fn test_regular_file_is_not_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("truthseeker.sock");
        std::fs::write(&path, b"not a socket").unwrap();

        let err = clear_stale_socket(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("not a socket"));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_shutdown_stops_server_and_removes_socket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("truthseeker.sock");
        let socket = path.to_str().unwrap().to_string();

        let (tx, _rx) = broadcast::channel(1);
        let shutdown = tx.subscribe();
        let ctx = context(&socket);
        let handle = tokio::spawn(async move { run_unix_server(&socket, ctx, shutdown).await });

        wait_for(&path).await;
        tx.send(()).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_stale_socket_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("truthseeker.sock");
        let stale = std::os::unix::net::UnixListener::bind(&path).unwrap();
        drop(stale);
        assert!(path.exists());

        let socket = path.to_str().unwrap().to_string();
        let (tx, _rx) = broadcast::channel(1);
        let shutdown = tx.subscribe();
        let ctx = context(&socket);
        let handle = tokio::spawn(async move { run_unix_server(&socket, ctx, shutdown).await });

        // the stale file is already there, so wait for a live listener instead
        let mut stream = None;
        for _ in 0..50 {
            if let Ok(s) = UnixStream::connect(&path).await {
                stream = Some(s);
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        let stream = stream.expect("server never accepted");
        let mut framed = tokio_util::codec::Framed::new(stream, frame_codec());
        let ping = rmp_serde::to_vec_named(&SeekerRequest::Ping).unwrap();
        framed.send(Bytes::from(ping)).await.unwrap();
        let frame = framed.next().await.unwrap().unwrap();
        let response: SeekerResponse = rmp_serde::from_slice(&frame).unwrap();
        assert!(response.is_ok());

        tx.send(()).unwrap();
        assert!(handle.await.unwrap().is_ok());
    }
}
