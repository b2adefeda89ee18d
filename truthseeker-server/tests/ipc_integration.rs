//! IPC integration tests: length-delimited MessagePack frames over a Unix socket.

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UnixStream;
use tokio::sync::broadcast;
use tokio_util::codec::Framed;
use truthseeker_core::config::WorkflowMode;
use truthseeker_core::ipc::{SeekerRequest, SeekerResponse};
use truthseeker_core::{FactChecker, MemoryReportStore, ReportService, SeekerConfig, Submission};
use truthseeker_server::router::AppContext;
use truthseeker_server::server::{frame_codec, run_unix_server};

async fn start_server(socket: &str) -> broadcast::Sender<()> {
    let mut config = SeekerConfig::default();
    config.workflow.mode = WorkflowMode::Disabled;
    let ctx = AppContext {
        checker: FactChecker::from_config(&config, None).unwrap(),
        reports: ReportService::new(Arc::new(MemoryReportStore::default()), "admin@x"),
        socket_path: socket.to_string(),
    };

    let (tx, _rx) = broadcast::channel(1);
    let shutdown = tx.subscribe();
    let path = socket.to_string();
    tokio::spawn(async move {
        run_unix_server(&path, ctx, shutdown).await.unwrap();
    });

    for _ in 0..50 {
        if std::path::Path::new(socket).exists() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    tx
}

async fn roundtrip(
    framed: &mut Framed<UnixStream, tokio_util::codec::LengthDelimitedCodec>,
    request: &SeekerRequest,
) -> SeekerResponse {
    let bytes = rmp_serde::to_vec_named(request).unwrap();
    framed.send(Bytes::from(bytes)).await.unwrap();
    let frame = framed.next().await.unwrap().unwrap();
    rmp_serde::from_slice(&frame).unwrap()
}

#[tokio::test]
async fn test_ipc_ping_and_check() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("truthseeker.sock");
    let socket = socket.to_str().unwrap();
    let shutdown = start_server(socket).await;

    let stream = UnixStream::connect(socket).await.unwrap();
    let mut framed = Framed::new(stream, frame_codec());

    let pong = roundtrip(&mut framed, &SeekerRequest::Ping).await;
    assert!(pong.is_ok());

    let check = roundtrip(
        &mut framed,
        &SeekerRequest::Check {
            submission: Submission::text("vaccines cause autism"),
        },
    )
    .await;
    assert!(check.is_ok());
    let data = check.data.unwrap();
    assert_eq!(data["classification"], "Potential Misinformation");
    assert_eq!(data["corrected"], true);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_ipc_garbage_frame_gets_error_response() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("truthseeker.sock");
    let socket = socket.to_str().unwrap();
    let shutdown = start_server(socket).await;

    let stream = UnixStream::connect(socket).await.unwrap();
    let mut framed = Framed::new(stream, frame_codec());

    framed.send(Bytes::from_static(&[0xc1, 0x00])).await.unwrap();
    let frame = framed.next().await.unwrap().unwrap();
    let response: SeekerResponse = rmp_serde::from_slice(&frame).unwrap();
    assert_eq!(response.status, "error");
    assert!(response.error.unwrap().starts_with("Deserialization error"));

    let health = roundtrip(&mut framed, &SeekerRequest::Health).await;
    assert!(health.is_ok());

    let _ = shutdown.send(());
}
