//! Multi-threaded variant of the benchmark on a tokio runtime.
//!
//! Unlike [`super::Sender`], the server here hands every accepted connection
//! to its own task, so any number of clients are served at once. The
//! runtime's worker count and `TCP_NODELAY` are chosen on the command line.

use super::socket;
use super::transfer::{ConnectionEnd, TransferSummary};
use crate::error::{BenchError, Result};
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::Runtime;
use tracing::{info, trace, warn};

pub fn runtime(worker_threads: usize) -> Result<Runtime> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()
        .map_err(BenchError::Runtime)?;
    info!(worker_threads, "tokio runtime started");
    Ok(runtime)
}

/// Binds `0.0.0.0:port` with the same setup as the blocking server.
pub fn listen(port: u16) -> Result<std::net::TcpListener> {
    let listener = socket::listen(port)?;
    listener.set_nonblocking(true).map_err(BenchError::Listen)?;
    Ok(listener)
}

/// Accepts forever. Accept errors are logged and skipped; each connection
/// runs on its own task until its first failed write.
pub async fn serve(
    listener: std::net::TcpListener,
    packet_bytes: usize,
    no_delay: bool,
) -> Result<()> {
    let listener = TcpListener::from_std(listener).map_err(BenchError::Listen)?;
    let local_addr = listener.local_addr().map_err(BenchError::Listen)?;
    info!("listen ok at {}", local_addr);

    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                info!(%peer, "got a client");
                tokio::spawn(handle_connection(stream, peer, packet_bytes, no_delay));
            }
            Err(e) => warn!("accept err {}, continuing", e),
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    packet_bytes: usize,
    no_delay: bool,
) {
    if let Err(e) = set_nodelay(&stream, no_delay) {
        warn!(%peer, "{}", e);
        return;
    }

    let summary = send_stream(&mut stream, packet_bytes).await;
    summary.log("send", peer);
}

pub async fn connect(addr: SocketAddr, no_delay: bool) -> Result<TcpStream> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|source| BenchError::Connect { addr, source })?;
    info!(%addr, "connected");
    set_nodelay(&stream, no_delay)?;
    Ok(stream)
}

fn set_nodelay(stream: &TcpStream, enabled: bool) -> Result<()> {
    stream
        .set_nodelay(enabled)
        .map_err(|source| BenchError::NoDelay { enabled, source })?;
    info!("set no delay to {} ok", enabled);
    Ok(())
}

/// Writes a `packet_bytes` buffer over and over until a write fails.
pub async fn send_stream<W: AsyncWrite + Unpin>(
    stream: &mut W,
    packet_bytes: usize,
) -> TransferSummary {
    assert!(packet_bytes > 0, "packet_bytes must be non-zero");
    let buffer = vec![0u8; packet_bytes];
    info!("write {} bytes to conn", buffer.len());
    let mut calls = 0;
    let mut bytes = 0;

    let end = loop {
        match stream.write_all(&buffer).await {
            Ok(()) => {
                calls += 1;
                bytes += buffer.len() as u64;
            }
            Err(e) => break ConnectionEnd::Io(e),
        }
    };

    TransferSummary { calls, bytes, end }
}

/// Reads into a `packet_bytes` buffer until end of stream or a read error.
pub async fn recv_stream<R: AsyncRead + Unpin>(
    stream: &mut R,
    packet_bytes: usize,
) -> TransferSummary {
    assert!(packet_bytes > 0, "packet_bytes must be non-zero");
    let mut buffer = vec![0u8; packet_bytes];
    let mut calls = 0;
    let mut bytes = 0;

    let end = loop {
        match stream.read(&mut buffer).await {
            Ok(0) => break ConnectionEnd::PeerClosed,
            Ok(n) => {
                calls += 1;
                bytes += n as u64;
                trace!(n, "read ok");
            }
            Err(e) => break ConnectionEnd::Io(e),
        }
    };

    TransferSummary { calls, bytes, end }
}
