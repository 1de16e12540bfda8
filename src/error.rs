use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// Failures that abort a benchmark process. Per-connection outcomes are not
/// errors, see [`crate::net::ConnectionEnd`].
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("create socket failed")]
    Socket(#[source] io::Error),

    #[error("setsockopt reuse-addr error")]
    ReuseAddr(#[source] io::Error),

    #[error("bind socket to {addr} error")]
    Bind { addr: SocketAddr, source: io::Error },

    #[error("listen socket error")]
    Listen(#[source] io::Error),

    #[error("connect server {addr} error")]
    Connect { addr: SocketAddr, source: io::Error },

    #[error("get sockopt {option} failed")]
    BufferSize {
        option: &'static str,
        source: io::Error,
    },

    #[error("accept socket error")]
    Accept(#[source] io::Error),

    #[error("set TCP_NODELAY={enabled} failed")]
    NoDelay { enabled: bool, source: io::Error },

    #[error("build tokio runtime failed")]
    Runtime(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, BenchError>;
