use crate::error::{BenchError, Result};
use socket2::{Domain, Protocol, SockRef, Socket, Type};
use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use tracing::info;

pub const LISTEN_BACKLOG: i32 = 10;

/// Listens on `0.0.0.0:port`.
pub fn listen(port: u16) -> Result<TcpListener> {
    listen_on(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)))
}

/// Creates a listening socket with `SO_REUSEADDR` and a backlog of
/// [`LISTEN_BACKLOG`], logging every step. Nothing is retried.
pub fn listen_on(addr: SocketAddr) -> Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))
        .map_err(BenchError::Socket)?;
    info!("create socket success");

    socket
        .set_reuse_address(true)
        .map_err(BenchError::ReuseAddr)?;
    info!("setsockopt reuse-addr success");

    socket
        .bind(&addr.into())
        .map_err(|source| BenchError::Bind { addr, source })?;
    info!(%addr, "bind socket success");

    socket.listen(LISTEN_BACKLOG).map_err(BenchError::Listen)?;
    info!(backlog = LISTEN_BACKLOG, "listen socket success");

    let send_buffer = socket
        .send_buffer_size()
        .map_err(|source| BenchError::BufferSize {
            option: "SO_SNDBUF",
            source,
        })?;
    info!("SO_SNDBUF={}", send_buffer);

    Ok(socket.into())
}

pub fn connect(addr: SocketAddr) -> Result<TcpStream> {
    let stream = TcpStream::connect(addr).map_err(|source| BenchError::Connect { addr, source })?;
    info!(%addr, "connect server success");

    let recv_buffer = SockRef::from(&stream)
        .recv_buffer_size()
        .map_err(|source| BenchError::BufferSize {
            option: "SO_RCVBUF",
            source,
        })?;
    info!("SO_RCVBUF={}", recv_buffer);

    Ok(stream)
}
