use super::payload::{Payload, Strategy};
use super::socket;
use super::transfer::{ConnectionEnd, TransferSummary};
use crate::error::{BenchError, Result};
use std::io::{IoSlice, Write};
use std::net::{SocketAddr, TcpListener};
use tracing::{error, info, trace};

/// Blocking server that pushes the payload to one client at a time.
pub struct Sender {
    listener: TcpListener,
    payload: Payload,
}

impl Sender {
    pub fn bind(port: u16, strategy: Strategy) -> Result<Self> {
        let listener = socket::listen(port)?;
        Ok(Self::from_listener(listener, strategy))
    }

    pub fn from_listener(listener: TcpListener, strategy: Strategy) -> Self {
        let payload = Payload::new(strategy);
        info!(vectored = strategy.is_vectored(), "allocated payload, {}", strategy);
        Sender { listener, payload }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves clients one after another. Only returns on an accept failure.
    pub fn serve(&mut self) -> Result<()> {
        loop {
            self.serve_one()?;
        }
    }

    /// Accepts a single client and sends to it until the first short write.
    /// The connection is closed before returning.
    pub fn serve_one(&mut self) -> Result<TransferSummary> {
        let (mut conn, peer) = self.listener.accept().map_err(|e| {
            error!("accept socket error: {}", e);
            BenchError::Accept(e)
        })?;
        info!(%peer, "accept socket ok");

        let summary = send_loop(&mut conn, &self.payload);
        summary.log("send", peer);
        Ok(summary)
    }
}

/// Writes the whole payload per call until a call moves anything other than
/// exactly `payload.bytes_per_call()` bytes.
pub fn send_loop<W: Write>(stream: &mut W, payload: &Payload) -> TransferSummary {
    let strategy = payload.strategy();
    let expected = payload.bytes_per_call();
    let slices = payload.io_slices();
    let mut calls = 0;
    let mut bytes = 0;

    let end = loop {
        match write_call(stream, strategy, &slices) {
            Ok(n) if n == expected => {
                calls += 1;
                bytes += n as u64;
                trace!(n, "send bytes ok");
            }
            Ok(written) => break ConnectionEnd::ShortWrite { written, expected },
            Err(e) => break ConnectionEnd::Io(e),
        }
    };

    TransferSummary { calls, bytes, end }
}

fn write_call<W: Write>(
    stream: &mut W,
    strategy: Strategy,
    slices: &[IoSlice<'_>],
) -> std::io::Result<usize> {
    match strategy {
        Strategy::Contiguous { .. } => stream.write(&slices[0]),
        Strategy::Vectored { .. } => stream.write_vectored(slices),
    }
}
