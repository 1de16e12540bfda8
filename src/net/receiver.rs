use super::payload::{Payload, Strategy};
use super::socket;
use super::transfer::{ConnectionEnd, TransferSummary};
use crate::error::Result;
use std::io::{IoSliceMut, Read};
use std::net::{SocketAddr, TcpStream};
use tracing::{info, trace};

/// Blocking client that reads and discards everything the server sends.
pub struct Receiver {
    stream: TcpStream,
    peer: SocketAddr,
    payload: Payload,
}

impl Receiver {
    pub fn connect(addr: SocketAddr, strategy: Strategy) -> Result<Self> {
        let stream = socket::connect(addr)?;
        let payload = Payload::new(strategy);
        info!(vectored = strategy.is_vectored(), "allocated payload, {}", strategy);
        Ok(Receiver {
            stream,
            peer: addr,
            payload,
        })
    }

    /// Reads until the server closes or an error occurs, then closes the socket.
    pub fn run(mut self) -> TransferSummary {
        let summary = recv_loop(&mut self.stream, &mut self.payload);
        summary.log("recv", self.peer);
        summary
    }
}

/// Issues one read per iteration into the payload buffers. Stops on the first
/// read that returns zero or fails; any positive count keeps the loop going.
pub fn recv_loop<R: Read>(stream: &mut R, payload: &mut Payload) -> TransferSummary {
    let strategy = payload.strategy();
    let mut slices = payload.io_slices_mut();
    let mut calls = 0;
    let mut bytes = 0;

    let end = loop {
        match read_call(stream, strategy, &mut slices) {
            Ok(0) => break ConnectionEnd::PeerClosed,
            Ok(n) => {
                calls += 1;
                bytes += n as u64;
                trace!(n, "recv bytes ok");
            }
            Err(e) => break ConnectionEnd::Io(e),
        }
    };

    TransferSummary { calls, bytes, end }
}

fn read_call<R: Read>(
    stream: &mut R,
    strategy: Strategy,
    slices: &mut [IoSliceMut<'_>],
) -> std::io::Result<usize> {
    match strategy {
        Strategy::Contiguous { .. } => stream.read(&mut slices[0]),
        Strategy::Vectored { .. } => stream.read_vectored(slices),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    /// Yields `chunks` reads of one byte each, then end of stream.
    struct Trickle {
        chunks: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.chunks == 0 || buf.is_empty() {
                return Ok(0);
            }
            self.chunks -= 1;
            buf[0] = 1;
            Ok(1)
        }
    }

    struct Reset;

    impl Read for Reset {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::ConnectionReset))
        }
    }

    #[test]
    fn test_small_reads_do_not_terminate() {
        let mut payload = Payload::new(Strategy::Contiguous { packet_bytes: 4096 });
        let summary = recv_loop(&mut Trickle { chunks: 7 }, &mut payload);
        assert_eq!(summary.calls, 7);
        assert_eq!(summary.bytes, 7);
        assert!(matches!(summary.end, ConnectionEnd::PeerClosed));
    }

    #[test]
    fn test_contiguous_reads_at_most_packet_bytes() {
        let data = vec![7u8; 10_000];
        let mut payload = Payload::new(Strategy::Contiguous { packet_bytes: 4096 });
        let summary = recv_loop(&mut Cursor::new(data), &mut payload);
        // 4096 + 4096 + 1808
        assert_eq!(summary.calls, 3);
        assert_eq!(summary.bytes, 10_000);
        assert!(matches!(summary.end, ConnectionEnd::PeerClosed));
    }

    #[test]
    fn test_vectored_fills_all_buffers_per_call() {
        let data = vec![7u8; 3 * 64 * 16];
        let mut payload = Payload::new(Strategy::Vectored {
            count: 64,
            packet_bytes: 16,
        });
        let summary = recv_loop(&mut Cursor::new(data), &mut payload);
        assert_eq!(summary.calls, 3);
        assert_eq!(summary.bytes, 3 * 1024);
    }

    #[test]
    fn test_read_error_ends_connection() {
        let mut payload = Payload::new(Strategy::Contiguous { packet_bytes: 16 });
        let summary = recv_loop(&mut Reset, &mut payload);
        assert_eq!(summary.calls, 0);
        match summary.end {
            ConnectionEnd::Io(e) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
            other => panic!("unexpected end {:?}", other),
        }
    }
}
