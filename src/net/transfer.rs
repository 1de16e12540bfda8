use std::fmt;
use std::io;
use std::net::SocketAddr;
use tracing::{info, warn};

/// Why a send or receive loop stopped. Every variant closes the connection;
/// a graceful close and an I/O error are handled the same way.
#[derive(Debug)]
pub enum ConnectionEnd {
    ShortWrite { written: usize, expected: usize },
    PeerClosed,
    Io(io::Error),
}

impl fmt::Display for ConnectionEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionEnd::ShortWrite { written, expected } => {
                write!(f, "short write, {} of {} bytes", written, expected)
            }
            ConnectionEnd::PeerClosed => write!(f, "peer closed"),
            ConnectionEnd::Io(e) => write!(f, "{}", e),
        }
    }
}

/// What one connection moved before it ended.
#[derive(Debug)]
pub struct TransferSummary {
    /// Successful calls only; the terminating call is not counted.
    pub calls: u64,
    pub bytes: u64,
    pub end: ConnectionEnd,
}

impl TransferSummary {
    pub fn log(&self, role: &str, peer: SocketAddr) {
        match &self.end {
            ConnectionEnd::PeerClosed => info!(
                %peer,
                calls = self.calls,
                bytes = self.bytes,
                "{} ended: {}",
                role,
                self.end
            ),
            _ => warn!(
                %peer,
                calls = self.calls,
                bytes = self.bytes,
                "{} bytes to socket error: {}",
                role,
                self.end
            ),
        }
    }
}
