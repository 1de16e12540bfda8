use std::fmt;
use std::io::{IoSlice, IoSliceMut};

/// Upper bound on the number of buffers handed to one `writev`/`readv`.
/// Linux rejects anything above `IOV_MAX` with `EINVAL`.
pub const MAX_IOVECS: usize = 1024;

/// Largest payload a single call may carry, counting every iovec.
pub const MAX_BYTES_PER_CALL: usize = 1 << 30;

/// How bytes are moved per system call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// One flat buffer per `send`/`recv`.
    Contiguous { packet_bytes: usize },
    /// `count` buffers per `writev`/`readv`.
    Vectored { count: usize, packet_bytes: usize },
}

impl Strategy {
    pub fn packet_bytes(&self) -> usize {
        match *self {
            Strategy::Contiguous { packet_bytes } => packet_bytes,
            Strategy::Vectored { packet_bytes, .. } => packet_bytes,
        }
    }

    pub fn buffer_count(&self) -> usize {
        match *self {
            Strategy::Contiguous { .. } => 1,
            Strategy::Vectored { count, .. } => count,
        }
    }

    /// Bytes a single successful call is expected to move, or `None` when
    /// `count * packet_bytes` overflows.
    pub fn bytes_per_call(&self) -> Option<usize> {
        self.buffer_count().checked_mul(self.packet_bytes())
    }

    /// Checks the per-call size is non-zero and at most [`MAX_BYTES_PER_CALL`].
    pub fn validate(&self) -> Result<usize, String> {
        match self.bytes_per_call() {
            Some(0) => Err("payload must move at least one byte per call".to_string()),
            Some(n) if n <= MAX_BYTES_PER_CALL => Ok(n),
            _ => Err(format!(
                "{} x {} bytes per call exceeds the limit of {} bytes",
                self.buffer_count(),
                self.packet_bytes(),
                MAX_BYTES_PER_CALL
            )),
        }
    }

    pub fn is_vectored(&self) -> bool {
        matches!(self, Strategy::Vectored { .. })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Strategy::Contiguous { packet_bytes } => {
                write!(f, "contiguous {}B/call", packet_bytes)
            }
            Strategy::Vectored {
                count,
                packet_bytes,
            } => match self.bytes_per_call() {
                Some(total) => write!(
                    f,
                    "vectored {}x{}B = {}B/call",
                    count, packet_bytes, total
                ),
                None => write!(f, "vectored {}x{}B (overflows)", count, packet_bytes),
            },
        }
    }
}

/// Buffers allocated once per process (or per task) and reused for every call.
pub struct Payload {
    strategy: Strategy,
    len: usize,
    buffers: Vec<Vec<u8>>,
}

impl Payload {
    /// Panics if `strategy` does not pass [`Strategy::validate`]; arguments
    /// are validated before any socket is created.
    pub fn new(strategy: Strategy) -> Self {
        let len = match strategy.validate() {
            Ok(len) => len,
            Err(msg) => panic!("invalid payload {:?}: {}", strategy, msg),
        };
        let buffers = (0..strategy.buffer_count())
            .map(|_| vec![0u8; strategy.packet_bytes()])
            .collect();
        Payload {
            strategy,
            len,
            buffers,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Bytes one full call moves.
    pub fn bytes_per_call(&self) -> usize {
        self.len
    }

    pub fn io_slices(&self) -> Vec<IoSlice<'_>> {
        self.buffers.iter().map(|b| IoSlice::new(b)).collect()
    }

    pub fn io_slices_mut(&mut self) -> Vec<IoSliceMut<'_>> {
        self.buffers.iter_mut().map(|b| IoSliceMut::new(b)).collect()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}
