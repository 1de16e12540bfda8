//! Command line arguments for the benchmark binaries. All arguments are
//! positional; clap prints the usage and exits non-zero when one is missing
//! or invalid, before any socket is created.

use crate::net::{MAX_IOVECS, Strategy};
use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use std::ffi::OsString;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroUsize;

/// Checks that span several arguments, e.g. `nb_writev * packet_bytes`,
/// reported the same way clap reports a bad single value.
pub trait Validate: Parser {
    fn strategy(&self) -> Strategy;

    fn parse_validated() -> Self {
        let args = Self::parse();
        if let Err(msg) = args.strategy().validate() {
            Self::command().error(ErrorKind::ValueValidation, msg).exit();
        }
        args
    }

    fn try_parse_validated_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = Self::try_parse_from(itr)?;
        args.strategy()
            .validate()
            .map_err(|msg| Self::command().error(ErrorKind::ValueValidation, msg))?;
        Ok(args)
    }
}

fn parse_iov_count(s: &str) -> Result<usize, String> {
    let count: usize = s.parse().map_err(|e| format!("{}", e))?;
    if count == 0 || count > MAX_IOVECS {
        return Err(format!("must be between 1 and {}", MAX_IOVECS));
    }
    Ok(count)
}

fn parse_no_delay(s: &str) -> Result<bool, String> {
    match s {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err("expected 0 or 1".to_string()),
    }
}

/// tcp server to send random data to clients.
#[derive(Debug, Parser)]
#[command(after_help = "For example:\n   tcp_server 1990 4096")]
pub struct SendArgs {
    /// the listen port.
    pub port: u16,
    /// the bytes for packet to send.
    pub packet_bytes: NonZeroUsize,
}

impl Validate for SendArgs {
    fn strategy(&self) -> Strategy {
        Strategy::Contiguous {
            packet_bytes: self.packet_bytes.get(),
        }
    }
}

/// tcp server to send random data to clients, using writev.
#[derive(Debug, Parser)]
#[command(after_help = "For example:\n   tcp_server_writev 64 1990 4096")]
pub struct WritevSendArgs {
    /// the number of iovec for writev.
    #[arg(value_parser = parse_iov_count)]
    pub nb_writev: usize,
    /// the listen port.
    pub port: u16,
    /// the bytes for packet to send.
    pub packet_bytes: NonZeroUsize,
}

impl Validate for WritevSendArgs {
    fn strategy(&self) -> Strategy {
        Strategy::Vectored {
            count: self.nb_writev,
            packet_bytes: self.packet_bytes.get(),
        }
    }
}

/// tcp client to recv bytes from server on 127.0.0.1.
#[derive(Debug, Parser)]
#[command(after_help = "For example:\n   tcp_client 1990 4096")]
pub struct ReceiveArgs {
    /// the port to connect to.
    pub port: u16,
    /// the bytes for packet to recv.
    pub packet_bytes: NonZeroUsize,
}

impl ReceiveArgs {
    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.port))
    }
}

impl Validate for ReceiveArgs {
    fn strategy(&self) -> Strategy {
        Strategy::Contiguous {
            packet_bytes: self.packet_bytes.get(),
        }
    }
}

/// tcp client to recv bytes from server, using readv.
#[derive(Debug, Parser)]
#[command(after_help = "For example:\n   tcp_client_readv 127.0.0.1 1990 64 4096")]
pub struct ReadvReceiveArgs {
    /// the ip to connect to.
    pub ip: IpAddr,
    /// the port to connect to.
    pub port: u16,
    /// the number of iovec to readv.
    #[arg(value_parser = parse_iov_count)]
    pub nb_readv: usize,
    /// the bytes for packet to recv.
    pub packet_bytes: NonZeroUsize,
}

impl ReadvReceiveArgs {
    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }
}

impl Validate for ReadvReceiveArgs {
    fn strategy(&self) -> Strategy {
        Strategy::Vectored {
            count: self.nb_readv,
            packet_bytes: self.packet_bytes.get(),
        }
    }
}

/// tcp server to send random data to clients, one tokio task per client.
#[derive(Debug, Parser)]
#[command(after_help = "For example:\n   tokio_server 1 0 1990 4096")]
pub struct TokioSendArgs {
    /// how many runtime worker threads to use.
    pub cpus: NonZeroUsize,
    /// whether to set TCP_NODELAY (0 or 1).
    #[arg(value_parser = parse_no_delay, action = ArgAction::Set)]
    pub no_delay: bool,
    /// the listen port.
    pub port: u16,
    /// the bytes for packet to send.
    pub packet_bytes: NonZeroUsize,
}

impl Validate for TokioSendArgs {
    fn strategy(&self) -> Strategy {
        Strategy::Contiguous {
            packet_bytes: self.packet_bytes.get(),
        }
    }
}

/// tcp client to recv bytes from server on 127.0.0.1, on a tokio runtime.
#[derive(Debug, Parser)]
#[command(after_help = "For example:\n   tokio_client 1 0 1990 4096")]
pub struct TokioReceiveArgs {
    /// how many runtime worker threads to use.
    pub cpus: NonZeroUsize,
    /// whether to set TCP_NODELAY (0 or 1).
    #[arg(value_parser = parse_no_delay, action = ArgAction::Set)]
    pub no_delay: bool,
    /// the port to connect to.
    pub port: u16,
    /// the bytes for packet to recv.
    pub packet_bytes: NonZeroUsize,
}

impl TokioReceiveArgs {
    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.port))
    }
}

impl Validate for TokioReceiveArgs {
    fn strategy(&self) -> Strategy {
        Strategy::Contiguous {
            packet_bytes: self.packet_bytes.get(),
        }
    }
}
