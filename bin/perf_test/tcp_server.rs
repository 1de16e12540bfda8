// push fixed-size buffers to one client at a time with send(), until killed.
// throughput is observed externally, e.g. `dstat -n` on the loopback device.

use anyhow::{Context, Result};
use tcpbench::config::{SendArgs, Validate};
use tcpbench::net::Sender;
use tracing::{error, info};

fn main() -> Result<()> {
    let args = SendArgs::parse_validated();
    tcpbench::trace::init();
    run(args).inspect_err(|e| error!("{:#}", e))
}

fn run(args: SendArgs) -> Result<()> {
    info!("tcp server to send random data to clients.");
    info!("listen_port is {}", args.port);
    info!("packet_bytes is {}", args.packet_bytes);

    let mut sender = Sender::bind(args.port, args.strategy()).context("tcp server setup failed")?;
    sender.serve().context("tcp server stopped")
}
