// push nb_writev buffers per writev() call to one client at a time, until killed.

use anyhow::{Context, Result};
use tcpbench::config::{Validate, WritevSendArgs};
use tcpbench::net::Sender;
use tracing::{error, info};

fn main() -> Result<()> {
    let args = WritevSendArgs::parse_validated();
    tcpbench::trace::init();
    run(args).inspect_err(|e| error!("{:#}", e))
}

fn run(args: WritevSendArgs) -> Result<()> {
    info!("tcp server to send random data to clients.");
    info!("nb_writev is {}", args.nb_writev);
    info!("listen_port is {}", args.port);
    info!("packet_bytes is {}", args.packet_bytes);

    let mut sender =
        Sender::bind(args.port, args.strategy()).context("tcp writev server setup failed")?;
    sender.serve().context("tcp writev server stopped")
}
