// read and discard everything the server on 127.0.0.1 sends, one recv() per call.

use anyhow::{Context, Result};
use tcpbench::config::{ReceiveArgs, Validate};
use tcpbench::net::Receiver;
use tracing::{error, info};

fn main() -> Result<()> {
    let args = ReceiveArgs::parse_validated();
    tcpbench::trace::init();
    run(args).inspect_err(|e| error!("{:#}", e))
}

fn run(args: ReceiveArgs) -> Result<()> {
    info!("tcp client to recv bytes from server");
    info!("server_port is {}", args.port);
    info!("packet_bytes is {}", args.packet_bytes);

    let receiver = Receiver::connect(args.server_addr(), args.strategy())
        .context("tcp client setup failed")?;
    receiver.run();

    info!("completed");
    Ok(())
}
