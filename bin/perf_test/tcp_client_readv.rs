// read and discard everything the server sends, nb_readv buffers per readv() call.

use anyhow::{Context, Result};
use tcpbench::config::{ReadvReceiveArgs, Validate};
use tcpbench::net::Receiver;
use tracing::{error, info};

fn main() -> Result<()> {
    let args = ReadvReceiveArgs::parse_validated();
    tcpbench::trace::init();
    run(args).inspect_err(|e| error!("{:#}", e))
}

fn run(args: ReadvReceiveArgs) -> Result<()> {
    info!("tcp client to recv bytes from server");
    info!("server_ip is {}", args.ip);
    info!("server_port is {}", args.port);
    info!("nb_readv is {}", args.nb_readv);
    info!("packet_bytes is {}", args.packet_bytes);

    let receiver = Receiver::connect(args.server_addr(), args.strategy())
        .context("tcp readv client setup failed")?;
    receiver.run();

    info!("completed");
    Ok(())
}
