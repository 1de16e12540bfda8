// read and discard everything the server on 127.0.0.1 sends, on a tokio runtime.

use anyhow::{Context, Result};
use tcpbench::config::{TokioReceiveArgs, Validate};
use tcpbench::net::concurrent;
use tracing::{error, info};

fn main() -> Result<()> {
    let args = TokioReceiveArgs::parse_validated();
    tcpbench::trace::init();
    run(args).inspect_err(|e| error!("{:#}", e))
}

fn run(args: TokioReceiveArgs) -> Result<()> {
    info!("tcp client to recv bytes from server");
    info!("nb_cpus is {}", args.cpus);
    info!("no_delay is {}", args.no_delay);
    info!("server_port is {}", args.port);
    info!("packet_bytes is {}", args.packet_bytes);

    let runtime = concurrent::runtime(args.cpus.get())?;
    let peer = args.server_addr();

    runtime.block_on(async {
        let mut stream = concurrent::connect(peer, args.no_delay)
            .await
            .context("tokio client setup failed")?;
        let summary = concurrent::recv_stream(&mut stream, args.packet_bytes.get()).await;
        summary.log("recv", peer);
        anyhow::Ok(())
    })?;

    info!("completed");
    Ok(())
}
