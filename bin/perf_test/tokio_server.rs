// serve any number of clients concurrently, one tokio task each.
// compare against tcp_server to see what the runtime costs per byte.

use anyhow::{Context, Result};
use tcpbench::config::{TokioSendArgs, Validate};
use tcpbench::net::concurrent;
use tokio::signal;
use tracing::{error, info};

fn main() -> Result<()> {
    let args = TokioSendArgs::parse_validated();
    tcpbench::trace::init();
    run(args).inspect_err(|e| error!("{:#}", e))
}

fn run(args: TokioSendArgs) -> Result<()> {
    info!("tcp server to send random data to clients.");
    info!("nb_cpus is {}", args.cpus);
    info!("no_delay is {}", args.no_delay);
    info!("listen_port is {}", args.port);
    info!("packet_bytes is {}", args.packet_bytes);

    let runtime = concurrent::runtime(args.cpus.get())?;
    let listener = concurrent::listen(args.port).context("tokio server setup failed")?;

    runtime.block_on(async {
        tokio::select! {
            result = concurrent::serve(listener, args.packet_bytes.get(), args.no_delay) => {
                result.context("tokio server stopped")
            }
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                Ok(())
            }
        }
    })
}
