use std::io::IsTerminal;
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

/// Installs the process-wide subscriber used by the benchmark binaries.
///
/// Verbosity defaults to `info` and can be changed through `RUST_LOG`, e.g.
/// `RUST_LOG=tcpbench=trace` to see every send/recv call. Calling this more
/// than once is harmless; only the first subscriber wins.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(std::io::stdout().is_terminal()),
        );

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        // Forward `log` records from dependencies into the same output.
        let _ = LogTracer::init();
    }
}
