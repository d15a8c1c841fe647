use std::io;

use tracing_subscriber::EnvFilter;

mod command;
mod config;
mod util;

fn main() -> anyhow::Result<()> {
    // stdout is reserved for JSON output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    command::run()
}
