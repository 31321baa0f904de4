use clap::Parser;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;
use youtube_fetcher::cli::{self, Args};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(cli::log_filter(args.verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    cli::run(args, &mut std::io::stdout()).await
}
