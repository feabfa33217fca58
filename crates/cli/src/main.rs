//! onchange - run a command when files change

use anyhow::{Context, Result};
use cli_lib::args::Args;
use std::io::IsTerminal;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the command's output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let args = Args::parse_go_style(std::env::args_os());
    let config = args.into_config().context("Invalid arguments")?;

    let root = std::env::current_dir().context("Failed to get current directory")?;

    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C");
            token.cancel();
        }
    });

    watcher::watch(config, &root, cancel)
        .await
        .with_context(|| format!("Failed to watch {}", root.display()))
}
