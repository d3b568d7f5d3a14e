use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

/// Rotating now-playing movie board.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON config file; defaults apply when it does not exist.
    #[arg(long, env = "NOW_SHOWING_CONFIG", default_value = "config.json")]
    config: PathBuf,

    /// Print frames as JSON instead of plain text.
    #[arg(long)]
    json: bool,

    /// Stay in the terminal instead of opening the webview. Always the case
    /// when the webview host is not built in.
    #[arg(long)]
    headless: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.headless || !cfg!(feature = "desktop") {
        let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
        return runtime.block_on(now_showing_lib::run_headless(args.config, args.json));
    }

    #[cfg(feature = "desktop")]
    now_showing_lib::run();

    Ok(())
}
