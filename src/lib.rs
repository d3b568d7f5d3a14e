pub mod catalog;
pub mod display;
pub mod error;
pub mod i18n;
pub mod runtime;
pub mod scheduler;
pub mod settings;
pub mod utils;

#[cfg(feature = "desktop")]
mod desktop;

#[cfg(feature = "desktop")]
pub use desktop::run;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use catalog::TmdbClient;
use display::Frame;
use runtime::DisplayRuntime;
use settings::ConfigStore;

/// Terminal host: print every new frame until Ctrl-C.
pub async fn run_headless(config_path: PathBuf, json: bool) -> Result<()> {
    utils::logging::init();

    let store = ConfigStore::new(config_path)?;
    log::info!("Now Showing starting up with {}", store.path().display());

    let config = store.config();
    let client = TmdbClient::new(&config)?;
    let board = DisplayRuntime::spawn(config, Arc::new(client));

    let mut frames = board.frames();
    print_frame(&frames.borrow_and_update(), json)?;

    loop {
        tokio::select! {
            changed = frames.changed() => {
                if changed.is_err() {
                    break;
                }
                let frame = frames.borrow_and_update().clone();
                print_frame(&frame, json)?;
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                break;
            }
        }
    }

    board.shutdown().await
}

fn print_frame(frame: &Frame, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(frame)?);
    } else {
        print!("{}", frame.view.to_plain_text());
        if let Some(fetched_at) = frame.fetched_at {
            println!("  (catalog fetched {})", fetched_at.format("%Y-%m-%d %H:%M UTC"));
        }
        println!();
    }
    Ok(())
}
