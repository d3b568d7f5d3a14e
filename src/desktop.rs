//! Webview host: forwards frames to the window and exposes board commands.

use std::sync::Arc;

use anyhow::Context;
use log::{error, info};
use tauri::{AppHandle, Emitter, Manager, State};
use tokio::sync::Mutex;

use crate::catalog::TmdbClient;
use crate::display::Frame;
use crate::runtime::DisplayRuntime;
use crate::settings::{ConfigStore, DisplayConfig};

const FRAME_EVENT: &str = "display-frame";

pub(crate) struct AppState {
    config: ConfigStore,
    board: Mutex<Option<DisplayRuntime>>,
}

/// Start a board for `config` and forward each of its frames to the webview.
fn start_board(app_handle: &AppHandle, config: DisplayConfig) -> anyhow::Result<DisplayRuntime> {
    let client = TmdbClient::new(&config)?;
    let board = DisplayRuntime::spawn(config, Arc::new(client));

    let mut frames = board.frames();
    let app_handle = app_handle.clone();
    tokio::spawn(async move {
        // Ends when the board is shut down and its frame sender dropped.
        while frames.changed().await.is_ok() {
            let frame = frames.borrow_and_update().clone();
            if let Err(err) = app_handle.emit(FRAME_EVENT, &frame) {
                error!("Failed to emit {FRAME_EVENT}: {err}");
            }
        }
    });

    Ok(board)
}

#[tauri::command]
async fn get_display_frame(state: State<'_, AppState>) -> Result<Option<Frame>, String> {
    let board = state.board.lock().await;
    Ok(board.as_ref().map(DisplayRuntime::current_frame))
}

#[tauri::command]
async fn refresh_catalog(state: State<'_, AppState>) -> Result<(), String> {
    let board = state.board.lock().await;
    match board.as_ref() {
        Some(board) => board.refresh_now().map_err(|e| e.to_string()),
        None => Err("board is not running".into()),
    }
}

#[tauri::command]
fn get_display_config(state: State<'_, AppState>) -> Result<DisplayConfig, String> {
    Ok(state.config.config())
}

#[tauri::command]
async fn update_display_config(
    config: DisplayConfig,
    state: State<'_, AppState>,
    app_handle: AppHandle,
) -> Result<(), String> {
    state
        .config
        .update(config.clone())
        .map_err(|e| e.to_string())?;

    let mut board = state.board.lock().await;
    if let Some(previous) = board.take() {
        previous.shutdown().await.map_err(|e| e.to_string())?;
    }
    *board = Some(start_board(&app_handle, config).map_err(|e| e.to_string())?);

    info!("Board restarted with updated config");
    Ok(())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    crate::utils::logging::init();

    log::info!("Now Showing starting up...");

    tauri::Builder::default()
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let config_dir = app
                    .path()
                    .app_config_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&config_dir).with_context(|| {
                    format!("failed to create config directory {}", config_dir.display())
                })?;

                let store = ConfigStore::new(config_dir.join("config.json"))?;
                let handle = app.handle().clone();
                let config = store.config();

                // Board tasks live on tauri's tokio runtime.
                let board = tauri::async_runtime::block_on(async move {
                    start_board(&handle, config)
                })?;

                app.manage(AppState {
                    config: store,
                    board: Mutex::new(Some(board)),
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            get_display_frame,
            refresh_catalog,
            get_display_config,
            update_display_config,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
