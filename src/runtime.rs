use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::info;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use crate::catalog::{spawn_fetch_worker, CatalogSource};
use crate::display::{DisplayController, DisplayEvent, Frame};
use crate::settings::DisplayConfig;

/// A running board: the controller loop plus the fetch worker serving it.
pub struct DisplayRuntime {
    events: mpsc::UnboundedSender<DisplayEvent>,
    frames: watch::Receiver<Frame>,
    cancel_token: CancellationToken,
    controller: JoinHandle<()>,
    worker: JoinHandle<()>,
}

impl DisplayRuntime {
    /// Wire a controller to `source` and start both clocks. Must be called
    /// from inside a tokio runtime.
    pub fn spawn<S: CatalogSource>(config: DisplayConfig, source: Arc<S>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (requests_tx, requests_rx) = mpsc::unbounded_channel();
        let cancel_token = CancellationToken::new();

        let worker = spawn_fetch_worker(
            source,
            requests_rx,
            events_tx.clone(),
            cancel_token.clone(),
        );

        let controller = DisplayController::new(config, events_tx.clone(), requests_tx);
        let frames = controller.subscribe();
        let controller = tokio::spawn(controller.run(events_rx, cancel_token.clone()));

        Self {
            events: events_tx,
            frames,
            cancel_token,
            controller,
            worker,
        }
    }

    pub fn frames(&self) -> watch::Receiver<Frame> {
        self.frames.clone()
    }

    pub fn current_frame(&self) -> Frame {
        self.frames.borrow().clone()
    }

    /// Fetch the catalog now without disturbing the refresh clock.
    pub fn refresh_now(&self) -> Result<()> {
        self.events
            .send(DisplayEvent::RefreshNow)
            .map_err(|_| anyhow!("display loop has stopped"))
    }

    /// Stop both clocks and wait for the controller and worker to exit.
    pub async fn shutdown(self) -> Result<()> {
        self.cancel_token.cancel();
        self.controller
            .await
            .context("display loop task failed to join")?;
        self.worker
            .await
            .context("fetch worker task failed to join")?;
        info!("board stopped");
        Ok(())
    }
}
