use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use tokio::sync::{
    mpsc::{UnboundedReceiver, UnboundedSender},
    watch,
};
use tokio_util::sync::CancellationToken;

use crate::catalog::{CatalogSnapshot, FetchRequest, FetchResult, ItemDetail};
use crate::i18n::Translator;
use crate::scheduler::{RefreshScheduler, RotationScheduler, TimerSignal};
use crate::settings::{DisplayConfig, RotationKind};

use super::assemble::assemble;
use super::state::{DisplayState, RotationSource, Visible};
use super::view::{render, UiNode, ViewOptions};

/// Everything the controller reacts to, serialized through one channel.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayEvent {
    Timer(TimerSignal),
    Fetch(FetchResult),
    /// Fetch the catalog now, outside the refresh cadence.
    RefreshNow,
}

impl From<TimerSignal> for DisplayEvent {
    fn from(signal: TimerSignal) -> Self {
        DisplayEvent::Timer(signal)
    }
}

impl From<FetchResult> for DisplayEvent {
    fn from(result: FetchResult) -> Self {
        DisplayEvent::Fetch(result)
    }
}

/// One rendered state of the board, as handed to hosts.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub view: UiNode,
    pub transition_ms: u64,
    /// When the catalog behind this frame was fetched; `None` before the first.
    pub fetched_at: Option<DateTime<Utc>>,
}

pub struct DisplayController {
    config: DisplayConfig,
    options: ViewOptions,
    translator: Translator,
    state: DisplayState,
    rotation: RotationScheduler<DisplayEvent>,
    refresh: RefreshScheduler<DisplayEvent>,
    requests: UnboundedSender<FetchRequest>,
    frames: watch::Sender<Frame>,
}

impl DisplayController {
    /// `events` must feed the receiver later passed to [`run`](Self::run) (or
    /// drained by hand into [`handle`](Self::handle)); both clocks post there.
    pub fn new(
        config: DisplayConfig,
        events: UnboundedSender<DisplayEvent>,
        requests: UnboundedSender<FetchRequest>,
    ) -> Self {
        let options = ViewOptions::from(&config);
        let translator = Translator::for_locale(&config.language);
        let state = DisplayState::default();
        let (frames, _) = watch::channel(Frame {
            view: render(&state, &options, &translator),
            transition_ms: 0,
            fetched_at: None,
        });

        Self {
            options,
            translator,
            state,
            rotation: RotationScheduler::new(events.clone()),
            refresh: RefreshScheduler::new(events),
            requests,
            frames,
            config,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Frame> {
        self.frames.subscribe()
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Report configuration problems and start the refresh clock.
    pub fn start(&mut self) {
        for problem in self.config.validate() {
            warn!("{problem}");
        }
        info!(
            "board starting in '{}' mode, page size {}, rotation every {}ms",
            self.config.presentation_mode.as_str(),
            self.config.page_size,
            self.config.rotation_interval_ms
        );
        self.refresh
            .start(self.config.catalog_query(), self.config.refresh_interval());
    }

    pub fn stop(&mut self) {
        self.refresh.stop();
        self.rotation.stop();
    }

    /// Drain `events` until cancelled.
    pub async fn run(
        mut self,
        mut events: UnboundedReceiver<DisplayEvent>,
        cancel_token: CancellationToken,
    ) {
        self.start();
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break,
                },
                _ = cancel_token.cancelled() => {
                    info!("board shutting down");
                    break;
                }
            }
        }
        self.stop();
    }

    pub fn handle(&mut self, event: DisplayEvent) {
        match event {
            DisplayEvent::Timer(TimerSignal::RefreshDue(query)) => {
                self.request(FetchRequest::Catalog(query));
            }
            DisplayEvent::RefreshNow => {
                self.request(FetchRequest::Catalog(self.config.catalog_query()));
            }
            DisplayEvent::Timer(TimerSignal::Rotate { generation }) => {
                let Some(position) = self.rotation.advance(generation) else {
                    return;
                };
                // A single page wraps onto itself.
                if self.state.visible == Visible::Page(position) {
                    debug!("page {position} already on screen");
                    return;
                }
                self.show(position);
            }
            DisplayEvent::Fetch(FetchResult::CatalogReady(snapshot)) => {
                self.install_catalog(snapshot);
            }
            DisplayEvent::Fetch(FetchResult::CatalogError(err)) => {
                warn!("keeping previous catalog: {err}");
            }
            DisplayEvent::Fetch(FetchResult::ItemDetailReady(detail)) => {
                self.install_detail(detail);
            }
            DisplayEvent::Fetch(FetchResult::ItemDetailError { item_id, error }) => {
                warn!("keeping current record; movie {item_id} unavailable: {error}");
            }
        }
    }

    fn install_catalog(&mut self, snapshot: CatalogSnapshot) {
        // Old ticker goes before the sequence it indexes into is replaced.
        self.rotation.stop();

        let snapshot = Arc::new(snapshot);
        let previous = std::mem::take(&mut self.state);

        let Some(kind) = self.config.presentation_mode.rotation_kind() else {
            warn!(
                "no rotation for presentation mode '{}'",
                self.config.presentation_mode.as_str()
            );
            self.state = previous.idle(snapshot);
            self.publish();
            return;
        };

        self.state = match kind {
            RotationKind::Pages => previous.with_pages(snapshot, self.config.page_size),
            RotationKind::Items => previous.with_items(snapshot),
        };
        info!(
            "catalog installed: {} rotation entries",
            self.state.source.len()
        );

        match self
            .rotation
            .replace(self.state.source.len(), self.config.rotation_interval())
        {
            Some(position) => self.show(position),
            None => self.publish(),
        }
    }

    fn show(&mut self, position: usize) {
        match &self.state.source {
            RotationSource::Pages(_) => {
                self.state.visible = Visible::Page(position);
                self.publish();
            }
            RotationSource::Items(_) => {
                let Some(item_id) = self.state.item_at(position) else {
                    return;
                };
                self.state.requested_item = Some(item_id);
                self.request(FetchRequest::ItemDetail(self.config.item_query(item_id)));
            }
            RotationSource::Idle => {}
        }
    }

    fn install_detail(&mut self, detail: ItemDetail) {
        let item_id = detail.detail.id;

        if self.config.discard_stale_details && self.state.requested_item != Some(item_id) {
            debug!(
                "dropping detail for movie {item_id}; latest request is {:?}",
                self.state.requested_item
            );
            return;
        }

        match assemble(&detail.detail, &detail.credits) {
            Ok(record) => {
                self.state.visible = Visible::Record(record);
                self.publish();
            }
            Err(err) => warn!("keeping current record: {err}"),
        }
    }

    fn request(&self, request: FetchRequest) {
        if self.requests.send(request).is_err() {
            warn!("fetch worker is gone; request dropped");
        }
    }

    fn publish(&self) {
        self.frames.send_replace(Frame {
            view: render(&self.state, &self.options, &self.translator),
            transition_ms: self.config.transition_duration_ms,
            fetched_at: self.state.snapshot.as_ref().map(|snapshot| snapshot.fetched_at),
        });
    }
}
