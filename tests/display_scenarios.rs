use std::sync::Arc;
use std::time::Duration;

use now_showing_lib::catalog::{
    CatalogQuery, CatalogSnapshot, CatalogSource, CreditsDocument, DetailDocument, FetchRequest,
    FetchResult, ItemDetail, ItemQuery, MovieId, MovieSummary,
};
use now_showing_lib::display::{DisplayController, DisplayEvent, Frame};
use now_showing_lib::error::{DisplayError, Result};
use now_showing_lib::runtime::DisplayRuntime;
use now_showing_lib::settings::{DisplayConfig, PresentationMode};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

const ROTATION: Duration = Duration::from_millis(30_000);

fn scenario_config(mode: PresentationMode, page_size: usize) -> DisplayConfig {
    DisplayConfig {
        api_key: "test-key".into(),
        language: "en-US".into(),
        presentation_mode: mode,
        page_size,
        refresh_interval_ms: 86_400_000,
        rotation_interval_ms: 30_000,
        ..DisplayConfig::default()
    }
}

fn abc() -> CatalogSnapshot {
    CatalogSnapshot::new(vec![
        MovieSummary::new(1, "A"),
        MovieSummary::new(2, "B"),
        MovieSummary::new(3, "C"),
    ])
}

fn body(frame: &Frame) -> Vec<String> {
    frame.view.children()[1]
        .texts()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn detail_for(id: MovieId, title: &str) -> ItemDetail {
    ItemDetail {
        detail: DetailDocument {
            id,
            title: Some(title.into()),
            ..DetailDocument::default()
        },
        credits: CreditsDocument {
            id,
            ..CreditsDocument::default()
        },
    }
}

fn requested_item(requests: &mut mpsc::UnboundedReceiver<FetchRequest>) -> MovieId {
    match requests.try_recv() {
        Ok(FetchRequest::ItemDetail(query)) => query.item_id,
        other => panic!("expected a detail request, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn list_mode_pages_and_wraps() {
    let (events_tx, mut events) = mpsc::unbounded_channel();
    let (requests_tx, mut requests) = mpsc::unbounded_channel();
    let mut controller = DisplayController::new(
        scenario_config(PresentationMode::List, 2),
        events_tx,
        requests_tx,
    );
    let frames = controller.subscribe();

    controller.start();
    let refresh = events.recv().await.unwrap();
    controller.handle(refresh);
    assert!(matches!(requests.try_recv(), Ok(FetchRequest::Catalog(_))));

    controller.handle(DisplayEvent::Fetch(FetchResult::CatalogReady(abc())));
    assert_eq!(body(&frames.borrow()), vec!["A", "B"]);

    let started = Instant::now();
    let tick = events.recv().await.unwrap();
    assert!(started.elapsed() >= ROTATION);
    controller.handle(tick);
    assert_eq!(body(&frames.borrow()), vec!["C"]);

    let tick = events.recv().await.unwrap();
    controller.handle(tick);
    assert_eq!(body(&frames.borrow()), vec!["A", "B"]);
}

struct PosterBoard {
    controller: DisplayController,
    events: mpsc::UnboundedReceiver<DisplayEvent>,
    requests: mpsc::UnboundedReceiver<FetchRequest>,
    frames: watch::Receiver<Frame>,
}

/// Poster board over ids 10 and 20 that has already asked for both details:
/// 10 immediately, 20 after one rotation interval.
async fn poster_board_with_two_pending(discard_stale_details: bool) -> PosterBoard {
    let (events_tx, mut events) = mpsc::unbounded_channel();
    let (requests_tx, mut requests) = mpsc::unbounded_channel();
    let mut controller = DisplayController::new(
        DisplayConfig {
            discard_stale_details,
            ..scenario_config(PresentationMode::Poster, 0)
        },
        events_tx,
        requests_tx,
    );
    let frames = controller.subscribe();

    controller.handle(DisplayEvent::Fetch(FetchResult::CatalogReady(
        CatalogSnapshot::new(vec![MovieSummary::new(10, "Ten"), MovieSummary::new(20, "Twenty")]),
    )));
    assert_eq!(requested_item(&mut requests), 10);

    let tick = events.recv().await.unwrap();
    controller.handle(tick);
    assert_eq!(requested_item(&mut requests), 20);

    PosterBoard {
        controller,
        events,
        requests,
        frames,
    }
}

#[tokio::test(start_paused = true)]
async fn poster_mode_drops_late_detail_for_superseded_request() {
    let mut board = poster_board_with_two_pending(true).await;

    board
        .controller
        .handle(FetchResult::ItemDetailReady(detail_for(20, "Twenty")).into());
    board
        .controller
        .handle(FetchResult::ItemDetailReady(detail_for(10, "Ten")).into());

    assert_eq!(body(&board.frames.borrow())[0], "Twenty");
}

#[tokio::test(start_paused = true)]
async fn poster_mode_last_resolved_wins_without_discarding() {
    let mut board = poster_board_with_two_pending(false).await;

    board
        .controller
        .handle(FetchResult::ItemDetailReady(detail_for(20, "Twenty")).into());
    board
        .controller
        .handle(FetchResult::ItemDetailReady(detail_for(10, "Ten")).into());

    assert_eq!(body(&board.frames.borrow())[0], "Ten");
}

#[tokio::test(start_paused = true)]
async fn poster_mode_wraps_back_to_first_item() {
    let mut board = poster_board_with_two_pending(true).await;

    let tick = board.events.recv().await.unwrap();
    board.controller.handle(tick);
    assert_eq!(requested_item(&mut board.requests), 10);
}

/// Serves a fixed catalog; detail lookups are not expected.
struct FixedCatalog {
    snapshot: CatalogSnapshot,
}

impl CatalogSource for FixedCatalog {
    async fn now_playing(&self, _query: &CatalogQuery) -> Result<CatalogSnapshot> {
        Ok(self.snapshot.clone())
    }

    async fn item_detail(&self, query: &ItemQuery) -> Result<ItemDetail> {
        Err(DisplayError::fetch(format!("no detail for {}", query.item_id)))
    }
}

async fn next_body(frames: &mut watch::Receiver<Frame>) -> Vec<String> {
    frames.changed().await.expect("board still running");
    let frame = frames.borrow_and_update();
    body(&frame)
}

#[tokio::test(start_paused = true)]
async fn runtime_fetches_and_rotates_until_shutdown() {
    let board = DisplayRuntime::spawn(
        scenario_config(PresentationMode::List, 2),
        Arc::new(FixedCatalog { snapshot: abc() }),
    );
    let mut frames = board.frames();
    assert_eq!(body(&board.current_frame()), vec!["Loading …"]);

    assert_eq!(next_body(&mut frames).await, vec!["A", "B"]);
    assert_eq!(next_body(&mut frames).await, vec!["C"]);
    assert_eq!(next_body(&mut frames).await, vec!["A", "B"]);

    board.refresh_now().unwrap();
    assert_eq!(next_body(&mut frames).await, vec!["A", "B"]);

    board.shutdown().await.unwrap();
}
