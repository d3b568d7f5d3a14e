use std::sync::Arc;

use tokio::{
    sync::mpsc::{UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use super::{CatalogQuery, CatalogSnapshot, CatalogSource, ItemDetail, ItemQuery, MovieId};
use crate::error::DisplayError;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// `FETCH_CATALOG` / `FETCH_ITEM_DETAIL`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Catalog(CatalogQuery),
    ItemDetail(ItemQuery),
}

/// `CATALOG_READY` / `CATALOG_ERROR` / `ITEM_DETAIL_READY`, plus the failure
/// counterpart of the last one.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    CatalogReady(CatalogSnapshot),
    CatalogError(DisplayError),
    ItemDetailReady(ItemDetail),
    ItemDetailError { item_id: MovieId, error: DisplayError },
}

/// Serve fetch requests until cancelled or until every request sender is gone.
///
/// Each request runs on its own task, so a slow detail fetch never holds up
/// the next one; results are posted in completion order.
pub fn spawn_fetch_worker<S, E>(
    source: Arc<S>,
    mut requests: UnboundedReceiver<FetchRequest>,
    results: UnboundedSender<E>,
    cancel_token: CancellationToken,
) -> JoinHandle<()>
where
    S: CatalogSource,
    E: From<FetchResult> + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            tokio::select! {
                request = requests.recv() => {
                    let Some(request) = request else {
                        log_debug!("fetch request channel closed");
                        break;
                    };
                    let source = Arc::clone(&source);
                    let results = results.clone();
                    tokio::spawn(async move {
                        let result = perform_fetch(source.as_ref(), request).await;
                        if results.send(result.into()).is_err() {
                            log_debug!("fetch result dropped; display loop has stopped");
                        }
                    });
                }
                _ = cancel_token.cancelled() => {
                    log_info!("fetch worker shutting down");
                    break;
                }
            }
        }
    })
}

async fn perform_fetch<S: CatalogSource>(source: &S, request: FetchRequest) -> FetchResult {
    match request {
        FetchRequest::Catalog(query) => match source.now_playing(&query).await {
            Ok(snapshot) => {
                log_info!("fetched {} now-playing movies", snapshot.len());
                FetchResult::CatalogReady(snapshot)
            }
            Err(err) => {
                log_warn!("catalog fetch failed: {err}");
                FetchResult::CatalogError(err)
            }
        },
        FetchRequest::ItemDetail(query) => match source.item_detail(&query).await {
            Ok(detail) => FetchResult::ItemDetailReady(detail),
            Err(err) => {
                log_warn!("detail fetch for movie {} failed: {err}", query.item_id);
                FetchResult::ItemDetailError {
                    item_id: query.item_id,
                    error: err,
                }
            }
        },
    }
}
