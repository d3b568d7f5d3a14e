use std::time::Duration;

use tokio::{
    sync::mpsc::UnboundedSender,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

use super::TimerSignal;
use crate::catalog::CatalogQuery;

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Long-period clock that signals when the catalog should be fetched again.
///
/// It never touches the network itself; the owner turns each
/// [`TimerSignal::RefreshDue`] into a fetch request.
pub struct RefreshScheduler<E> {
    ticker: Option<JoinHandle<()>>,
    events: UnboundedSender<E>,
}

impl<E> RefreshScheduler<E>
where
    E: From<TimerSignal> + Send + 'static,
{
    pub fn new(events: UnboundedSender<E>) -> Self {
        Self {
            ticker: None,
            events,
        }
    }

    /// Signal a fetch now, then every `interval` until stopped.
    ///
    /// `query` is cloned into every signal, so later config edits do not leak
    /// into an already running clock. A zero interval fetches once.
    pub fn start(&mut self, query: CatalogQuery, interval: Duration) {
        self.stop();

        if self
            .events
            .send(TimerSignal::RefreshDue(query.clone()).into())
            .is_err()
        {
            log_warn!("refresh owner is gone; not arming refresh clock");
            return;
        }

        if interval.is_zero() {
            log_warn!("refresh interval is zero; catalog will be fetched once");
            return;
        }

        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if events
                    .send(TimerSignal::RefreshDue(query.clone()).into())
                    .is_err()
                {
                    break;
                }
            }
        });

        self.ticker = Some(handle);
        log_info!("catalog refresh armed every {}ms", interval.as_millis());
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }
}

impl<E> Drop for RefreshScheduler<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}
