use std::time::Duration;

use tokio::{
    sync::mpsc::UnboundedSender,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

use super::TimerSignal;

// Per-tick traces are debug level; armed/stopped transitions are info.
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Rotation position over a sequence of `length` entries.
///
/// `position < length` always holds; a cursor over nothing does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub position: usize,
    pub length: usize,
}

impl Cursor {
    pub fn new(length: usize) -> Option<Self> {
        (length > 0).then_some(Self {
            position: 0,
            length,
        })
    }

    /// Step forward, wrapping to 0 after the last entry.
    pub fn advance(&mut self) -> usize {
        self.position = (self.position + 1) % self.length;
        self.position
    }
}

/// Fixed-interval cursor over the current display sequence.
///
/// `None` cursor is the Empty state; `Some` is Active. Every install or
/// teardown bumps `generation`, and the ticker task stamps each signal with
/// the generation it was armed under.
pub struct RotationScheduler<E> {
    cursor: Option<Cursor>,
    generation: u64,
    ticker: Option<JoinHandle<()>>,
    events: UnboundedSender<E>,
}

impl<E> RotationScheduler<E>
where
    E: From<TimerSignal> + Send + 'static,
{
    pub fn new(events: UnboundedSender<E>) -> Self {
        Self {
            cursor: None,
            generation: 0,
            ticker: None,
            events,
        }
    }

    /// Begin rotating over `length` entries and return the position to show
    /// right away (always 0), or `None` when there is nothing to rotate.
    ///
    /// Starting an already active scheduler replaces its sequence.
    pub fn start(&mut self, length: usize, interval: Duration) -> Option<usize> {
        if self.is_active() {
            log_debug!("rotation start on active scheduler; replacing");
        }
        self.replace(length, interval)
    }

    /// Swap in a new sequence. The old ticker is torn down before the new
    /// cursor and ticker are installed.
    pub fn replace(&mut self, length: usize, interval: Duration) -> Option<usize> {
        self.stop();

        let cursor = Cursor::new(length)?;
        self.cursor = Some(cursor);

        if interval.is_zero() {
            log_warn!(
                "rotation interval is zero; showing first of {length} entries without rotating"
            );
        } else {
            self.arm(interval);
            log_info!(
                "rotation armed over {length} entries every {}ms (generation {})",
                interval.as_millis(),
                self.generation
            );
        }

        Some(cursor.position)
    }

    /// Handle a [`TimerSignal::Rotate`]. Returns the new position, or `None`
    /// if the signal came from a ticker that has since been replaced.
    pub fn advance(&mut self, generation: u64) -> Option<usize> {
        if generation != self.generation {
            log_debug!(
                "dropping rotation tick from generation {generation} (current {})",
                self.generation
            );
            return None;
        }

        let position = self.cursor.as_mut()?.advance();
        log_debug!("rotation advanced to {position}");
        Some(position)
    }

    /// Cancel the ticker and go back to Empty. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
        self.cursor = None;
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    pub fn is_active(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn arm(&mut self, interval: Duration) {
        let generation = self.generation;
        let events = self.events.clone();

        let handle = tokio::spawn(async move {
            // First fire one full interval from now; position 0 was shown on start.
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if events.send(TimerSignal::Rotate { generation }.into()).is_err() {
                    break;
                }
            }
        });

        self.ticker = Some(handle);
    }
}

impl<E> Drop for RotationScheduler<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver};

    const INTERVAL: Duration = Duration::from_secs(30);

    async fn next_generation(rx: &mut UnboundedReceiver<TimerSignal>) -> u64 {
        match rx.recv().await {
            Some(TimerSignal::Rotate { generation }) => generation,
            other => panic!("expected rotate signal, got {other:?}"),
        }
    }

    #[test]
    fn cursor_wraps_at_end() {
        let mut cursor = Cursor::new(3).unwrap();
        assert_eq!(cursor.advance(), 1);
        assert_eq!(cursor.advance(), 2);
        assert_eq!(cursor.advance(), 0);
        assert_eq!(Cursor::new(0), None);
    }

    #[tokio::test(start_paused = true)]
    async fn wraps_after_length_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut rotation = RotationScheduler::new(tx);

        assert_eq!(rotation.start(5, INTERVAL), Some(0));

        let mut seen = Vec::new();
        for _ in 0..5 {
            let generation = next_generation(&mut rx).await;
            seen.push(rotation.advance(generation).unwrap());
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 0]);
        assert_eq!(
            rotation.cursor(),
            Some(Cursor {
                position: 0,
                length: 5
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_a_full_interval() {
        let (tx, mut rx) = mpsc::unbounded_channel::<TimerSignal>();
        let mut rotation = RotationScheduler::new(tx);
        rotation.start(2, INTERVAL);

        let early = time::timeout(INTERVAL - Duration::from_millis(1), rx.recv()).await;
        assert!(early.is_err());
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_sequence_never_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel::<TimerSignal>();
        let mut rotation = RotationScheduler::new(tx);

        assert_eq!(rotation.start(0, INTERVAL), None);
        assert!(!rotation.is_active());

        time::sleep(INTERVAL * 4).await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn replace_discards_ticks_from_old_length() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut rotation = RotationScheduler::new(tx.clone());

        rotation.start(5, INTERVAL);
        for _ in 0..4 {
            let generation = next_generation(&mut rx).await;
            rotation.advance(generation);
        }
        assert_eq!(rotation.cursor().unwrap().position, 4);
        let old_generation = rotation.generation();

        assert_eq!(rotation.replace(2, INTERVAL), Some(0));

        // A tick the old ticker queued just before teardown.
        tx.send(TimerSignal::Rotate { generation: old_generation }).unwrap();
        let stale = next_generation(&mut rx).await;
        assert_eq!(rotation.advance(stale), None);
        assert_eq!(
            rotation.cursor(),
            Some(Cursor {
                position: 0,
                length: 2
            })
        );

        let mut seen = Vec::new();
        for _ in 0..4 {
            let generation = next_generation(&mut rx).await;
            seen.push(rotation.advance(generation).unwrap());
        }
        assert_eq!(seen, vec![1, 0, 1, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent_and_silences_ticker() {
        let (tx, mut rx) = mpsc::unbounded_channel::<TimerSignal>();
        let mut rotation = RotationScheduler::new(tx);

        rotation.start(3, INTERVAL);
        rotation.stop();
        rotation.stop();
        assert!(!rotation.is_active());

        time::sleep(INTERVAL * 3).await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_shows_first_entry_without_ticking() {
        let (tx, mut rx) = mpsc::unbounded_channel::<TimerSignal>();
        let mut rotation = RotationScheduler::new(tx);

        assert_eq!(rotation.start(3, Duration::ZERO), Some(0));
        assert!(rotation.is_active());

        time::sleep(INTERVAL).await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }
}
