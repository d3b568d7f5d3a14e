//! The two clocks behind the board: a slow one that asks for a fresh catalog
//! and a fast one that rotates through whatever was fetched last.
//!
//! Neither clock calls back into its owner. Each runs as its own tokio task and
//! posts a [`TimerSignal`] into the owner's event channel, so every tick is
//! handled on the owner's single event loop in arrival order.

pub mod refresh;
pub mod rotation;

pub use refresh::RefreshScheduler;
pub use rotation::{Cursor, RotationScheduler};

use crate::catalog::CatalogQuery;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerSignal {
    /// A catalog fetch is due, for the query the refresh clock was started with.
    RefreshDue(CatalogQuery),
    /// The rotation clock fired. Signals from a replaced clock carry an older
    /// generation and are ignored by [`RotationScheduler::advance`].
    Rotate { generation: u64 },
}
