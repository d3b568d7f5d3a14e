use std::sync::Arc;

use crate::catalog::{CatalogSnapshot, MovieId, MovieSummary};

use super::assemble::RenderableRecord;
use super::paginate::paginate;

pub type Chunk = Vec<MovieSummary>;

/// The sequence the rotation clock walks over, derived from one snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RotationSource {
    #[default]
    Idle,
    Pages(Vec<Chunk>),
    Items(Vec<MovieId>),
}

impl RotationSource {
    pub fn len(&self) -> usize {
        match self {
            RotationSource::Idle => 0,
            RotationSource::Pages(pages) => pages.len(),
            RotationSource::Items(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What the board currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Visible {
    #[default]
    Loading,
    Page(usize),
    Record(RenderableRecord),
}

/// Everything the board knows, owned by the controller.
///
/// The transition methods replace whole parts (snapshot and source
/// together) so a page index can never outlive the pages it points into.
#[derive(Debug, Clone, Default)]
pub struct DisplayState {
    pub snapshot: Option<Arc<CatalogSnapshot>>,
    pub source: RotationSource,
    pub visible: Visible,
    /// Most recent movie whose detail was asked for.
    pub requested_item: Option<MovieId>,
}

impl DisplayState {
    /// Install a snapshot for page rotation. A `page_size` of 0 keeps the
    /// whole catalog on one page.
    pub fn with_pages(self, snapshot: Arc<CatalogSnapshot>, page_size: usize) -> Self {
        let pages = paginate(&snapshot.movies, page_size);
        let visible = if pages.is_empty() {
            // An empty catalog renders as an empty table, not as loading.
            Visible::Page(0)
        } else {
            self.visible
        };

        Self {
            snapshot: Some(snapshot),
            source: RotationSource::Pages(pages),
            visible,
            requested_item: None,
        }
    }

    /// Install a snapshot for per-movie rotation. The record on screen stays
    /// until the first new detail arrives.
    pub fn with_items(self, snapshot: Arc<CatalogSnapshot>) -> Self {
        let ids = snapshot.ids();
        let visible = match self.visible {
            Visible::Record(_) if ids.is_empty() => Visible::Loading,
            other => other,
        };

        Self {
            snapshot: Some(snapshot),
            source: RotationSource::Items(ids),
            visible,
            requested_item: None,
        }
    }

    /// Keep the snapshot but rotate over nothing.
    pub fn idle(self, snapshot: Arc<CatalogSnapshot>) -> Self {
        Self {
            snapshot: Some(snapshot),
            source: RotationSource::Idle,
            visible: Visible::Loading,
            requested_item: None,
        }
    }

    /// The page at `index`, if the current source has one.
    pub fn page(&self, index: usize) -> Option<&[MovieSummary]> {
        match &self.source {
            RotationSource::Pages(pages) => pages.get(index).map(Vec::as_slice),
            _ => None,
        }
    }

    pub fn item_at(&self, index: usize) -> Option<MovieId> {
        match &self.source {
            RotationSource::Items(ids) => ids.get(index).copied(),
            _ => None,
        }
    }

    /// Titles on the visible page. An index past the end (only possible for
    /// an empty catalog) reads as an empty page.
    pub fn visible_titles(&self) -> Option<Vec<&str>> {
        match self.visible {
            Visible::Page(index) => Some(
                self.page(index)
                    .unwrap_or_default()
                    .iter()
                    .map(|movie| movie.title.as_str())
                    .collect(),
            ),
            _ => None,
        }
    }
}
