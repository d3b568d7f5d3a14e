//! Everything that talks to, or comes back from, the movie catalog service.

pub mod client;
pub mod models;
pub mod worker;

use std::future::Future;

pub use client::TmdbClient;
pub use models::{
    CastMember, CatalogQuery, CatalogSnapshot, CreditsDocument, CrewMember, DetailDocument,
    Genre, ItemDetail, ItemQuery, MovieId, MovieSummary, NowPlayingPage,
};
pub use worker::{spawn_fetch_worker, FetchRequest, FetchResult};

use crate::error::Result;

/// A place now-playing catalogs and per-movie documents can be fetched from.
pub trait CatalogSource: Send + Sync + 'static {
    fn now_playing(
        &self,
        query: &CatalogQuery,
    ) -> impl Future<Output = Result<CatalogSnapshot>> + Send;

    /// Detail and credits for one movie, fetched as a pair.
    fn item_detail(&self, query: &ItemQuery) -> impl Future<Output = Result<ItemDetail>> + Send;
}
