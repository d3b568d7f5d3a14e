//! HTTP client for the TMDB endpoints the board reads.

use std::time::Duration;

use anyhow::Context;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::{
    CatalogQuery, CatalogSnapshot, CatalogSource, CreditsDocument, DetailDocument, ItemDetail,
    ItemQuery, MovieId, NowPlayingPage,
};
use crate::error::{DisplayError, Result};
use crate::settings::DisplayConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct TmdbClient {
    client: Client,
    /// Full URL of the now-playing listing.
    base_url: String,
    /// API root that `movie/{id}` paths hang off.
    api_root: String,
}

impl TmdbClient {
    /// Creates a client for the endpoints named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &DisplayConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_root: config.api_root.trim_end_matches('/').to_string(),
        })
    }

    pub fn detail_url(&self, id: MovieId) -> String {
        format!("{}/movie/{id}", self.api_root)
    }

    pub fn credits_url(&self, id: MovieId) -> String {
        format!("{}/movie/{id}/credits", self.api_root)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, params: &[(&str, &str)]) -> Result<T> {
        debug!("GET {url}");

        // `without_url` keeps the api key in the query string out of logs.
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|err| DisplayError::fetch(format!("GET {url}: {}", err.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DisplayError::fetch(format!(
                "GET {url} returned {status}: {body}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| DisplayError::malformed(format!("GET {url}: {}", err.without_url())))
    }
}

impl CatalogSource for TmdbClient {
    async fn now_playing(&self, query: &CatalogQuery) -> Result<CatalogSnapshot> {
        let page: NowPlayingPage = self
            .get_json(
                &self.base_url,
                &[
                    ("api_key", query.api_key.as_str()),
                    ("language", query.language.as_str()),
                    ("region", query.region.as_str()),
                ],
            )
            .await?;

        debug!(
            "now_playing page {:?}/{:?} with {} movies",
            page.page,
            page.total_pages,
            page.results.len()
        );
        Ok(CatalogSnapshot::new(page.results))
    }

    async fn item_detail(&self, query: &ItemQuery) -> Result<ItemDetail> {
        let params = [
            ("api_key", query.api_key.as_str()),
            ("language", query.language.as_str()),
        ];
        let detail_url = self.detail_url(query.item_id);
        let credits_url = self.credits_url(query.item_id);

        let (detail, credits) = tokio::try_join!(
            self.get_json::<DetailDocument>(&detail_url, &params),
            self.get_json::<CreditsDocument>(&credits_url, &params),
        )?;

        Ok(ItemDetail { detail, credits })
    }
}
