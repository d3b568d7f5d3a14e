//! Catalog documents as the TMDB API returns them.
//!
//! Only `id` is mandatory; every other field may be missing or null and
//! degrades to its absent form downstream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub type MovieId = i64;

/// Reads an explicit `null` as the type's default, same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: MovieId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Fields the display core passes through without looking at.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MovieSummary {
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            extra: Map::new(),
        }
    }
}

/// One refresh worth of now-playing movies, in the order the service sent them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    pub movies: Vec<MovieSummary>,
    pub fetched_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(movies: Vec<MovieSummary>) -> Self {
        Self {
            movies,
            fetched_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn ids(&self) -> Vec<MovieId> {
        self.movies.iter().map(|movie| movie.id).collect()
    }
}

/// Wire shape of `movie/now_playing`.
#[derive(Debug, Clone, Deserialize)]
pub struct NowPlayingPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<MovieSummary>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// `movie/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DetailDocument {
    pub id: MovieId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Option<Vec<Genre>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrewMember {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
}

/// `movie/{id}/credits`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CreditsDocument {
    pub id: MovieId,
    #[serde(default)]
    pub cast: Option<Vec<CastMember>>,
    #[serde(default)]
    pub crew: Option<Vec<CrewMember>>,
}

/// A detail document and the credits for the same movie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemDetail {
    pub detail: DetailDocument,
    pub credits: CreditsDocument,
}

/// Parameters of a `FETCH_CATALOG` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub api_key: String,
    pub region: String,
    pub language: String,
}

/// Parameters of a `FETCH_ITEM_DETAIL` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemQuery {
    pub item_id: MovieId,
    pub api_key: String,
    pub language: String,
}
