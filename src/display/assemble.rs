use serde::{Deserialize, Serialize};

use crate::catalog::{CreditsDocument, DetailDocument, MovieId};
use crate::error::{DisplayError, Result};

pub const MAX_CAST_NAMES: usize = 6;
const DIRECTOR_JOB: &str = "Director";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub average: f64,
    pub count: u64,
}

/// Display-ready description of one movie, built from its detail and credits.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderableRecord {
    pub movie_id: MovieId,
    pub title: String,
    pub tagline: String,
    pub poster_path: String,
    pub rating: Rating,
    pub runtime_minutes: Option<u32>,
    pub genres: Vec<String>,
    pub cast_names: Vec<String>,
    pub director_name: Option<String>,
}

/// Merge a detail document with the credits for the same movie.
///
/// Missing optional fields degrade to their empty form; only a pair that
/// describes two different movies is rejected.
pub fn assemble(detail: &DetailDocument, credits: &CreditsDocument) -> Result<RenderableRecord> {
    if detail.id != credits.id {
        return Err(DisplayError::malformed(format!(
            "detail for movie {} paired with credits for movie {}",
            detail.id, credits.id
        )));
    }

    let genres = detail
        .genres
        .iter()
        .flatten()
        .filter(|genre| !genre.name.is_empty())
        .map(|genre| genre.name.clone())
        .collect();

    let cast_names = credits
        .cast
        .iter()
        .flatten()
        .filter(|member| !member.name.is_empty())
        .take(MAX_CAST_NAMES)
        .map(|member| member.name.clone())
        .collect();

    // Last matching crew entry wins.
    let director_name = credits
        .crew
        .iter()
        .flatten()
        .filter(|member| member.job.as_deref() == Some(DIRECTOR_JOB))
        .last()
        .map(|member| member.name.clone())
        .filter(|name| !name.is_empty());

    Ok(RenderableRecord {
        movie_id: detail.id,
        title: detail.title.clone().unwrap_or_default(),
        tagline: detail.tagline.clone().unwrap_or_default(),
        poster_path: detail.poster_path.clone().unwrap_or_default(),
        rating: Rating {
            average: detail.vote_average.unwrap_or_default(),
            count: detail.vote_count.unwrap_or_default(),
        },
        runtime_minutes: detail.runtime.filter(|minutes| *minutes > 0),
        genres,
        cast_names,
        director_name,
    })
}
