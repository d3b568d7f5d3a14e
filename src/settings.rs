use std::{
    fs,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
    time::Duration,
};

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{CatalogQuery, ItemQuery, MovieId};
use crate::error::DisplayError;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/movie/now_playing";
pub const DEFAULT_API_ROOT: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w154";

/// Older option names and the keys that replaced them.
const LEGACY_KEYS: [(&str, &str); 5] = [
    ("interFace", "presentationMode"),
    ("moviesPerPage", "pageSize"),
    ("refreshInterval", "refreshIntervalMs"),
    ("pageChangeInterval", "rotationIntervalMs"),
    ("animationSpeed", "transitionDurationMs"),
];

/// How the board presents the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PresentationMode {
    List,
    #[default]
    Poster,
    Detailed,
    Multiposter,
    /// Anything else. Nothing rotates and only the placeholder is shown.
    Unknown(String),
}

/// What a presentation mode rotates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationKind {
    /// Pages of titles, switched locally on every tick.
    Pages,
    /// Single movies, each tick fetching that movie's detail and credits.
    Items,
}

impl PresentationMode {
    pub fn as_str(&self) -> &str {
        match self {
            PresentationMode::List => "list",
            PresentationMode::Poster => "poster",
            PresentationMode::Detailed => "detailed",
            PresentationMode::Multiposter => "multiposter",
            PresentationMode::Unknown(raw) => raw,
        }
    }

    pub fn rotation_kind(&self) -> Option<RotationKind> {
        match self {
            PresentationMode::List | PresentationMode::Multiposter => Some(RotationKind::Pages),
            PresentationMode::Poster | PresentationMode::Detailed => Some(RotationKind::Items),
            PresentationMode::Unknown(_) => None,
        }
    }
}

impl From<String> for PresentationMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "list" => PresentationMode::List,
            "poster" => PresentationMode::Poster,
            "detailed" => PresentationMode::Detailed,
            "multiposter" => PresentationMode::Multiposter,
            _ => PresentationMode::Unknown(value),
        }
    }
}

impl From<PresentationMode> for String {
    fn from(mode: PresentationMode) -> Self {
        mode.as_str().to_string()
    }
}

/// Board configuration. Field names follow the JSON file (camelCase); the
/// older module option names are accepted as aliases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayConfig {
    pub api_key: String,
    pub region: String,
    /// Locale tag, e.g. `de-DE`.
    pub language: String,
    #[serde(alias = "interFace")]
    pub presentation_mode: PresentationMode,
    /// Titles per page in list modes; 0 shows the whole catalog at once.
    #[serde(alias = "moviesPerPage")]
    pub page_size: usize,
    #[serde(alias = "refreshInterval")]
    pub refresh_interval_ms: u64,
    #[serde(alias = "pageChangeInterval")]
    pub rotation_interval_ms: u64,
    /// Cosmetic fade between frames; passed through to the host.
    #[serde(alias = "animationSpeed")]
    pub transition_duration_ms: u64,
    pub header: String,
    pub base_url: String,
    pub api_root: String,
    pub poster_base_url: String,
    /// Screen placement, e.g. `top_left`. Any value containing `right`
    /// mirrors the poster layout.
    pub position: String,
    pub discard_stale_details: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            region: "DE".into(),
            language: "de-DE".into(),
            presentation_mode: PresentationMode::Poster,
            page_size: 0,
            refresh_interval_ms: 24 * 60 * 60 * 1000,
            rotation_interval_ms: 30 * 1000,
            transition_duration_ms: 2_500,
            header: "Kinofilme".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_root: DEFAULT_API_ROOT.into(),
            poster_base_url: DEFAULT_POSTER_BASE_URL.into(),
            position: "top_left".into(),
            discard_stale_details: true,
        }
    }
}

impl DisplayConfig {
    /// Parse a config document. When a file carries both an old option name
    /// and its replacement, the replacement wins.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        let mut value: Value = serde_json::from_str(contents)?;
        if let Value::Object(map) = &mut value {
            for (legacy, current) in LEGACY_KEYS {
                if map.contains_key(current) && map.remove(legacy).is_some() {
                    warn!("Config sets both '{legacy}' and '{current}'; using '{current}'");
                }
            }
        }
        serde_json::from_value(value)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn rotation_interval(&self) -> Duration {
        Duration::from_millis(self.rotation_interval_ms)
    }

    pub fn catalog_query(&self) -> CatalogQuery {
        CatalogQuery {
            api_key: self.api_key.clone(),
            region: self.region.clone(),
            language: self.language.clone(),
        }
    }

    pub fn item_query(&self, item_id: MovieId) -> ItemQuery {
        ItemQuery {
            item_id,
            api_key: self.api_key.clone(),
            language: self.language.clone(),
        }
    }

    pub fn placed_right(&self) -> bool {
        self.position.to_lowercase().contains("right")
    }

    /// Problems that put the board into a degraded state. None of them stop
    /// it from starting.
    pub fn validate(&self) -> Vec<DisplayError> {
        let mut problems = Vec::new();

        if let PresentationMode::Unknown(raw) = &self.presentation_mode {
            problems.push(DisplayError::configuration(format!(
                "unrecognised presentation mode '{raw}'; nothing will rotate"
            )));
        }
        if self.refresh_interval_ms == 0 {
            problems.push(DisplayError::configuration(
                "refreshIntervalMs must be positive; the catalog is fetched only once",
            ));
        }
        if self.rotation_interval_ms == 0 {
            problems.push(DisplayError::configuration(
                "rotationIntervalMs must be positive; the first entry stays on screen",
            ));
        }
        if self.api_key.trim().is_empty() {
            problems.push(DisplayError::configuration(
                "apiKey is empty; catalog requests will be rejected",
            ));
        }

        problems
    }
}

/// JSON-file backed configuration shared between the host and the board.
pub struct ConfigStore {
    path: PathBuf,
    data: RwLock<DisplayConfig>,
}

impl ConfigStore {
    /// Load `path`, falling back to defaults when the file is missing or
    /// cannot be parsed.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            DisplayConfig::from_json(&contents).unwrap_or_else(|err| {
                warn!("Ignoring unparsable config {}: {err}", path.display());
                DisplayConfig::default()
            })
        } else {
            DisplayConfig::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> DisplayConfig {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update(&self, config: DisplayConfig) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        self.persist(&config)?;
        *guard = config;
        Ok(())
    }

    fn persist(&self, data: &DisplayConfig) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write config to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_board_defaults() {
        let config = DisplayConfig::default();
        assert_eq!(config.presentation_mode, PresentationMode::Poster);
        assert_eq!(config.page_size, 0);
        assert_eq!(config.refresh_interval(), Duration::from_secs(86_400));
        assert_eq!(config.rotation_interval(), Duration::from_secs(30));
        assert_eq!(config.region, "DE");
        assert!(config.discard_stale_details);
        assert!(!config.placed_right());
    }

    #[test]
    fn accepts_legacy_option_names() {
        let raw = r#"{
            "apiKey": "k",
            "interFace": "list",
            "moviesPerPage": 5,
            "refreshInterval": 3600000,
            "pageChangeInterval": 10000,
            "animationSpeed": 1000
        }"#;
        let config: DisplayConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.presentation_mode, PresentationMode::List);
        assert_eq!(config.page_size, 5);
        assert_eq!(config.refresh_interval_ms, 3_600_000);
        assert_eq!(config.rotation_interval_ms, 10_000);
        assert_eq!(config.transition_duration_ms, 1_000);
        assert_eq!(config.header, "Kinofilme");
    }

    #[test]
    fn unknown_mode_has_no_rotation() {
        let config: DisplayConfig =
            serde_json::from_str(r#"{"presentationMode": "carousel"}"#).unwrap();
        assert_eq!(
            config.presentation_mode,
            PresentationMode::Unknown("carousel".into())
        );
        assert_eq!(config.presentation_mode.rotation_kind(), None);
        assert_eq!(PresentationMode::Multiposter.rotation_kind(), Some(RotationKind::Pages));
        assert_eq!(PresentationMode::Detailed.rotation_kind(), Some(RotationKind::Items));
    }

    #[test]
    fn validate_reports_degraded_settings() {
        let config = DisplayConfig {
            api_key: "k".into(),
            presentation_mode: PresentationMode::Unknown("grid".into()),
            rotation_interval_ms: 0,
            ..DisplayConfig::default()
        };
        let problems = config.validate();
        assert_eq!(problems.len(), 2);
        assert!(problems
            .iter()
            .all(|problem| matches!(problem, DisplayError::ConfigurationInvalid { .. })));

        let healthy = DisplayConfig {
            api_key: "k".into(),
            ..DisplayConfig::default()
        };
        assert!(healthy.validate().is_empty());
    }

    #[test]
    fn placement_flag_is_case_insensitive() {
        let config = DisplayConfig {
            position: "Bottom_Right".into(),
            ..DisplayConfig::default()
        };
        assert!(config.placed_right());
    }

    #[test]
    fn store_persists_updates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let store = ConfigStore::new(path.clone()).unwrap();
        assert_eq!(store.config(), DisplayConfig::default());

        let updated = DisplayConfig {
            api_key: "secret".into(),
            presentation_mode: PresentationMode::List,
            page_size: 4,
            ..DisplayConfig::default()
        };
        store.update(updated.clone()).unwrap();

        let reopened = ConfigStore::new(path).unwrap();
        assert_eq!(reopened.config(), updated);
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let store = ConfigStore::new(path).unwrap();
        assert_eq!(store.config(), DisplayConfig::default());
    }

    #[test]
    fn current_key_wins_over_legacy_name() {
        let raw = r#"{
            "apiKey": "k",
            "interFace": "list",
            "presentationMode": "detailed",
            "moviesPerPage": 5,
            "pageSize": 3
        }"#;
        let config = DisplayConfig::from_json(raw).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.presentation_mode, PresentationMode::Detailed);
        assert_eq!(config.page_size, 3);
    }

    #[test]
    fn store_keeps_api_key_when_both_names_are_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"apiKey": "secret", "animationSpeed": 900, "transitionDurationMs": 400}"#,
        )
        .unwrap();

        let config = ConfigStore::new(path).unwrap().config();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.transition_duration_ms, 400);
    }
}
