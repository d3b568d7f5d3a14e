//! Fixed UI strings for the languages the board ships with.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKey {
    Loading,
    Ratings,
    Minutes,
    Cast,
    Director,
    Genre,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Language {
    English,
    German,
    Swedish,
}

/// Key to string lookup for one locale. Unsupported locales read English.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translator {
    language: Language,
}

impl Translator {
    /// Pick the table by the primary subtag of `locale` (`de-DE` → German).
    pub fn for_locale(locale: &str) -> Self {
        let primary = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        let language = match primary.as_str() {
            "de" => Language::German,
            "sv" => Language::Swedish,
            _ => Language::English,
        };

        Self { language }
    }

    pub fn text(&self, key: TextKey) -> &'static str {
        use Language::*;
        use TextKey::*;

        match (self.language, key) {
            (English, Loading) => "Loading …",
            (English, Ratings) => "ratings",
            (English, Minutes) => "min",
            (English, Cast) => "Cast",
            (English, Director) => "Director",
            (English, Genre) => "Genre",

            (German, Loading) => "Lade …",
            (German, Ratings) => "Bewertungen",
            (German, Minutes) => "Min.",
            (German, Cast) => "Besetzung",
            (German, Director) => "Regie",
            (German, Genre) => "Genre",

            (Swedish, Loading) => "Laddar …",
            (Swedish, Ratings) => "betyg",
            (Swedish, Minutes) => "min",
            (Swedish, Cast) => "Skådespelare",
            (Swedish, Director) => "Regi",
            (Swedish, Genre) => "Genre",
        }
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self {
            language: Language::English,
        }
    }
}
