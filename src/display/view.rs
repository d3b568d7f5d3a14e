//! Pure mapping from display state to an abstract UI tree.
//!
//! The tree is what hosts receive; they decide how a `Container` with class
//! `table` or an `Image` actually gets drawn.

use serde::{Deserialize, Serialize};

use crate::i18n::{TextKey, Translator};
use crate::settings::DisplayConfig;

use super::assemble::RenderableRecord;
use super::paginate::paginate;
use super::state::{DisplayState, Visible};

const GENRES_PER_LINE: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UiNode {
    Text { text: String, class: String },
    Image { src: String, class: String },
    Container { class: String, children: Vec<UiNode> },
}

impl UiNode {
    pub fn text(text: impl Into<String>, class: impl Into<String>) -> Self {
        UiNode::Text {
            text: text.into(),
            class: class.into(),
        }
    }

    pub fn image(src: impl Into<String>, class: impl Into<String>) -> Self {
        UiNode::Image {
            src: src.into(),
            class: class.into(),
        }
    }

    pub fn container(class: impl Into<String>, children: Vec<UiNode>) -> Self {
        UiNode::Container {
            class: class.into(),
            children,
        }
    }

    pub fn children(&self) -> &[UiNode] {
        match self {
            UiNode::Container { children, .. } => children.as_slice(),
            _ => &[],
        }
    }

    pub fn class(&self) -> &str {
        match self {
            UiNode::Text { class, .. }
            | UiNode::Image { class, .. }
            | UiNode::Container { class, .. } => class.as_str(),
        }
    }

    /// Depth-first text content, one entry per non-empty text node.
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_texts(&mut out);
        out
    }

    fn collect_texts<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            UiNode::Text { text, .. } if !text.is_empty() => out.push(text.as_str()),
            UiNode::Text { .. } | UiNode::Image { .. } => {}
            UiNode::Container { children, .. } => {
                for child in children {
                    child.collect_texts(out);
                }
            }
        }
    }

    /// Indented plain-text rendering for terminals.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        self.write_plain(0, &mut out);
        out
    }

    fn write_plain(&self, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        match self {
            UiNode::Text { text, .. } => {
                if !text.is_empty() {
                    out.push_str(&indent);
                    out.push_str(text);
                    out.push('\n');
                }
            }
            UiNode::Image { src, .. } => {
                out.push_str(&indent);
                out.push_str("[poster] ");
                out.push_str(src);
                out.push('\n');
            }
            UiNode::Container { children, .. } => {
                for child in children {
                    child.write_plain(depth + 1, out);
                }
            }
        }
    }
}

/// Settings that shape the tree, lifted out of [`DisplayConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    pub header: String,
    pub poster_base_url: String,
    pub placed_right: bool,
}

impl From<&DisplayConfig> for ViewOptions {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            header: config.header.clone(),
            poster_base_url: config.poster_base_url.clone(),
            placed_right: config.placed_right(),
        }
    }
}

pub fn render(state: &DisplayState, options: &ViewOptions, translator: &Translator) -> UiNode {
    let mut children = vec![UiNode::text(options.header.clone(), "header")];

    let body = match (&state.visible, state.visible_titles()) {
        (Visible::Page(_), Some(titles)) => table_view(&titles),
        (Visible::Record(record), _) => poster_view(record, options, translator),
        _ => UiNode::text(translator.text(TextKey::Loading), "small dimmed"),
    };
    children.push(body);

    UiNode::container("wrapper", children)
}

fn table_view(titles: &[&str]) -> UiNode {
    let rows = titles
        .iter()
        .map(|title| UiNode::container("row", vec![UiNode::text(*title, "")]))
        .collect();
    UiNode::container("table small", rows)
}

/// Image URL for a poster path; tolerates a slash on either side of the join.
pub fn poster_url(base: &str, poster_path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        poster_path.trim_start_matches('/')
    )
}

/// Genre names two per line, comma separated, with a trailing comma on every
/// line but the last.
pub fn genre_lines(genres: &[String]) -> Vec<String> {
    let pages = paginate(genres, GENRES_PER_LINE);
    let last = pages.len().saturating_sub(1);
    pages
        .iter()
        .enumerate()
        .map(|(i, pair)| {
            let line = pair.join(", ");
            if i < last {
                format!("{line},")
            } else {
                line
            }
        })
        .collect()
}

fn poster_view(
    record: &RenderableRecord,
    options: &ViewOptions,
    translator: &Translator,
) -> UiNode {
    let image = UiNode::container(
        "top",
        vec![UiNode::image(
            poster_url(&options.poster_base_url, &record.poster_path),
            "posterimage",
        )],
    );

    let text_class = if options.placed_right { "top" } else { "top left" };
    let details_class = if options.placed_right {
        "marginRight"
    } else {
        "marginLeft"
    };
    let text = UiNode::container(
        text_class,
        vec![UiNode::container(details_class, details(record, translator))],
    );

    let row = if options.placed_right {
        vec![text, image]
    } else {
        vec![image, text]
    };

    UiNode::container(
        "xsmall",
        vec![
            UiNode::text(record.title.clone(), "small"),
            UiNode::text(record.tagline.clone(), "dimmed"),
            UiNode::container("xsMarginTop", row),
        ],
    )
}

fn details(record: &RenderableRecord, translator: &Translator) -> Vec<UiNode> {
    let rating = UiNode::container(
        "xsmall ratingcont",
        vec![
            UiNode::text(format!("{} / 10", record.rating.average), ""),
            UiNode::text(
                format!(
                    " ({} {})",
                    record.rating.count,
                    translator.text(TextKey::Ratings)
                ),
                "xsmall dimmed votes",
            ),
        ],
    );

    let runtime = UiNode::text(
        record
            .runtime_minutes
            .map(|minutes| format!("{minutes} {}", translator.text(TextKey::Minutes)))
            .unwrap_or_default(),
        "xsmall runtime",
    );

    let mut genre_children = Vec::new();
    if !record.genres.is_empty() {
        genre_children.push(UiNode::text(
            format!("{}: ", translator.text(TextKey::Genre)),
            "xsmall dimmed genrehead",
        ));
        genre_children.extend(
            genre_lines(&record.genres)
                .into_iter()
                .map(|line| UiNode::text(line, "xsmall genre")),
        );
    }
    let genres = UiNode::container("xsmall genrecont", genre_children);

    let cast = UiNode::container(
        "xsmall cast",
        record
            .cast_names
            .iter()
            .map(|name| UiNode::text(name.clone(), ""))
            .collect(),
    );
    let director = UiNode::container(
        "xsmall directorcont",
        vec![
            UiNode::text(
                format!("{}: ", translator.text(TextKey::Director)),
                "xsmall dimmed directorhead",
            ),
            UiNode::text(
                record.director_name.clone().unwrap_or_default(),
                "xsmall director",
            ),
        ],
    );
    let credits = UiNode::container(
        "marginTop xsmall castcont",
        vec![
            UiNode::text(translator.text(TextKey::Cast), "xsmall dimmed casthead"),
            cast,
            director,
        ],
    );

    vec![rating, runtime, genres, credits]
}
