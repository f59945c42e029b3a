// ABOUTME: DOM query abstraction shared by live browser pages and saved HTML documents.
// ABOUTME: Defines the Document trait and the ElementSnapshot returned for each matched element.

//! DOM access for the content cascade.
//!
//! The cascade never touches a browser or a parser directly. It asks a
//! [`Document`] for every element matching a CSS selector and receives
//! [`ElementSnapshot`]s: the element's visible text and its outer HTML.
//!
//! Two implementations exist:
//! - `session::LoadedPage`: a tab in a live browser session.
//! - [`StaticDocument`]: an HTML string parsed with `scraper`.

use serde::Deserialize;

use crate::error::Result;

pub mod static_page;

pub use static_page::StaticDocument;

/// Visible text and markup of one matched element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ElementSnapshot {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub html: String,
}

impl ElementSnapshot {
    pub fn new(text: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: html.into(),
        }
    }

    /// Length of the visible text in characters.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A rendered page that can be queried by CSS selector.
#[allow(async_fn_in_trait)]
pub trait Document {
    /// Full HTML source captured when the document was loaded.
    fn source(&self) -> &str;

    /// All elements matching `selector`, in document order.
    async fn find_all(&self, selector: &str) -> Result<Vec<ElementSnapshot>>;
}

/// Returns the element with the longest visible text.
///
/// Ties resolve to the earliest element in document order.
pub fn longest(elements: Vec<ElementSnapshot>) -> Option<ElementSnapshot> {
    let mut best: Option<(usize, ElementSnapshot)> = None;
    for el in elements {
        let len = el.text_len();
        let replace = best
            .as_ref()
            .map_or(true, |(best_len, _)| len > *best_len);
        if replace {
            best = Some((len, el));
        }
    }
    best.map(|(_, el)| el)
}
