// ABOUTME: Document implementation over an HTML string parsed with scraper.
// ABOUTME: Used for offline extraction from saved pages and for exercising the cascade in tests.

use scraper::{ElementRef, Html, Selector};

use crate::dom::{Document, ElementSnapshot};
use crate::error::{ExtractError, Result};

/// Elements whose text never renders.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// A parsed HTML document queried without a browser.
pub struct StaticDocument {
    source: String,
    doc: Html,
}

impl StaticDocument {
    /// Parse a full HTML document.
    pub fn parse(html: impl Into<String>) -> Self {
        let source = html.into();
        let doc = Html::parse_document(&source);
        Self { source, doc }
    }

    fn snapshot(el: ElementRef<'_>) -> ElementSnapshot {
        ElementSnapshot {
            text: visible_text(el),
            html: el.html(),
        }
    }
}

/// Concatenates the element's text nodes, skipping non-rendered subtrees.
fn visible_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in el.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|a| HIDDEN_TAGS.contains(&a.value().name()));
        if !hidden {
            out.push_str(text);
        }
    }
    out
}

impl Document for StaticDocument {
    fn source(&self) -> &str {
        &self.source
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<ElementSnapshot>> {
        let parsed = Selector::parse(selector).map_err(|e| {
            ExtractError::inspect(selector, "find_all", Some(anyhow::anyhow!("{:?}", e)))
        })?;
        Ok(self.doc.select(&parsed).map(Self::snapshot).collect())
    }
}
