// ABOUTME: Three-tier heuristic cascade that picks the article body out of a rendered page.
// ABOUTME: Tries <article> tags, then an ordered selector list, then concatenated long paragraphs.

//! Article body selection.
//!
//! Tiers run in strict order and the first one that clears the threshold wins:
//!
//! 1. `<article>` elements: the longest one, if it exceeds [`MIN_CONTENT_CHARS`].
//! 2. [`CONTENT_SELECTORS`] in list order: the first selector whose longest
//!    element beats both the text found so far and [`MIN_CONTENT_CHARS`].
//!    This stops at the first acceptance even if a later selector would match
//!    more text.
//! 3. Every `<p>` whose trimmed text exceeds [`MIN_PARAGRAPH_CHARS`], joined
//!    in document order.
//!
//! Query failures never abort the cascade. A failure in tier 1 or 3 skips the
//! tier, a failure in tier 2 skips the selector.

use tracing::{debug, info};

use crate::dom::{longest, Document, ElementSnapshot};
use crate::result::{ContentCandidate, SourceRule};

/// Text must be longer than this to count as an article body.
pub const MIN_CONTENT_CHARS: usize = 200;

/// Paragraphs at or below this trimmed length are treated as navigation chrome.
pub const MIN_PARAGRAPH_CHARS: usize = 50;

/// Class and tag heuristics for tier 2, in priority order.
pub const CONTENT_SELECTORS: &[&str] = &[
    r#"[class*="article"]"#,
    r#"[class*="content"]"#,
    r#"[class*="story"]"#,
    r#"[class*="post"]"#,
    "main",
    ".entry-content",
    ".post-content",
    ".article-content",
    ".story-content",
];

/// Separator between paragraph texts in tier 3.
const PARAGRAPH_TEXT_SEPARATOR: &str = "\n\n";

/// Separator between paragraph markup in tier 3.
const PARAGRAPH_HTML_SEPARATOR: &str = "\n";

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// True while the best text so far is too short to stop the cascade.
fn needs_more(best: &Option<ContentCandidate>) -> bool {
    best.as_ref()
        .map_or(true, |c| char_len(c.text.trim()) < MIN_CONTENT_CHARS)
}

/// Runs the cascade over `doc` and returns the winning candidate.
///
/// Returns `None` when no tier produced qualifying text.
pub async fn select_best_content<D: Document>(doc: &D) -> Option<ContentCandidate> {
    let mut best = article_tier(doc).await;

    if needs_more(&best) {
        if let Some(found) = selector_tier(doc, best.as_ref()).await {
            best = Some(found);
        }
    }

    if needs_more(&best) {
        if let Some(found) = paragraph_tier(doc).await {
            best = Some(found);
        }
    }

    best
}

async fn article_tier<D: Document>(doc: &D) -> Option<ContentCandidate> {
    let articles = match doc.find_all("article").await {
        Ok(found) => found,
        Err(e) => {
            debug!(error = %e, "article tier skipped");
            return None;
        }
    };

    let largest = longest(articles)?;
    if largest.text_len() <= MIN_CONTENT_CHARS {
        debug!(chars = largest.text_len(), "longest <article> too short");
        return None;
    }

    info!("Found article content via <article> tag");
    Some(into_candidate(largest, SourceRule::ArticleTag))
}

async fn selector_tier<D: Document>(
    doc: &D,
    current: Option<&ContentCandidate>,
) -> Option<ContentCandidate> {
    let current_len = current.map_or(0, |c| char_len(&c.text));

    for &selector in CONTENT_SELECTORS {
        let elements = match doc.find_all(selector).await {
            Ok(found) => found,
            Err(e) => {
                debug!(selector, error = %e, "selector skipped");
                continue;
            }
        };

        let Some(largest) = longest(elements) else {
            continue;
        };

        let len = largest.text_len();
        if len > current_len && len > MIN_CONTENT_CHARS {
            info!(selector, "Found content via selector");
            return Some(into_candidate(largest, SourceRule::Selector(selector)));
        }
    }

    None
}

async fn paragraph_tier<D: Document>(doc: &D) -> Option<ContentCandidate> {
    let paragraphs = match doc.find_all("p").await {
        Ok(found) => found,
        Err(e) => {
            debug!(error = %e, "paragraph tier skipped");
            return None;
        }
    };

    let mut texts = Vec::new();
    let mut markup = Vec::new();
    for p in paragraphs {
        let trimmed = p.text.trim();
        if char_len(trimmed) > MIN_PARAGRAPH_CHARS {
            texts.push(trimmed.to_string());
            markup.push(p.html);
        }
    }

    if texts.is_empty() {
        return None;
    }

    info!(paragraphs = texts.len(), "Extracted content from paragraphs");
    Some(ContentCandidate {
        text: texts.join(PARAGRAPH_TEXT_SEPARATOR),
        html: markup.join(PARAGRAPH_HTML_SEPARATOR),
        rule: SourceRule::Paragraphs,
    })
}

fn into_candidate(el: ElementSnapshot, rule: SourceRule) -> ContentCandidate {
    ContentCandidate {
        text: el.text,
        html: el.html,
        rule,
    }
}
