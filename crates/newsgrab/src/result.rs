// ABOUTME: Result types produced by the content cascade and the extraction pipeline.
// ABOUTME: ContentCandidate records which rule won; ExtractionResult is what gets written to disk.

use std::fmt;

/// The cascade rule that produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRule {
    /// Longest `<article>` element.
    ArticleTag,
    /// First accepted selector from the heuristic list.
    Selector(&'static str),
    /// Concatenated long paragraphs.
    Paragraphs,
}

impl fmt::Display for SourceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRule::ArticleTag => write!(f, "<article> tag"),
            SourceRule::Selector(sel) => write!(f, "selector: {}", sel),
            SourceRule::Paragraphs => write!(f, "paragraphs"),
        }
    }
}

/// A located block considered as the article body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentCandidate {
    pub text: String,
    pub html: String,
    pub rule: SourceRule,
}

/// Final output of the generic extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Trimmed article text; empty when extraction failed.
    pub text: String,
    pub article_html: String,
    pub full_html: String,
    pub rule: Option<SourceRule>,
}

impl ExtractionResult {
    /// Assemble a result from the page source and the cascade winner, if any.
    pub fn from_candidate(full_html: impl Into<String>, candidate: Option<ContentCandidate>) -> Self {
        match candidate {
            Some(c) => Self {
                text: c.text.trim().to_string(),
                article_html: c.html,
                full_html: full_html.into(),
                rule: Some(c.rule),
            },
            None => Self {
                full_html: full_html.into(),
                ..Default::default()
            },
        }
    }

    /// True when no article text was found.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_candidate_trims_text() {
        let candidate = ContentCandidate {
            text: "\n  Body text  \n".to_string(),
            html: "<article>Body text</article>".to_string(),
            rule: SourceRule::ArticleTag,
        };
        let result = ExtractionResult::from_candidate("<html></html>", Some(candidate));
        assert_eq!(result.text, "Body text");
        assert_eq!(result.article_html, "<article>Body text</article>");
        assert_eq!(result.rule, Some(SourceRule::ArticleTag));
        assert!(!result.is_empty());
    }

    #[test]
    fn missing_candidate_keeps_full_html() {
        let result = ExtractionResult::from_candidate("<html></html>", None);
        assert!(result.is_empty());
        assert_eq!(result.full_html, "<html></html>");
        assert_eq!(result.article_html, "");
    }

    #[test]
    fn rule_display_names_the_tier() {
        assert_eq!(SourceRule::ArticleTag.to_string(), "<article> tag");
        assert_eq!(SourceRule::Selector("main").to_string(), "selector: main");
        assert_eq!(SourceRule::Paragraphs.to_string(), "paragraphs");
    }
}
