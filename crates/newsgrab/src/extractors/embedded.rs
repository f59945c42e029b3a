// ABOUTME: Publisher-specific extractor that recovers article text from JSON embedded in a page dump.
// ABOUTME: Scans for "content" string fields, unescapes them, strips tags and repairs mojibake.

//! Embedded JSON content recovery.
//!
//! Some publishers (The Washington Post in particular) ship the article body
//! as `"content":"..."` string fields inside inline script data. The rendered
//! DOM is often empty or paywalled while the dump still carries the text.
//!
//! Each match goes through a fixed pipeline:
//! 1. strip trailing backslashes left by the naive match boundary
//! 2. unescape `\"`, `\\` and `\/`, in that order
//! 3. decode the remaining backslash escapes, keeping the input on failure
//! 4. strip anything that looks like a tag
//! 5. repair known mojibake, then drop stray `â` and `\`
//! 6. keep the block only if more than [`MIN_BLOCK_CHARS`] remain after trimming
//!
//! The field regex stops at the first `"` of any kind, so a value containing
//! escaped quotes is cut short. That boundary is accepted as-is.

use std::path::Path;

use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::error::{ExtractError, Result};
use crate::extractors::escapes::decode_escapes;

/// Cleaned blocks at or below this trimmed length are dropped.
pub const MIN_BLOCK_CHARS: usize = 20;

/// Separator between kept blocks.
const BLOCK_SEPARATOR: &str = "\n\n";

/// Characters shown when logging a kept block.
const PREVIEW_CHARS: usize = 100;

static CONTENT_FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""content":"([^"]*)""#).expect("content field regex"));

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));

/// UTF-8 punctuation that was decoded as Windows-1252, mapped back.
///
/// Matched leftmost-longest, so `â€™` wins over the bare `â€` prefix.
pub const MOJIBAKE_TABLE: &[(&str, &str)] = &[
    ("â€œ", "\""),
    ("â€™", "'"),
    ("â€\u{201d}", "—"),
    ("â€\"", "—"),
    ("â€", "\""),
];

static MOJIBAKE: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(MOJIBAKE_TABLE.iter().map(|(from, _)| from))
        .expect("mojibake patterns")
});

/// Lead character left behind by mojibake the table does not cover.
const MOJIBAKE_LEAD: char = 'â';

/// Extracts and cleans every embedded `"content"` field in `html_dump`.
///
/// Kept blocks are joined with a blank line in the order they appear. Returns
/// an empty string when nothing matches or nothing survives cleaning.
pub fn extract_embedded_content(html_dump: &str) -> String {
    let matches: Vec<&str> = CONTENT_FIELD_RE
        .captures_iter(html_dump)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();

    if matches.is_empty() {
        info!("No content found in HTML dump");
        return String::new();
    }
    info!(matches = matches.len(), "Found content matches");

    let mut blocks = Vec::new();
    for (i, raw) in matches.iter().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        if let Some(block) = clean_block(raw) {
            debug!(index = i + 1, preview = %preview(&block), "kept block");
            blocks.push(block);
        }
    }

    blocks.join(BLOCK_SEPARATOR)
}

/// Reads an HTML dump from disk and runs [`extract_embedded_content`] on it.
pub fn extract_embedded_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let dump = std::fs::read_to_string(path)
        .map_err(|e| ExtractError::io(path.display().to_string(), "read dump", e))?;
    Ok(extract_embedded_content(&dump))
}

/// Runs one raw match through the cleaning pipeline.
///
/// Returns `None` when the cleaned text is too short to keep.
pub fn clean_block(raw: &str) -> Option<String> {
    let unescaped = unescape_literals(raw.trim_end_matches('\\'));

    let decoded = match decode_escapes(&unescaped) {
        Ok(decoded) => decoded,
        Err(e) => {
            let err = ExtractError::decode(preview(raw), "decode escapes", Some(e.into()));
            debug!(error = %err, "keeping undecoded text");
            unescaped
        }
    };

    let text = repair_mojibake(&strip_tags(&decoded));
    let text = text.trim();
    if text.chars().count() > MIN_BLOCK_CHARS {
        Some(text.to_string())
    } else {
        None
    }
}

/// Undoes the three JSON escapes that would otherwise confuse decoding.
fn unescape_literals(s: &str) -> String {
    s.replace("\\\"", "\"")
        .replace("\\\\", "\\")
        .replace("\\/", "/")
}

/// Removes every `<...>` run. Not HTML-aware.
pub fn strip_tags(s: &str) -> String {
    TAG_RE.replace_all(s, "").into_owned()
}

/// Applies [`MOJIBAKE_TABLE`] and drops leftover lead characters and backslashes.
pub fn repair_mojibake(s: &str) -> String {
    let replacements: Vec<&str> = MOJIBAKE_TABLE.iter().map(|(_, to)| *to).collect();
    MOJIBAKE
        .replace_all(s, &replacements)
        .replace(MOJIBAKE_LEAD, "")
        .replace('\\', "")
}

fn preview(block: &str) -> String {
    let head: String = block.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", head)
}
