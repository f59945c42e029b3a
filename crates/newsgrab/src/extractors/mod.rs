// ABOUTME: Content extraction strategies for rendered pages and raw page dumps.
// ABOUTME: Groups the generic heuristic cascade and the publisher-specific embedded JSON decoder.

//! Content extraction module.
//!
//! Submodules:
//! - `cascade`: three-tier article body selection over any [`crate::dom::Document`].
//! - `embedded`: recovery of `"content"` JSON fields from a saved page dump.
//! - `escapes`: backslash escape decoding used by `embedded`.

pub mod cascade;
pub mod embedded;
pub mod escapes;
