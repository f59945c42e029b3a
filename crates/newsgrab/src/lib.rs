// ABOUTME: Main library entry point for newsgrab, a browser-driven news article extractor.
// ABOUTME: Re-exports the public API: pipeline entry points, Options, results, errors and the Document trait.

//! newsgrab - pull the article body out of a news page.
//!
//! A page is loaded in a real browser (launched headless, or an already
//! running Chrome reached over its debug port), then a three-tier cascade
//! picks the article text: the longest `<article>`, then a list of class
//! heuristics, then all long paragraphs. The text and the full HTML are
//! written to `news.txt` and `site.html`.
//!
//! Publishers that ship the body as embedded JSON can be post-processed with
//! [`extract_embedded_content`], which the `wp-extract` binary wraps.
//!
//! # Example
//!
//! ```no_run
//! use newsgrab::{run, ExtractError, Input, Options};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ExtractError> {
//!     let opts = Options::builder().use_existing_session(true).build();
//!     let result = run(&Input::Url("https://example.com/story".into()), &opts).await?;
//!     println!("{}", result.text);
//!     Ok(())
//! }
//! ```

pub mod dom;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod options;
pub mod pipeline;
pub mod result;
pub mod session;

pub use crate::dom::{Document, ElementSnapshot, StaticDocument};
pub use crate::error::{ErrorCode, ExtractError, Result};
pub use crate::extractors::cascade::select_best_content;
pub use crate::extractors::embedded::{extract_embedded_content, extract_embedded_file};
pub use crate::options::{Options, OptionsBuilder, SessionMode};
pub use crate::pipeline::{extract_from_document, run, Input};
pub use crate::result::{ContentCandidate, ExtractionResult, SourceRule};
pub use crate::session::{BrowserSession, LoadedPage};
