//! Parsing for tag strings: the compact, comma-separated annotations attached to declarations.
//!
//! A tag string is a list of parameters separated by `,`. Each parameter is a key, optionally
//! followed by `=` and any number of space-separated values:
//!
//! ```text
//! name=id,omitempty,oneof=red green 'light blue'
//! ```
//!
//! Single quotes make spaces and commas literal. Inside or outside quotes, a backslash escapes
//! `\` or `'` (and nothing else). Empty input is valid and has no parameters.
//!
//! ```
//! let params = tagscan_base::parse("name=id,omitempty").unwrap();
//! assert_eq!(Some("id"), params.get("name").and_then(|p| p.value()));
//! assert!(params.get("omitempty").unwrap().is_flag());
//! ```

mod param;
mod scanner;

pub use param::{Param, Params};
pub use scanner::{Error, TagScanner};

use tracing::debug;

/// Parses a whole tag string.
///
/// On failure, nothing scanned so far is returned; the error says which rule was broken.
pub fn parse(tag: &str) -> Result<Params, Error> {
	let mut scanner = TagScanner::new();
	for ch in tag.chars() {
		scanner.push(ch)?;
	}
	let params = scanner.finish()?;
	debug!(count = params.len(), "parsed tag string");
	Ok(params)
}
