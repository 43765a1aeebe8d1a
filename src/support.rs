use std::io;

use tagscan_base::{Error, Params};

pub(crate) type IoObject<'a> = &'a mut dyn io::BufRead;

/// Parses every line of `input` as its own tag string.
///
/// `each` gets the 1-based line number and the parse result. Stops at the first I/O error, or
/// the first error `each` returns.
pub(crate) fn for_each_tag<E, F>(input: IoObject<'_>, mut each: F) -> Result<(), E>
where
	F: FnMut(usize, Result<Params, Error>) -> Result<(), E>,
	E: From<io::Error>,
{
	for (idx, line) in io::BufRead::lines(input).enumerate() {
		let line = line?;
		each(idx + 1, tagscan_base::parse(&line))?;
	}
	Ok(())
}
