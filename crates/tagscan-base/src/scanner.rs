use std::mem;

use ascii::{AsciiChar, ToAsciiChar};
use thiserror::Error;
use tracing::trace;

use crate::param::{Param, Params};

/// Reasons a tag string can be rejected. Every one of them ends the scan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
	#[error("key is empty (parameter ends at byte {position})")]
	EmptyKey { position: usize },
	#[error("can only have one key (found `{extra}` after `{key}`)")]
	DuplicateKey { key: String, extra: String },
	#[error("'\\{escaped}' isn't a valid escape sequence (at byte {position})")]
	InvalidEscape { escaped: char, position: usize },
	#[error("unterminated quote (opened at byte {position})")]
	UnterminatedQuote { position: usize },
	#[error("unterminated escape sequence")]
	UnterminatedEscape,
}

/// Where the scanner is, apart from the characters it's holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Flags {
	/// Byte offset of the `'` that opened the current quoted span
	quoted: Option<usize>,
	/// Byte offset of a `\` that hasn't been applied yet
	escaped: Option<usize>,
	/// An `=` has been seen for this parameter, so words are values
	in_value: bool,
}

/// Single-pass state machine turning tag string characters into [`Params`].
///
/// Feed characters in order with [`push`](Self::push), then call [`finish`](Self::finish) to
/// apply end-of-input rules and get the result. Any error means the tag string is malformed;
/// the scanner should be dropped at that point.
#[derive(Debug, Default)]
pub struct TagScanner {
	/// Characters of the word in progress
	word: String,
	/// Key of the parameter in progress
	key: Option<String>,
	/// Values of the parameter in progress
	values: Vec<String>,
	flags: Flags,
	/// Every completed parameter
	params: Params,
	/// Byte offset of the next character
	offset: usize,
}

impl TagScanner {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, ch: char) -> Result<(), Error> {
		let at = self.offset;
		self.offset += ch.len_utf8();

		if let Some(backslash) = self.flags.escaped.take() {
			// only two things can be escaped, and they go in raw
			return match ch.to_ascii_char() {
				Ok(AsciiChar::BackSlash) | Ok(AsciiChar::Apostrophe) => {
					self.word.push(ch);
					Ok(())
				},
				_ => Err(Error::InvalidEscape { escaped: ch, position: backslash }),
			};
		}

		match ch.to_ascii_char() {
			Ok(AsciiChar::BackSlash) => {
				self.flags.escaped = Some(at);
			},
			Ok(AsciiChar::Apostrophe) => {
				self.flags.quoted = match self.flags.quoted {
					Some(_) => None,
					None => Some(at),
				};
			},
			Ok(AsciiChar::Space) if self.flags.quoted.is_none() => {
				self.end_word()?;
			},
			Ok(AsciiChar::Comma) if self.flags.quoted.is_none() => {
				self.end_word()?;
				self.end_param(at)?;
			},
			Ok(AsciiChar::Equal) => {
				// structural even inside quotes
				self.end_word()?;
				self.flags.in_value = true;
			},
			_ => self.word.push(ch),
		}
		Ok(())
	}

	/// Applies end-of-input rules and returns every parameter scanned.
	pub fn finish(mut self) -> Result<Params, Error> {
		self.end_word()?;

		// a trailing parameter that never got a key is dropped
		if self.key.is_some() {
			self.end_param(self.offset)?;
		}

		if let Some(position) = self.flags.quoted {
			return Err(Error::UnterminatedQuote { position });
		}
		if self.flags.escaped.is_some() {
			return Err(Error::UnterminatedEscape);
		}

		Ok(self.params)
	}

	/// Word boundary. Empty words (from runs of separators, or `''`) are dropped.
	fn end_word(&mut self) -> Result<(), Error> {
		if self.word.is_empty() {
			return Ok(());
		}
		let word = mem::take(&mut self.word);

		if self.flags.in_value {
			self.values.push(word);
		} else if let Some(ref key) = self.key {
			return Err(Error::DuplicateKey { key: key.clone(), extra: word });
		} else {
			self.key = Some(word);
		}
		Ok(())
	}

	fn end_param(&mut self, position: usize) -> Result<(), Error> {
		let key = self.key.take().ok_or(Error::EmptyKey { position })?;
		let values = mem::take(&mut self.values);
		trace!(key = %key, values = values.len(), "committed parameter");

		self.params.push(Param::from_scan(key, values));
		self.flags.in_value = false;
		Ok(())
	}
}
