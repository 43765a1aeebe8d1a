//! Parsed parameters, and their canonical tag-string form.

use std::{fmt::{self, Write as _}, ops::Deref, slice, vec};

use ascii::{AsciiChar, ToAsciiChar};

/// A single parameter from a tag string: a key, and zero or more values.
///
/// The key is never empty; the only ways to get a `Param` are [`Param::try_new`] and a
/// successful scan, and both enforce that.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
	key: String,
	values: Vec<String>,
}

impl Param {
	/// Creates a new parameter. Returns `None` if `key` is empty.
	///
	/// Empty values are skipped, since a scan can never produce one.
	pub fn try_new<K, I>(key: K, values: I) -> Option<Self>
	where K: Into<String>, I: IntoIterator, I::Item: Into<String> {
		let key = key.into();
		if key.is_empty() {
			return None;
		}
		Some(Self {
			key,
			values: values.into_iter()
				.map(Into::into)
				.filter(|v: &String| !v.is_empty())
				.collect(),
		})
	}

	pub(crate) fn from_scan(key: String, values: Vec<String>) -> Self {
		debug_assert!(!key.is_empty());
		Self { key, values }
	}

	#[inline]
	pub fn key(&self) -> &str {
		&self.key
	}

	#[inline]
	pub fn values(&self) -> &[String] {
		&self.values
	}

	/// Returns the first value, if there is one.
	pub fn value(&self) -> Option<&str> {
		self.values.first().map(String::as_str)
	}

	/// Is this a key-only parameter?
	///
	/// `key` and `key=` both scan to a flag.
	pub fn is_flag(&self) -> bool {
		self.values.is_empty()
	}

	pub fn into_parts(self) -> (String, Vec<String>) {
		(self.key, self.values)
	}
}

/// Writes the parameter back out as a tag string that scans to an equal `Param`.
///
/// Words containing `'` or `\` are escaped, and words containing a space or a comma are
/// quoted. There is no way to write an `=` that the scanner won't treat as structural, so
/// words containing one are written as-is and will not survive a round trip.
impl fmt::Display for Param {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", Word(&self.key))?;
		let mut sep = '=';
		for value in &self.values {
			f.write_char(sep)?;
			write!(f, "{}", Word(value))?;
			sep = ' ';
		}
		Ok(())
	}
}


/// The ordered list of parameters from one tag string.
///
/// Order is order of appearance. Keys are not required to be unique; [`Params::get`] returns
/// the first match and [`Params::get_all`] returns every one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Params(Vec<Param>);

impl Params {
	#[inline]
	pub const fn new() -> Self {
		Self(Vec::new())
	}

	pub(crate) fn push(&mut self, param: Param) {
		self.0.push(param);
	}

	pub fn as_slice(&self) -> &[Param] {
		&self.0
	}

	pub fn into_vec(self) -> Vec<Param> {
		self.0
	}

	/// Finds the first parameter with a given key.
	pub fn get(&self, key: &str) -> Option<&Param> {
		self.0.iter().find(|p| p.key == key)
	}

	/// Iterates over every parameter with a given key, in order.
	pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Param> + 'a {
		self.0.iter().filter(move |p| p.key == key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.get(key).is_some()
	}
}

impl Deref for Params {
	type Target = [Param];

	#[inline]
	fn deref(&self) -> &[Param] {
		&self.0
	}
}

impl FromIterator<Param> for Params {
	fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl IntoIterator for Params {
	type Item = Param;
	type IntoIter = vec::IntoIter<Param>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<'a> IntoIterator for &'a Params {
	type Item = &'a Param;
	type IntoIter = slice::Iter<'a, Param>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

/// Comma-joined [`Param`] forms. An empty list writes nothing.
impl fmt::Display for Params {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut show_comma = false;
		for param in &self.0 {
			if show_comma {
				f.write_char(',')?;
			}
			show_comma = true;
			write!(f, "{}", param)?;
		}
		Ok(())
	}
}


/// One key or value, escaped for writing into a tag string.
struct Word<'a>(&'a str);

impl Word<'_> {
	fn needs_quotes(&self) -> bool {
		self.0.chars().any(|ch| matches!(ch.to_ascii_char(),
			Ok(AsciiChar::Space) | Ok(AsciiChar::Comma)))
	}
}

impl fmt::Display for Word<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let quote = self.needs_quotes();
		if quote {
			f.write_char('\'')?;
		}
		for ch in self.0.chars() {
			if matches!(ch.to_ascii_char(), Ok(AsciiChar::BackSlash) | Ok(AsciiChar::Apostrophe)) {
				f.write_char('\\')?;
			}
			f.write_char(ch)?;
		}
		if quote {
			f.write_char('\'')?;
		}
		Ok(())
	}
}


#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn param(key: &str, values: &[&str]) -> Param {
		Param::try_new(key, values.iter().copied()).unwrap()
	}

	#[test]
	fn empty_key_rejected() {
		assert_eq!(None, Param::try_new("", ["value"]));
		assert_eq!(None, Param::try_new(String::new(), Vec::<String>::new()));
	}

	#[test]
	fn empty_values_skipped() {
		let p = param("key1", &["", "a", ""]);
		assert_eq!(&["a".to_owned()][..], p.values());
		assert!(param("key1", &[""]).is_flag());
		assert_eq!("key1", param("key1", &[""]).to_string());
	}

	#[test]
	fn accessors() {
		let p = param("name", &["first", "second"]);
		assert_eq!("name", p.key());
		assert_eq!(Some("first"), p.value());
		assert!(!p.is_flag());

		let flag = param("omitempty", &[]);
		assert_eq!(None, flag.value());
		assert!(flag.is_flag());
		assert_eq!(("omitempty".to_owned(), vec![]), flag.into_parts());
	}

	#[test]
	fn lookup_keeps_duplicates() {
		let params: Params = [
			param("key1", &["a"]),
			param("key2", &[]),
			param("key1", &["b"]),
		].into_iter().collect();

		assert_eq!(Some("a"), params.get("key1").and_then(Param::value));
		assert_eq!(vec!["a", "b"], params.get_all("key1")
			.filter_map(Param::value)
			.collect::<Vec<_>>());
		assert!(params.contains_key("key2"));
		assert!(!params.contains_key("key3"));
		assert_eq!(3, params.len());
	}

	#[test]
	fn display_plain() {
		assert_eq!("key1", param("key1", &[]).to_string());
		assert_eq!("key1=value1", param("key1", &["value1"]).to_string());
		assert_eq!("key1=v1 v2 v3", param("key1", &["v1", "v2", "v3"]).to_string());
	}

	#[test]
	fn display_escapes() {
		assert_eq!(r"key1='value 1'", param("key1", &["value 1"]).to_string());
		assert_eq!(r"key1='a,b'", param("key1", &["a,b"]).to_string());
		assert_eq!(r"key1=it\'s", param("key1", &["it's"]).to_string());
		assert_eq!(r"key1=C:\\dir", param("key1", &[r"C:\dir"]).to_string());
		assert_eq!(r"' k\'1 '=x", param(" k'1 ", &["x"]).to_string());
	}

	#[test]
	fn display_list() {
		assert_eq!("", Params::new().to_string());
		let params: Params = [param("key1", &["value1"]), param("key2", &[])]
			.into_iter().collect();
		assert_eq!("key1=value1,key2", params.to_string());
	}
}
