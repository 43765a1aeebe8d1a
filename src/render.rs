//! Writing parsed parameters out for the `parse` command.

use std::io;

use tagscan_base::Params;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
	/// One tag string per line, re-escaped
	Canonical,
	/// One parameter per line, blank line after each tag string
	Lines,
	/// Rust debug formatting
	Debug,
}

impl OutputFormat {
	pub fn try_parse(input: &str) -> Result<Self, &'static str> {
		match input {
			"canonical" | "" => Ok(Self::Canonical),
			"lines" => Ok(Self::Lines),
			"debug" => Ok(Self::Debug),
			_ => Err("invalid value for format"),
		}
	}

	pub fn write(self, output: &mut dyn io::Write, params: &Params) -> io::Result<()> {
		match self {
			Self::Canonical => writeln!(output, "{}", params),
			Self::Debug => writeln!(output, "{:#?}", params),
			Self::Lines => {
				for param in params {
					output.write_all(param.key().as_bytes())?;
					let mut sep = ": ";
					for value in param.values() {
						write!(output, "{}{}", sep, value)?;
						sep = " | ";
					}
					writeln!(output)?;
				}
				writeln!(output)
			},
		}
	}
}
