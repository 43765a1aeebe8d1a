use std::borrow::Cow;
use std::fs;
use std::io::{self, BufReader, BufWriter, Write as _};

use gumdrop::Options;
use tracing::warn;

mod logging;
mod render;
mod support;

use render::OutputFormat;
use support::IoObject;

#[derive(Debug, Options)]
enum Command {

	#[options(help = "parse tag strings (one per line) and print their parameters")]
	Parse(ParseArgs),

	#[options(help = "report malformed tag strings (one per line)")]
	Check(CheckArgs),
}

#[derive(Debug, Options)]
struct ParseArgs {

	#[options(help = "file of tag strings, or - for stdin", required)]
	input_file: String,

	#[options(help = "output file, or - for stdout", default = "-")]
	output_file: String,

	#[options(help = "output format (canonical, lines, debug)",
		default = "canonical",
		parse(try_from_str = "OutputFormat::try_parse"),
		)]
	format: OutputFormat,

	#[options(help = "report malformed lines and carry on")]
	keep_going: bool,

	#[options(help = "show debug logging")]
	verbose: bool,

	#[options(help = "show help for this command")]
	help: bool,
}

#[derive(Debug, Options)]
struct CheckArgs {

	#[options(help = "file of tag strings, or - for stdin", required)]
	input_file: String,

	#[options(help = "show debug logging")]
	verbose: bool,

	#[options(help = "show help for this command")]
	help: bool,
}

#[derive(Debug, thiserror::Error)]
enum RunError {
	#[error("io error: {0}")]
	Io(#[from] io::Error),
	#[error("line {line}: {source}")]
	Tag { line: usize, source: tagscan_base::Error },
	#[error("{failed} malformed tag string(s)")]
	Malformed { failed: usize },
}

impl RunError {
	/// Tag errors are printed by `report` as they happen.
	fn is_reported(&self) -> bool {
		matches!(*self, RunError::Tag { .. })
	}

	fn exit_code(&self) -> ExitCode {
		match *self {
			RunError::Io(_) => ExitCode::IoError,
			RunError::Tag { .. } | RunError::Malformed { .. } => ExitCode::InvalidData,
		}
	}
}

impl Command {
	fn user_wants_help(&self) -> bool {
		match *self {
			Command::Parse(ref c) if c.help => true,
			Command::Check(ref c) if c.help => true,
			_ => false,
		}
	}

	fn verbose(&self) -> bool {
		match *self {
			Command::Parse(ref c) => c.verbose,
			Command::Check(ref c) => c.verbose,
		}
	}

	fn print_usage_and_exit(process_name: &str, command_name: Option<&'static str>) -> ! {
		let to_print = command_name.and_then(Command::command_usage)
			.unwrap_or_else(Command::usage);
		eprintln!("{}", to_print);
		eprintln!("\nRun '{} `subcommand` --help' for more guidance", process_name);
		std::process::exit(ExitCode::Success.into());
	}
}

#[repr(i32)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum ExitCode {
	Success = 0,
	IoError = 2,
	CliArgError = 3,
	InvalidData = 4,
}

impl From<ExitCode> for i32 {
	fn from(src: ExitCode) -> Self {
		src as i32
	}
}


trait HelpExt: Eq + PartialEq<str> {
	fn is_help(&self) -> bool {
		["help", "-h", "--help", "-help"].into_iter().any(|help| self == help)
	}
}
impl HelpExt for str {}


fn main() {
	let (process, args_str) = {
		let mut iter = std::env::args();
		let process = iter.next().map(Cow::Owned).unwrap_or(
			Cow::Borrowed(env!("CARGO_PKG_NAME"))
		);
		(process, iter.collect::<Vec<_>>())
	};
	if matches!(*args_str, [ref s] if s.is_help()) {
		Command::print_usage_and_exit(&process, None);
	}
	let args = match Command::parse_args_default(&args_str) {
		Ok(a) if a.user_wants_help() => Command::print_usage_and_exit(&process, a.command_name()),
		Ok(a) => a,
		Err(e) => {
			eprintln!("argument error: {}", e);
			eprintln!("run `{} help` for usage guidelines", process);
			std::process::exit(ExitCode::CliArgError.into());
		}
	};

	logging::init(args.verbose());

	let result = match args {
		Command::Parse(args) => run_parse(args),
		Command::Check(args) => run_check(args),
	};

	std::process::exit(match result {
		Ok(()) => ExitCode::Success.into(),
		Err(e) => {
			if !e.is_reported() {
				eprintln!("error: {}", e);
			}
			e.exit_code().into()
		},
	});
}

fn report(line: usize, e: &tagscan_base::Error) {
	warn!(line, error = %e, "malformed tag string");
	eprintln!("line {}: {}", line, e);
}

fn run_parse(args: ParseArgs) -> Result<(), RunError> {
	let stdin;
	let stdout;

	let mut stdin_lock;
	let mut stdout_lock;

	let mut input_file;
	let mut output_file;

	// Set output io objects
	let output: &mut dyn io::Write = match &*args.output_file {
		"-" => {
			stdout = io::stdout();
			stdout_lock = stdout.lock();
			&mut stdout_lock
		},
		path => {
			output_file = fs::File::create(path)?;
			&mut output_file
		},
	};
	let mut output = BufWriter::new(output);

	let input: IoObject<'_> = match &*args.input_file {
		"-" => {
			stdin = io::stdin();
			stdin_lock = stdin.lock();
			&mut stdin_lock
		},
		path => {
			input_file = BufReader::new(fs::File::open(path)?);
			&mut input_file
		},
	};

	let result = parse_lines(input, &mut output, args.format, args.keep_going);
	output.flush()?;
	result
}

fn run_check(args: CheckArgs) -> Result<(), RunError> {
	let stdin;
	let mut stdin_lock;
	let mut input_file;

	let input: IoObject<'_> = match &*args.input_file {
		"-" => {
			stdin = io::stdin();
			stdin_lock = stdin.lock();
			&mut stdin_lock
		},
		path => {
			input_file = BufReader::new(fs::File::open(path)?);
			&mut input_file
		},
	};

	check_lines(input)
}

/// Writes every line's parameters in `format`. Malformed lines stop the run, unless
/// `keep_going` is set, in which case they're counted and skipped.
fn parse_lines(input: IoObject<'_>, output: &mut dyn io::Write, format: OutputFormat,
	keep_going: bool) -> Result<(), RunError> {
	let mut failed = 0usize;
	support::for_each_tag(input, |line, result| {
		match result {
			Ok(params) => format.write(output, &params)?,
			Err(source) => {
				report(line, &source);
				if !keep_going {
					return Err(RunError::Tag { line, source });
				}
				failed += 1;
			},
		}
		Ok::<_, RunError>(())
	})?;

	match failed {
		0 => Ok(()),
		failed => Err(RunError::Malformed { failed }),
	}
}

fn check_lines(input: IoObject<'_>) -> Result<(), RunError> {
	let mut failed = 0usize;
	support::for_each_tag(input, |line, result| {
		if let Err(e) = result {
			report(line, &e);
			failed += 1;
		}
		Ok::<_, RunError>(())
	})?;

	match failed {
		0 => Ok(()),
		failed => Err(RunError::Malformed { failed }),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	static MIXED: &str = "key1=a\nkey1 key2\n\n=x,\nkey2";

	fn run_parse_lines(src: &str, keep_going: bool) -> (Result<(), RunError>, String) {
		let mut input = io::Cursor::new(src);
		let mut out = Vec::new();
		let result = parse_lines(&mut input, &mut out, OutputFormat::Canonical, keep_going);
		(result, String::from_utf8(out).unwrap())
	}

	#[test]
	fn keep_going_skips_bad_lines() {
		let (result, out) = run_parse_lines(MIXED, true);
		assert_eq!("key1=a\n\nkey2\n", out);
		assert!(matches!(result, Err(RunError::Malformed { failed: 2 })), "{:?}", result);
	}

	#[test]
	fn stops_at_first_bad_line() {
		let (result, out) = run_parse_lines(MIXED, false);
		assert_eq!("key1=a\n", out);
		match result {
			Err(RunError::Tag { line, source }) => {
				assert_eq!(2, line);
				assert_eq!(tagscan_base::Error::DuplicateKey {
					key: "key1".to_owned(),
					extra: "key2".to_owned(),
				}, source);
			},
			other => panic!("expected a tag error, got {:?}", other),
		}
	}

	#[test]
	fn all_good_lines() {
		let (result, out) = run_parse_lines("a=1 2\nb", false);
		assert!(result.is_ok());
		assert_eq!("a=1 2\nb\n", out);
	}

	#[test]
	fn check_counts_every_bad_line() {
		let result = check_lines(&mut io::Cursor::new(MIXED));
		assert!(matches!(result, Err(RunError::Malformed { failed: 2 })), "{:?}", result);
		assert!(check_lines(&mut io::Cursor::new("key1\nkey2=x y")).is_ok());
	}

	#[test]
	fn exit_codes() {
		assert_eq!(ExitCode::InvalidData, RunError::Malformed { failed: 1 }.exit_code());
		assert_eq!(ExitCode::InvalidData, RunError::Tag {
			line: 1,
			source: tagscan_base::Error::UnterminatedEscape,
		}.exit_code());
		let io_error = io::Error::new(io::ErrorKind::NotFound, "missing");
		assert_eq!(ExitCode::IoError, RunError::from(io_error).exit_code());
		assert_eq!(4, i32::from(ExitCode::InvalidData));
	}

	#[test]
	fn tag_errors_already_reported() {
		assert!(RunError::Tag { line: 1, source: tagscan_base::Error::UnterminatedEscape }
			.is_reported());
		assert!(!RunError::Malformed { failed: 1 }.is_reported());
	}
}
