//! Command-line interface for the coverage reporter.
//!
//! Hand-rolled (no clap dependency) to keep the binary small and boot fast.
//!
//! # Grammar
//!
//! ```text
//! framecov-rs report [--radius <0..=64>] [--format jsonl|text] <file>...
//! framecov-rs --help | -h
//! ```
//!
//! Session files ending in `.json` are parsed as [`SessionRecord`]s; any
//! other file is read as plain text, one hex fingerprint per line, and the
//! path ID is derived from the content. The radius comes from `--radius`,
//! falling back to the `FRAMECOV_RADIUS` environment variable, falling back
//! to 5. The core only ever receives the resolved value through its
//! constructor.

use std::env;
use std::error::Error;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::index::{CoverageTracker, MAX_RADIUS};
use crate::report::{
    encode_session, encode_summary, render_session_text, render_summary_text, SessionEvent,
    SummaryEvent,
};
use crate::session::{parse_fingerprint_lines, BadFingerprintLine, SessionRecord};

/// Radius used when neither the flag nor the environment provides one.
pub const DEFAULT_RADIUS: u8 = 5;

/// Environment variable consulted when `--radius` is absent.
pub const RADIUS_ENV: &str = "FRAMECOV_RADIUS";

/// Output format for coverage events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    /// One JSON object per line.
    Jsonl,
    /// Human-readable lines.
    Text,
}

/// Resolved configuration for a `report` run.
pub struct ReportConfig {
    pub radius: u8,
    pub format: ReportFormat,
    pub inputs: Vec<PathBuf>,
}

/// Parse `std::env::args_os()` into a [`ReportConfig`].
///
/// Exits the process with code 2 on invalid arguments, printing a
/// diagnostic and usage summary to stderr.
pub fn parse_args() -> ReportConfig {
    let mut args = env::args_os();
    let exe = args.next().unwrap_or_else(|| "framecov-rs".into());

    let first = match args.next() {
        Some(arg) => arg,
        None => {
            print_usage(&exe);
            std::process::exit(2);
        }
    };

    match first.to_string_lossy().as_ref() {
        "--help" | "-h" => {
            print_usage(&exe);
            std::process::exit(0);
        }
        "report" => {}
        other => {
            eprintln!("error: expected 'report' subcommand, got '{other}'");
            eprintln!();
            print_usage(&exe);
            std::process::exit(2);
        }
    }

    let mut radius_flag: Option<u8> = None;
    let mut format = ReportFormat::Jsonl;
    let mut inputs = Vec::new();

    while let Some(arg) = args.next() {
        let Some(flag) = arg.to_str() else {
            inputs.push(PathBuf::from(arg));
            continue;
        };
        match flag {
            "--help" | "-h" => {
                print_usage(&exe);
                std::process::exit(0);
            }
            "--radius" => {
                let value = args
                    .next()
                    .unwrap_or_else(|| usage_error(&exe, "--radius requires a value"));
                radius_flag = Some(parse_radius(&exe, &value.to_string_lossy()));
            }
            _ if flag.starts_with("--radius=") => {
                radius_flag = Some(parse_radius(&exe, &flag["--radius=".len()..]));
            }
            "--format" => {
                let value = args
                    .next()
                    .unwrap_or_else(|| usage_error(&exe, "--format requires a value"));
                format = parse_format(&exe, &value.to_string_lossy());
            }
            _ if flag.starts_with("--format=") => {
                format = parse_format(&exe, &flag["--format=".len()..]);
            }
            _ if flag.starts_with("--") => {
                usage_error(&exe, &format!("unknown flag '{flag}'"));
            }
            _ => inputs.push(PathBuf::from(flag)),
        }
    }

    if inputs.is_empty() {
        usage_error(&exe, "at least one session file is required");
    }

    let radius = radius_flag.or_else(env_radius).unwrap_or(DEFAULT_RADIUS);

    ReportConfig {
        radius,
        format,
        inputs,
    }
}

/// Radius from `FRAMECOV_RADIUS`, if set.
///
/// An unparseable or out-of-range value is a configuration error and exits
/// with code 2; silently ignoring it would change the metric under the
/// caller's feet.
fn env_radius() -> Option<u8> {
    let raw = env::var(RADIUS_ENV).ok()?;
    match raw.parse::<u8>() {
        Ok(radius) if radius <= MAX_RADIUS => Some(radius),
        _ => {
            eprintln!("error: {RADIUS_ENV}={raw:?} is not a radius in 0..=64");
            std::process::exit(2);
        }
    }
}

fn parse_radius(exe: &OsStr, value: &str) -> u8 {
    match value.parse::<u8>() {
        Ok(radius) if radius <= MAX_RADIUS => radius,
        _ => usage_error(exe, &format!("--radius must be in 0..=64, got '{value}'")),
    }
}

fn parse_format(exe: &OsStr, value: &str) -> ReportFormat {
    match value {
        "jsonl" => ReportFormat::Jsonl,
        "text" => ReportFormat::Text,
        _ => usage_error(exe, &format!("--format must be jsonl or text, got '{value}'")),
    }
}

fn usage_error(exe: &OsStr, message: &str) -> ! {
    eprintln!("error: {message}");
    eprintln!();
    print_usage(exe);
    std::process::exit(2);
}

fn print_usage(exe: &OsStr) {
    let exe = Path::new(exe)
        .file_name()
        .unwrap_or_else(|| OsStr::new("framecov-rs"))
        .to_string_lossy();
    eprintln!("usage: {exe} report [--radius <0..=64>] [--format jsonl|text] <file>...");
    eprintln!();
    eprintln!("Session files:");
    eprintln!("  *.json      SessionRecord: {{\"path_id\":\"...\",\"fingerprints\":[...]}}");
    eprintln!("  everything  plain text, one hex fingerprint per line; the path ID");
    eprintln!("  else        is derived from the deduplicated content");
    eprintln!();
    eprintln!("The radius defaults to ${RADIUS_ENV}, then {DEFAULT_RADIUS}.");
}

/// Errors loading a single session file.
#[derive(Debug)]
#[non_exhaustive]
pub enum LoadError {
    /// I/O error reading the file.
    Io(io::Error),
    /// A `.json` session file failed to deserialize.
    Json(serde_json::Error),
    /// A text session file contained an invalid fingerprint line.
    BadFingerprint(BadFingerprintLine),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Json(err) => write!(f, "invalid session JSON: {err}"),
            Self::BadFingerprint(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::BadFingerprint(err) => Some(err),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<BadFingerprintLine> for LoadError {
    fn from(err: BadFingerprintLine) -> Self {
        Self::BadFingerprint(err)
    }
}

/// Loads one session file.
///
/// `.json` files must already be [`SessionRecord`]s; any other file is
/// parsed as a plain-text fingerprint trace, greedily deduplicated at
/// `radius`, with the path ID derived from the kept set.
pub fn load_session(path: &Path, radius: u8) -> Result<SessionRecord, LoadError> {
    let source = fs::read_to_string(path)?;
    if path.extension() == Some(OsStr::new("json")) {
        Ok(serde_json::from_str(&source)?)
    } else {
        let trace = parse_fingerprint_lines(&source)?;
        Ok(SessionRecord::from_trace(&trace, radius))
    }
}

/// Runs a `report` invocation: ingest every input, emit one event per
/// session and a final summary on stdout.
///
/// Load failures print a diagnostic naming the file and exit with code 1;
/// the tracker stays consistent at the last fully-ingested session, so
/// everything already printed remains valid.
pub fn run(config: &ReportConfig) -> io::Result<()> {
    let started = Instant::now();
    let mut tracker = CoverageTracker::new(config.radius);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut buf = Vec::with_capacity(256);

    let mut new_sessions = 0u64;
    for path in &config.inputs {
        let record = match load_session(path, config.radius) {
            Ok(record) => record,
            Err(err) => {
                eprintln!("error: {}: {err}", path.display());
                std::process::exit(1);
            }
        };

        let before = tracker.distinct_count();
        let new_session = record.ingest(&mut tracker);
        if new_session {
            new_sessions += 1;
        }

        let event = SessionEvent {
            path_id: &record.path_id,
            new_session,
            added: (tracker.distinct_count() - before) as u64,
            distinct: tracker.distinct_count() as u64,
            components: tracker.component_count() as u64,
        };
        buf.clear();
        match config.format {
            ReportFormat::Jsonl => encode_session(&event, &mut buf),
            ReportFormat::Text => {
                buf.extend_from_slice(render_session_text(&event).as_bytes());
                buf.push(b'\n');
            }
        }
        out.write_all(&buf)?;
    }

    let summary = SummaryEvent {
        sessions: config.inputs.len() as u64,
        new_sessions,
        distinct: tracker.distinct_count() as u64,
        components: tracker.component_count() as u64,
        radius: config.radius,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    buf.clear();
    match config.format {
        ReportFormat::Jsonl => encode_summary(&summary, &mut buf),
        ReportFormat::Text => {
            buf.extend_from_slice(render_summary_text(&summary).as_bytes());
            buf.push(b'\n');
        }
    }
    out.write_all(&buf)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_display_names_the_stage() {
        let io_err: LoadError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(io_err.to_string().contains("I/O"));

        let parse_err: LoadError = BadFingerprintLine {
            line: 3,
            content: "zzz".to_string(),
        }
        .into();
        assert!(parse_err.to_string().contains("line 3"));
    }

    #[test]
    fn load_error_preserves_sources() {
        let err: LoadError = io::Error::new(io::ErrorKind::Other, "disk").into();
        assert!(err.source().is_some());
    }
}
