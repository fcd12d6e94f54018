//! memokey - print canonical cache keys for JSON documents.
//!
//! Reads one JSON document per line from stdin and prints the key a
//! memoization cache would index it by.

use std::io::{self, BufRead, Write};

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use memokey::{KeyType, Value};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Debug, Parser)]
#[command(name = "memokey", version, about = "Print canonical cache keys for JSON documents")]
struct Cli {
    /// Only accept documents of this runtime type (string, number, boolean, object, undefined).
    /// Without it every document is printed.
    #[arg(long = "type", env = "MEMOKEY_DEFAULT_KEY_TYPE")]
    key_type: Option<KeyType>,
}

/// What happened to one input line.
#[derive(Debug, PartialEq)]
enum LineOutcome<'a> {
    /// The canonical key, borrowed from the caller's buffer.
    Key(&'a str),
    Blank,
    Malformed(String),
    WrongType { found: KeyType, expected: KeyType },
}

/// Parse `line` as JSON and write its canonical key into `buf`.
fn canonical_line<'a>(
    line: &str,
    expected: Option<KeyType>,
    buf: &'a mut String,
) -> LineOutcome<'a> {
    if line.trim().is_empty() {
        return LineOutcome::Blank;
    }

    let json: serde_json::Value = match serde_json::from_str(line) {
        Ok(json) => json,
        Err(e) => return LineOutcome::Malformed(e.to_string()),
    };
    let value = Value::from(json);

    if let Some(expected) = expected {
        let found = value.key_type();
        if found != expected {
            return LineOutcome::WrongType { found, expected };
        }
    }

    buf.clear();
    memokey::write_canonical(&value, buf);
    LineOutcome::Key(buf)
}

fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("memokey=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.key_type {
        Some(key_type) => info!("Accepting {} keys", key_type),
        None => info!("Accepting keys of any type"),
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut buf = String::new();

    for (line_no, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        match canonical_line(&line, cli.key_type, &mut buf) {
            LineOutcome::Key(key) => {
                debug!("Line {} -> {} bytes", line_no + 1, key.len());
                writeln!(out, "{key}")?;
            }
            LineOutcome::Blank => {}
            LineOutcome::Malformed(e) => warn!("Skipping line {}: {}", line_no + 1, e),
            LineOutcome::WrongType { found, expected } => {
                warn!("Skipping line {}: {} key, expected {}", line_no + 1, found, expected);
            }
        }
    }

    out.flush()?;
    Ok(())
}
