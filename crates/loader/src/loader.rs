//! Bulk loader for skein fact files.
//!
//! A fact file is a plain-text file with the `.sku` extension holding one
//! triple per line:
//!
//! ```text
//! ("Hypertension", "treated_by", "ACE Inhibitor")
//! ("Hypertension", "treated_by", "Diuretic")
//! ```
//!
//! [`load_directory`] scans a directory for `.sku` files and feeds every
//! well-formed line into a [`FactGraph`]. Load problems never abort the
//! process: malformed lines and unreadable files are logged and skipped,
//! and a missing directory skips the import entirely.
//!
//! The line grammar is deliberately narrow: a parenthesized tuple of
//! exactly three quoted strings, nothing else. Lines are parsed with a
//! purpose-built scanner rather than a general literal evaluator, so a
//! fact file cannot smuggle in anything but string triples.

use skein::{Fact, FactGraph};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("expected '{0}'")]
    Expected(char),
    #[error("expected a quoted string")]
    ExpectedString,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unsupported escape sequence '\\{0}'")]
    BadEscape(char),
    #[error("trailing input after closing ')'")]
    TrailingInput,
    #[error("empty {0} field")]
    EmptyField(&'static str),
}

pub type Result<T> = std::result::Result<T, ParseError>;

// ---------------------------------------------------------------------------
// Tuple-line parsing
// ---------------------------------------------------------------------------

/// Parse one fact line: `("subject", "relation", "object")`.
///
/// Fields may use double or single quotes; `\"`, `\'` and `\\` escapes are
/// recognized inside them. All three fields must be non-empty. Anything
/// else (wrong arity, unquoted fields, text after the closing paren) is
/// rejected, and the caller decides whether that skips the line or the
/// whole input.
pub fn parse_fact_line(line: &str) -> Result<Fact> {
    let mut scanner = Scanner::new(line);
    scanner.skip_ws();
    scanner.expect('(')?;
    let subject = scanner.quoted_string()?;
    scanner.skip_ws();
    scanner.expect(',')?;
    let relation = scanner.quoted_string()?;
    scanner.skip_ws();
    scanner.expect(',')?;
    let object = scanner.quoted_string()?;
    scanner.skip_ws();
    scanner.expect(')')?;
    scanner.skip_ws();
    if !scanner.at_end() {
        return Err(ParseError::TrailingInput);
    }

    for (name, field) in [
        ("subject", &subject),
        ("relation", &relation),
        ("object", &object),
    ] {
        if field.is_empty() {
            return Err(ParseError::EmptyField(name));
        }
    }

    Ok(Fact::new(subject, relation, object))
}

struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    fn skip_ws(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn expect(&mut self, want: char) -> Result<()> {
        match self.chars.next() {
            Some(c) if c == want => Ok(()),
            _ => Err(ParseError::Expected(want)),
        }
    }

    fn quoted_string(&mut self) -> Result<String> {
        self.skip_ws();
        let quote = match self.chars.next() {
            Some(c @ ('"' | '\'')) => c,
            _ => return Err(ParseError::ExpectedString),
        };
        let mut out = String::new();
        loop {
            match self.chars.next() {
                None => return Err(ParseError::UnterminatedString),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.chars.next() {
                    Some(e @ ('"' | '\'' | '\\')) => out.push(e),
                    Some(e) => return Err(ParseError::BadEscape(e)),
                    None => return Err(ParseError::UnterminatedString),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }
}

// ---------------------------------------------------------------------------
// Directory loading
// ---------------------------------------------------------------------------

/// Counters for one load pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Fact files read (files that opened, whatever their contents).
    pub files: usize,
    /// Facts added to the graph.
    pub facts: usize,
    /// Non-blank lines rejected by the parser.
    pub skipped: usize,
}

/// Load every `.sku` file under `dir` into `graph`.
///
/// Files are visited in name order so a reload of the same directory
/// produces the same insertion order. Entries that are not regular files
/// with a `.sku` extension (case-insensitive) are ignored. A directory
/// that cannot be read at all logs a warning and loads nothing.
pub fn load_directory(graph: &mut FactGraph, dir: &Path) -> LoadStats {
    let mut stats = LoadStats::default();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(dir = %dir.display(), %err, "fact directory unreadable, skipping import");
            return stats;
        }
    };

    // read_dir order is platform-dependent; sort for a stable load order.
    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_sku_file(path))
        .collect();
    paths.sort();

    for path in paths {
        load_file(graph, &path, &mut stats);
    }

    debug!(
        files = stats.files,
        facts = stats.facts,
        skipped = stats.skipped,
        "fact import finished"
    );
    stats
}

fn is_sku_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("sku"))
}

fn load_file(graph: &mut FactGraph, path: &Path, stats: &mut LoadStats) {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            warn!(file = %path.display(), %err, "could not open fact file, skipping");
            return;
        }
    };
    stats.files += 1;

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!(file = %path.display(), %err, "read error, abandoning rest of file");
                return;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match parse_fact_line(trimmed) {
            Ok(Fact {
                subject,
                relation,
                object,
            }) => {
                graph.add_fact(subject, relation, object);
                stats.facts += 1;
            }
            Err(err) => {
                warn!(
                    file = %path.display(),
                    line = index + 1,
                    %err,
                    "skipping malformed fact line"
                );
                stats.skipped += 1;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
