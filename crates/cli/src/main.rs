//! skein — knowledge graph query CLI.
//!
//! Loads every `.sku` fact file under a directory into an in-memory
//! [`FactGraph`], prints the loaded facts as startup diagnostics, then
//! either answers a single query given on the command line or drops into
//! an interactive JSON query loop.
//!
//! One-shot queries:
//!
//! ```text
//! skein --facts-dir ./SKUs --subject Hypertension --relation treated_by
//! skein --facts-dir ./SKUs --object "ACE Inhibitor" --relation treated_by
//! ```
//!
//! Without a query on the command line, the process reads one JSON query
//! per line from stdin (`quit` or `exit` ends the loop).

use anyhow::Result;
use clap::Parser;
use serde_json::{json, Value as JsonValue};
use skein::FactGraph;
use skein_loader::load_directory;
use skein_query::process_query;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Knowledge graph query system.
#[derive(Parser)]
#[command(name = "skein")]
#[command(version)]
#[command(about = "Load fact files and answer forward/reverse relation queries")]
struct Cli {
    /// Directory containing .sku fact files
    #[arg(long, default_value = "SKUs")]
    facts_dir: PathBuf,

    /// Subject for a one-shot forward query (requires --relation)
    #[arg(long, conflicts_with = "object")]
    subject: Option<String>,

    /// Object for a one-shot reverse query (requires --relation)
    #[arg(long)]
    object: Option<String>,

    /// Relation label for either query direction
    #[arg(long)]
    relation: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // One explicitly owned store instance, handed by reference to the
    // loader and the query paths.
    let mut graph = FactGraph::new();
    let stats = load_directory(&mut graph, &cli.facts_dir);
    info!(
        files = stats.files,
        facts = stats.facts,
        skipped = stats.skipped,
        "startup load complete"
    );

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    writeln!(writer, "Loaded Knowledge Graph Facts:")?;
    for fact in graph.facts() {
        writeln!(writer, " - {fact}")?;
    }

    if let Some(response) = one_shot_response(&graph, &cli) {
        writeln!(writer, "{response}")?;
        return Ok(());
    }
    drop(writer);

    interactive_loop(&graph)
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Answer a query given entirely on the command line, echoing the query
/// alongside its results. `None` when the flags don't amount to one
/// (a node flag and `--relation` are both needed).
fn one_shot_response(graph: &FactGraph, cli: &Cli) -> Option<JsonValue> {
    let relation = cli.relation.as_deref()?;

    if let Some(subject) = cli.subject.as_deref() {
        return Some(json!({
            "queryType": "retrieve_fact",
            "subject": subject,
            "relation": relation,
            "response": graph.objects_of(subject, relation),
        }));
    }
    if let Some(object) = cli.object.as_deref() {
        return Some(json!({
            "queryType": "retrieve_fact_reverse",
            "object": object,
            "relation": relation,
            "response": graph.subjects_of(object, relation),
        }));
    }
    None
}

fn interactive_loop(graph: &FactGraph) -> Result<()> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    writeln!(writer)?;
    writeln!(
        writer,
        "Ready to process JSON queries. Enter a JSON-formatted query, or type 'quit' to exit."
    )?;

    loop {
        write!(writer, "Enter your JSON query: ")?;
        writer.flush()?;

        let mut line = String::new();
        let n = reader.read_line(&mut line)?;
        if n == 0 {
            break;
        }
        let input = line.trim();
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            break;
        }

        // Everything else goes through the adapter; bad input comes back
        // as an error payload, never as a process failure.
        let response = process_query(graph, input);
        writeln!(writer, "Output: {response}")?;
    }

    Ok(())
}
