//! `pbconf-validate`: validates configuration and policy requests.
//!
//! Reads requests from a file (or stdin), one per line or as a JSON array,
//! and runs each through the validation engine in order. Accepted requests
//! change the knowledge base for the requests that follow.
//!
//! **Usage:**
//! ```
//! pbconf-validate [<input>] [--config <path>] [--test-mode] [--dump]
//! ```
//!
//! Exits non-zero if any request is rejected.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::io::Read;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use pbconf_ontology::serializer::json::snapshot_to_json;
use pbconf_ontology::{KnowledgeBase, MemoryKnowledgeBase, Scope};
use pbconf_validator::{EngineConfig, PolicyEngine, Request, ValidationReport};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Validate PBConf configuration and policy requests.
#[derive(Parser)]
#[command(
    name = "pbconf-validate",
    about = "Validate PBConf configuration and policy requests"
)]
struct Args {
    /// Request file; reads stdin when omitted.
    input: Option<PathBuf>,

    /// Engine configuration (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Store and evaluate closed-world rules under the test namespace.
    #[arg(long)]
    test_mode: bool,

    /// Print the knowledge base as JSON after the run.
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    config.test_mode |= args.test_mode;

    let text = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            text
        }
    };
    let requests = parse_requests(&text)?;
    info!(requests = requests.len(), "validating requests");

    let engine = PolicyEngine::new(MemoryKnowledgeBase::bootstrap(), config);
    let mut report = ValidationReport::new();
    for (label, request) in requests {
        if matches!(request, Request::Exit) {
            break;
        }
        report.push(label, engine.handle(&request)?);
    }

    println!("PBConf Validation Report");
    println!("========================");
    println!();
    for result in &report.results {
        let outcome = &result.outcome;
        if outcome.is_valid() {
            println!("[PASS] {}", result.label);
        } else {
            println!("[FAIL] {}: {}", result.label, outcome.status);
            for line in outcome.explanation.lines() {
                println!("       {line}");
            }
        }
    }

    let failed = report.failure_count();
    println!();
    println!(
        "Summary: {} passed, {} failed",
        report.results.len() - failed,
        failed
    );

    if args.dump {
        let scopes = engine.with_knowledge_base(|kb| {
            Scope::ALL
                .iter()
                .map(|scope| kb.snapshot(*scope).map(|s| snapshot_to_json(&s)))
                .collect::<Result<Vec<Value>, _>>()
        })??;
        println!("{}", serde_json::to_string_pretty(&scopes)?);
    }

    if !report.all_passed() {
        eprintln!("Validation FAILED: {failed} request(s) rejected.");
        process::exit(1);
    }

    println!("Validation PASSED.");
    Ok(())
}

/// Splits the input into labelled requests.
///
/// A JSON array holds one request per element (documents, or command strings
/// like `"validate"`); anything else is read one request per non-empty line.
fn parse_requests(text: &str) -> Result<Vec<(String, Request)>> {
    if text.trim_start().starts_with('[') {
        let items: Vec<Value> = serde_json::from_str(text).context("Malformed request array")?;
        return Ok(items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let request = match item {
                    Value::String(command) => Request::parse(&command),
                    document => Request::from_document(document),
                };
                (format!("request {}", i + 1), request)
            })
            .collect());
    }
    Ok(text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (format!("line {}", i + 1), Request::parse(line)))
        .collect())
}
