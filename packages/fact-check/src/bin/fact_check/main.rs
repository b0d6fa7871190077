//! Verify statements from the command line.
//!
//! ```text
//! fact-check "Stanford University was founded in 1885"
//! cat statements.txt | fact-check --json --concurrency 8
//! ```

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::BufRead;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fact_check::{Verdict, VerdictStatus, Verifier};

#[derive(Parser)]
#[command(name = "fact-check")]
#[command(about = "Verify factual statements against multiple evidence sources")]
struct Cli {
    /// Statement to verify. Reads one statement per line from stdin when omitted.
    statement: Vec<String>,

    /// Context the statement appeared in (page title, surrounding text)
    #[arg(short, long, default_value = "")]
    context: String,

    /// Print one JSON object per statement
    #[arg(long)]
    json: bool,

    /// Statements verified at once when reading stdin
    #[arg(long, default_value_t = 4)]
    concurrency: usize,
}

#[derive(Serialize)]
struct Report<'a> {
    statement: &'a str,
    status: VerdictStatus,
    #[serde(flatten)]
    verdict: &'a Verdict,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fact_check=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = config::load().context("Failed to load configuration")?;
    let verifier = Verifier::from_config(config).context("Failed to build verifier")?;

    let statements = if cli.statement.is_empty() {
        read_stdin()?
    } else {
        vec![cli.statement.join(" ")]
    };
    anyhow::ensure!(!statements.is_empty(), "no statements to verify");

    let items: Vec<(&str, &str)> = statements
        .iter()
        .map(|s| (s.as_str(), cli.context.as_str()))
        .collect();
    let verdicts = verifier.verify_batch(&items, cli.concurrency).await;

    for (statement, verdict) in statements.iter().zip(&verdicts) {
        if cli.json {
            let report = Report {
                statement,
                status: verdict.status(),
                verdict,
            };
            println!("{}", serde_json::to_string(&report)?);
        } else {
            print_verdict(statement, verdict);
        }
    }

    Ok(())
}

fn read_stdin() -> Result<Vec<String>> {
    let mut statements = Vec::new();
    for line in std::io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        let line = line.trim();
        if !line.is_empty() {
            statements.push(line.to_string());
        }
    }
    Ok(statements)
}

fn print_verdict(statement: &str, verdict: &Verdict) {
    println!("{}", statement);
    println!(
        "  {} (confidence {:.2})",
        verdict.status().label(),
        verdict.confidence
    );
    if !verdict.explanation.is_empty() {
        println!("  {}", verdict.explanation);
    }
    for issue in &verdict.issues {
        println!("  ! {}", issue);
    }
    for suggestion in &verdict.suggestions {
        println!("  > {}", suggestion);
    }
    for link in &verdict.source_links {
        println!("  - {} <{}>", link.source, link.url);
    }
    println!();
}
