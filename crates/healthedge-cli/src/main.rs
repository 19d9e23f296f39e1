//! HealthEdge CLI - create, canonicalize and verify monitoring events.

use clap::{Parser, Subcommand};

mod commands;
mod input;
mod logging;
mod output;

use commands::{canonicalize, create, digest, verify};
use healthedge_event::EventClassification;

#[derive(Parser)]
#[command(name = "healthedge")]
#[command(about = "HealthEdge event creation and integrity verification CLI")]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. `info`, `healthedge=debug`)
    #[arg(long, global = true, env = "HEALTHEDGE_LOG", default_value = "warn")]
    log_level: String,
    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "HEALTHEDGE_LOG_JSON")]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an event and print its external form
    Create {
        /// Event kind: MEASUREMENT or ALERT
        #[arg(long, value_parser = parse_classification)]
        classification: EventClassification,
        /// Payload as a JSON object (default: {})
        #[arg(long)]
        payload: Option<String>,
        /// Priority (default: 1)
        #[arg(long, allow_negative_numbers = true)]
        priority: Option<i128>,
        /// Explicit UUID (default: random v4)
        #[arg(long)]
        identifier: Option<String>,
        /// Explicit ISO-8601 timestamp with timezone (default: now, UTC)
        #[arg(long)]
        timestamp: Option<String>,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Show canonical bytes for input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Compute the SHA-256 digest of the canonical bytes of input JSON
    Digest {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Verify the integrity hash of one or more events
    Verify {
        /// Input file holding an event, an array of events or one event per line (or stdin)
        input: Option<String>,
        /// Exit with error code if any event is invalid or mismatched
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_classification(value: &str) -> Result<EventClassification, String> {
    value
        .to_ascii_uppercase()
        .parse()
        .map_err(|e: healthedge_event::EventError| e.to_string())
}

fn main() {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_json);

    let result = match cli.command {
        Commands::Create {
            classification,
            payload,
            priority,
            identifier,
            timestamp,
            pretty,
        } => create::run(create::CreateArgs {
            classification,
            payload,
            priority,
            identifier,
            timestamp,
            pretty,
        }),
        Commands::Canonicalize { input } => canonicalize::run(input),
        Commands::Digest { input } => digest::run(input),
        Commands::Verify {
            input,
            strict,
            json,
        } => verify::run(input, strict, json),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
