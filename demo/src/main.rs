//! EcoLedger — Tamper-evident Activity Ledger Demo CLI
//!
//! Runs one or all of the four demo scenarios. Each scenario uses real
//! EcoLedger components (activity catalog, chain builder, chain store,
//! verifier, audit recorder) wired together in memory.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- record
//!   cargo run -p demo -- tamper
//!   cargo run -p demo -- concurrent
//!   cargo run -p demo -- audit

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ecoledger_contracts::LedgerResult;

mod scenarios;

// ── CLI definition ────────────────────────────────────────────────────────────

/// EcoLedger — per-owner hash-linked activity ledger demo.
///
/// Each subcommand runs one or all of the demo scenarios, exercising chain
/// construction, verification, optimistic concurrency, and the decoupled
/// audit trail.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "EcoLedger tamper-evident ledger demo",
    long_about = "Runs EcoLedger demo scenarios showing hash-chain appends,\n\
                  tamper detection, concurrent append conflicts, and the\n\
                  actor-partitioned audit trail."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four scenarios in sequence.
    RunAll,
    /// Scenario 1: record activities for two owners and verify both chains.
    Record,
    /// Scenario 2: retroactively edit a stored record and watch verification fail.
    Tamper,
    /// Scenario 3: two concurrent appends — one success, one ChainConflict.
    Concurrent,
    /// Scenario 4: scan an actor's audit partition, most recent first.
    Audit,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::Record => scenarios::record_and_verify(),
        Command::Tamper => scenarios::tamper_detection(),
        Command::Concurrent => scenarios::concurrent_append(),
        Command::Audit => scenarios::audit_trail(),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all() -> LedgerResult<()> {
    scenarios::record_and_verify()?;
    scenarios::tamper_detection()?;
    scenarios::concurrent_append()?;
    scenarios::audit_trail()?;
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("EcoLedger — Tamper-evident Activity Ledger");
    println!("==========================================");
    println!();
    println!("Every recorded activity is appended to its owner's SHA-256");
    println!("hash-linked chain; every security-relevant action lands in an");
    println!("independent, append-only, actor-partitioned audit trail.");
    println!();
}
