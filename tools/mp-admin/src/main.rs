//! MP-Admin: Merkle-Points command line tool
//!
//! Reports are printed to stdout as JSON; logs go to stderr.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mp_admin::{build, decode_record, hash_address, hash_point, validate, BuildRequest};
use point_telemetry::{init_telemetry, TelemetryConfig};
use serde::Serialize;
use shared_types::{parse_hash, Hash};

/// MP-Admin: build, decode and validate Merkle-Points update records
#[derive(Parser, Debug)]
#[command(name = "mp-admin")]
#[command(about = "Off-chain tooling for Merkle-Points update records")]
struct Args {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan changes against the account mirror and build an update record
    Build {
        /// JSON account mirror (`[{"address": "..", "point": n}]`)
        #[arg(long)]
        state: Option<PathBuf>,

        /// JSON target balances, same shape as the mirror
        #[arg(long)]
        changes: PathBuf,

        /// No ledger record exists yet
        #[arg(long, conflicts_with = "prior")]
        genesis: bool,

        /// Current ledger root, defaults to the mirror's root
        #[arg(long, value_parser = parse_hash)]
        prior: Option<Hash>,

        /// Write the advanced mirror back to --state
        #[arg(long, requires = "state")]
        write_state: bool,

        /// Upper bound on accounts per record
        #[arg(long)]
        max_accounts: Option<usize>,
    },

    /// Decode record bytes into JSON
    Decode {
        /// Encoded record as hex
        record: String,
    },

    /// Run the state validator and exit with its outcome code
    Validate {
        /// Encoded record as hex
        #[arg(long)]
        record: String,

        /// Output record data (new commitment) as hex
        #[arg(long)]
        output: String,

        /// Input record data (old commitment) as hex; omit for a creation
        #[arg(long)]
        input: Option<String>,
    },

    /// Print the tree key of an address
    HashAddress { address: String },

    /// Print the leaf value of a point balance
    HashPoint { point: u32 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = TelemetryConfig::for_service("mp-admin");
    if args.json_logs {
        config = config.with_json_logs(true);
    }
    let guard = init_telemetry(config)?;

    let exit_code = run(args.command).await?;
    if exit_code != 0 {
        drop(guard);
        std::process::exit(exit_code);
    }
    Ok(())
}

async fn run(command: Command) -> Result<i32> {
    match command {
        Command::Build {
            state,
            changes,
            genesis,
            prior,
            write_state,
            max_accounts,
        } => {
            let request = BuildRequest {
                state: state.as_deref(),
                genesis,
                prior,
                write_state,
                max_accounts,
                ..BuildRequest::new(&changes)
            };
            print_json(&build(&request).await?)?;
        }
        Command::Decode { record } => print_json(&decode_record(&record)?)?,
        Command::Validate {
            record,
            output,
            input,
        } => {
            let report = validate(&record, &output, input.as_deref())?;
            print_json(&report)?;
            return Ok(report.exit_code);
        }
        Command::HashAddress { address } => print_json(&hash_address(&address)?)?,
        Command::HashPoint { point } => print_json(&hash_point(point))?,
    }
    Ok(0)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
