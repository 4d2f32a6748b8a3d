//! `studio-availability` CLI — compute free room slots from JSON input.
//!
//! ## Usage
//!
//! ```sh
//! # Free slots for one room ({query, calendar, bookings} on stdin)
//! studio-availability slots < request.json
//!
//! # Same, from file to file, pretty-printed
//! studio-availability slots -i request.json -o slots.json --pretty
//!
//! # Would a booking from 19:00 to 21:00 fit?
//! studio-availability check -i request.json \
//!     --start 2026-03-18T18:00:00Z --end 2026-03-18T20:00:00Z
//!
//! # Every room of a studio, grouped by date ({studio, request, bookings})
//! studio-availability studio -i studio.json --min-size 50
//!
//! # Verbose logging (also STUDIO_AVAILABILITY_LOG or RUST_LOG)
//! studio-availability --log-level debug slots -i request.json
//! ```

mod telemetry;

use std::io::{self, Read};

use anyhow::{Context, Result};
use availability_engine::{
    compute_availability, find_conflicts, is_bookable, studio_availability_by_date, Booking,
    Conflict, Query, ResourceCalendar, Studio, StudioRequest, TimeInterval,
};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(
    name = "studio-availability",
    version,
    about = "Compute bookable free slots from operating rules and bookings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter directives, e.g. "debug" or "availability_engine=trace"
    #[arg(long, global = true, env = "STUDIO_AVAILABILITY_LOG")]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Free slots for a single resource
    Slots {
        /// Input file with {query, calendar, bookings} (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Check whether a candidate booking fits
    Check {
        /// Input file with {query, calendar, bookings} (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Candidate start (RFC 3339)
        #[arg(long)]
        start: DateTime<Utc>,
        /// Candidate end (RFC 3339)
        #[arg(long)]
        end: DateTime<Utc>,
    },
    /// Free slots for every room of a studio, grouped by local date
    Studio {
        /// Input file with {studio, request, bookings} (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Override the request's minimum room size
        #[arg(long)]
        min_size: Option<u32>,
        /// Override the request's minimum slot length in minutes
        #[arg(long)]
        min_minutes: Option<i64>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

/// Input document for `slots` and `check`.
#[derive(Deserialize)]
struct ResourceInput {
    query: Query,
    calendar: ResourceCalendar,
    #[serde(default)]
    bookings: Vec<Booking>,
}

/// Input document for `studio`.
#[derive(Deserialize)]
struct StudioInput {
    studio: Studio,
    request: StudioRequest,
    #[serde(default)]
    bookings: Vec<Booking>,
}

#[derive(Serialize)]
struct CheckReport {
    bookable: bool,
    conflicts: Vec<Conflict>,
}

fn main() -> Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    telemetry::init_tracing(cli.log_level.as_deref())?;

    match cli.command {
        Commands::Slots {
            input,
            output,
            pretty,
        } => {
            let doc: ResourceInput = read_json(input.as_deref())?;
            let slots = compute_availability(&doc.query, &doc.calendar, &doc.bookings)
                .context("Invalid availability request")?;
            tracing::info!(
                resource = %doc.query.resource_id,
                slots = slots.len(),
                "computed free slots"
            );
            write_output(output.as_deref(), &to_json(&slots, pretty)?)?;
        }
        Commands::Check { input, start, end } => {
            let doc: ResourceInput = read_json(input.as_deref())?;
            let candidate = TimeInterval::new(start, end).context("Invalid candidate interval")?;
            let bookable = is_bookable(&candidate, &doc.query, &doc.calendar, &doc.bookings)
                .context("Invalid availability request")?;
            let report = CheckReport {
                bookable,
                conflicts: find_conflicts(&candidate, &doc.query, &doc.bookings),
            };
            println!("{}", to_json(&report, true)?);
        }
        Commands::Studio {
            input,
            output,
            min_size,
            min_minutes,
            pretty,
        } => {
            let mut doc: StudioInput = read_json(input.as_deref())?;
            if let Some(size) = min_size {
                doc.request.min_size = size;
            }
            if let Some(minutes) = min_minutes {
                doc.request.min_slot_minutes = minutes;
            }
            let days = studio_availability_by_date(&doc.studio, &doc.request, &doc.bookings)
                .with_context(|| {
                    format!("Invalid availability request for studio '{}'", doc.studio.name)
                })?;
            write_output(output.as_deref(), &to_json(&days, pretty)?)?;
        }
    }

    Ok(())
}

fn read_json<T: for<'de> Deserialize<'de>>(path: Option<&str>) -> Result<T> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).context("Failed to parse input JSON")
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
