//! Usher CLI entry point.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Duration, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use usher::{
    CacheSpace, Config, Coordinator, Interval, Outcome, RecordingWriter, SnapshotSource,
};

/// Book meeting rooms for upcoming calendar events.
#[derive(Parser, Debug)]
#[command(name = "usher")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Directory holding the exported calendar/directory snapshot
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Building in which to book rooms (e.g. 'tor-111')
    #[arg(short, long)]
    building: Option<String>,

    /// Preferred floor when no neighboring booking anchors an event
    #[arg(long)]
    floor: Option<i32>,

    /// Preferred section when no neighboring booking anchors an event
    #[arg(long)]
    section: Option<i32>,

    /// Process events for the next N hours
    #[arg(short, long)]
    next: Option<u64>,

    /// Calendar ID to operate on
    #[arg(long)]
    calendar: Option<String>,

    /// Don't actually change anything
    #[arg(long)]
    dry_run: bool,

    /// Output the report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    if let Some(building) = args.building {
        config.run.building = building;
    }
    if let Some(floor) = args.floor {
        config.preference.floor = Some(floor);
    }
    if let Some(section) = args.section {
        config.preference.section = Some(section);
    }
    if let Some(next) = args.next {
        config.run.look_ahead_hours = next;
    }
    if let Some(calendar) = args.calendar {
        config.run.calendar_id = calendar;
    }
    if args.dry_run {
        config.run.dry_run = true;
        tracing::info!("dry run");
    }
    if config.run.building.is_empty() {
        anyhow::bail!("a building query is required (--building or run.building)");
    }

    let cache = match config.cache_dir() {
        Some(dir) => CacheSpace::at(dir)?,
        None => CacheSpace::application("usher")?,
    };

    let start = Utc::now();
    let end = start + Duration::hours(config.run.look_ahead_hours as i64);
    tracing::info!(%start, %end, "processing window");

    let snapshot = Arc::new(SnapshotSource::open(&args.snapshot));
    let writer = Arc::new(RecordingWriter::new());
    let coordinator = Coordinator::new(
        config,
        snapshot.clone(),
        snapshot.clone(),
        snapshot,
        writer,
        cache,
    );

    let report = coordinator.run(Interval::new(start, end)).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for entry in &report.entries {
            let line = match &entry.outcome {
                Outcome::AlreadyBooked { room } => format!("already booked: {room}"),
                Outcome::Booked { room } => format!("booked: {room}"),
                Outcome::Unassigned => "no room found".to_string(),
            };
            println!("{}  {line}", entry.summary);
        }
        println!(
            "{} booked, {} left unassigned",
            report.booked(),
            report.unassigned()
        );
    }
    Ok(())
}
