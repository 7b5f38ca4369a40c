//! Fightcard CLI — pricing, roster checks, result checks and event scoring.
//!
//! Commands:
//! - `price` — generate the salary pool for an event from a catalog file
//! - `validate` — check a roster file against league rules and the lock deadline
//! - `check-outcomes` — parse a results batch and check it against the card
//! - `score` — score every roster of an event, print the leaderboard, save artifacts

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::debug;

use fightcard_core::catalog::{Catalog, InMemoryCatalog};
use fightcard_core::clock::{Clock, ManualClock, SystemClock};
use fightcard_core::domain::{Bout, Event, EventId, Roster};
use fightcard_core::fingerprint::outcomes_fingerprint;
use fightcard_core::ingest::{check_against_card, parse_batch};
use fightcard_core::lifecycle::RosterLifecycle;
use fightcard_core::pricing::price_breakdown;
use fightcard_core::store::SalaryBook;
use fightcard_runner::{save_artifacts, EventRunner, EventScoreboard, LeagueConfig};

#[derive(Parser)]
#[command(
    name = "fightcard",
    about = "Fightcard CLI — salary pricing, roster validation and scoring for fantasy fight leagues"
)]
struct Cli {
    /// League config TOML. Defaults to the built-in rule set.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the salary pool for an event.
    Price {
        /// Catalog JSON with competitors, events and bouts.
        #[arg(long)]
        catalog: PathBuf,

        /// Event id.
        #[arg(long)]
        event: String,

        /// Show every award that went into each salary.
        #[arg(long, default_value_t = false)]
        breakdown: bool,
    },
    /// Check a roster against league rules.
    Validate {
        #[arg(long)]
        catalog: PathBuf,

        /// Roster JSON.
        #[arg(long)]
        roster: PathBuf,

        /// Evaluate the deadline at this instant (RFC 3339) instead of now.
        #[arg(long)]
        now: Option<String>,
    },
    /// Parse a results batch and optionally check it against an event's card.
    CheckOutcomes {
        /// Results JSON: an array of records.
        #[arg(long)]
        outcomes: PathBuf,

        #[arg(long, requires = "event")]
        catalog: Option<PathBuf>,

        #[arg(long, requires = "catalog")]
        event: Option<String>,
    },
    /// Score every roster of an event.
    Score {
        #[arg(long)]
        catalog: PathBuf,

        #[arg(long)]
        event: String,

        /// Rosters JSON: an array of rosters.
        #[arg(long)]
        rosters: PathBuf,

        #[arg(long)]
        outcomes: PathBuf,

        /// Evaluate deadlines at this instant (RFC 3339) instead of now.
        #[arg(long)]
        now: Option<String>,

        /// Score rosters one at a time.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Output directory for scoreboard artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Write updated roster statuses back to the rosters file.
        #[arg(long, default_value_t = false)]
        write_rosters: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => LeagueConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => LeagueConfig::default(),
    };
    config.logging.init()?;
    debug!(rules = %config.rules_id(), "config loaded");

    match cli.command {
        Commands::Price {
            catalog,
            event,
            breakdown,
        } => run_price(&config, &catalog, &event, breakdown),
        Commands::Validate {
            catalog,
            roster,
            now,
        } => run_validate(&config, &catalog, &roster, now.as_deref()),
        Commands::CheckOutcomes {
            outcomes,
            catalog,
            event,
        } => run_check_outcomes(&outcomes, catalog.as_deref(), event.as_deref()),
        Commands::Score {
            catalog,
            event,
            rosters,
            outcomes,
            now,
            sequential,
            output_dir,
            write_rosters,
        } => run_score(
            &config,
            &catalog,
            &event,
            &rosters,
            &outcomes,
            now.as_deref(),
            sequential,
            &output_dir,
            write_rosters,
        ),
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("failed to parse {}", path.display()))
}

fn load_card(catalog_path: &Path, event_id: &str) -> Result<(InMemoryCatalog, Event, Vec<Bout>)> {
    let catalog = InMemoryCatalog::from_file(catalog_path)?;
    let event = catalog.require_event(&EventId::new(event_id))?;
    let bouts = catalog.bouts_for_event(&event.id);
    if bouts.is_empty() {
        bail!("event {event_id} has no bouts in {}", catalog_path.display());
    }
    Ok((catalog, event, bouts))
}

fn clock_at(now: Option<&str>) -> Result<Box<dyn Clock>> {
    match now {
        Some(raw) => {
            let at: DateTime<Utc> = DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("invalid --now instant '{raw}'"))?
                .with_timezone(&Utc);
            Ok(Box::new(ManualClock::new(at)))
        }
        None => Ok(Box::new(SystemClock)),
    }
}

// ─── Commands ───────────────────────────────────────────────────────

fn run_price(config: &LeagueConfig, catalog_path: &Path, event_id: &str, breakdown: bool) -> Result<()> {
    let (catalog, event, bouts) = load_card(catalog_path, event_id)?;
    let competitors = catalog.competitors_for_event(&event.id);
    let mut book = SalaryBook::new();
    let pool = book.ensure_salaries(&event.id, &bouts, &competitors, &config.pricing);

    println!();
    println!("=== Salaries: {} ===", event.name);
    if breakdown {
        println!(
            "{:<24} {:>6} {:>5} {:>5} {:>6} {:>5} {:>5} {:>6} {:>7}",
            "Competitor", "Base", "Rank", "Card", "Market", "Form", "Recog", "Raw", "Salary"
        );
    } else {
        println!("{:<24} {:<10} {:>7}", "Competitor", "Bout", "Salary");
    }
    for priced in pool {
        if breakdown {
            let Some(bout) = bouts.iter().find(|b| b.id == priced.bout_id) else {
                continue;
            };
            let b = price_breakdown(&priced.competitor, bout, &config.pricing);
            println!(
                "{:<24} {:>6} {:>5} {:>5} {:>6} {:>5} {:>5} {:>6} {:>7}",
                priced.competitor.name,
                b.base,
                b.ranking,
                b.card,
                b.market,
                b.form,
                b.recognition,
                b.raw,
                b.salary
            );
        } else {
            println!(
                "{:<24} {:<10} {:>7}",
                priced.competitor.name, priced.bout_id, priced.salary
            );
        }
    }
    if let Some(fingerprint) = book.fingerprint(&event.id) {
        println!();
        println!("Inputs:         {fingerprint}");
    }
    Ok(())
}

fn run_validate(config: &LeagueConfig, catalog_path: &Path, roster_path: &Path, now: Option<&str>) -> Result<()> {
    let roster: Roster = read_json(roster_path)?;
    let (_, event, bouts) = load_card(catalog_path, roster.event_id.as_str())?;
    let clock = clock_at(now)?;
    let lifecycle = RosterLifecycle::new(clock.as_ref(), &config.league, &event, &bouts);
    let report = lifecycle.validate(&roster);

    println!();
    println!("=== Roster {} ===", roster.id);
    println!("Status:         {:?}", roster.status);
    println!(
        "Picks:          {} of {}",
        roster.picks.len(),
        config.league.roster_size
    );
    println!("Salary:         {}", roster.total_salary());
    println!("Remaining:      {}", lifecycle.remaining_budget(&roster));
    match lifecycle.time_until_lock() {
        Some(left) => println!(
            "Locks in:       {}h {:02}m",
            left.num_hours(),
            left.num_minutes() % 60
        ),
        None => println!("Locks in:       deadline passed"),
    }
    println!();
    if report.valid {
        println!("Valid roster.");
        return Ok(());
    }
    for message in report.messages() {
        println!("  - {message}");
    }
    bail!("roster {} has {} violation(s)", roster.id, report.violations.len())
}

fn run_check_outcomes(outcomes_path: &Path, catalog: Option<&Path>, event: Option<&str>) -> Result<()> {
    let records: Vec<serde_json::Value> = read_json(outcomes_path)?;
    let outcomes = parse_batch(&records)
        .with_context(|| format!("{} rejected", outcomes_path.display()))?;

    if let (Some(catalog_path), Some(event_id)) = (catalog, event) {
        let (_, _, bouts) = load_card(catalog_path, event_id)?;
        check_against_card(&outcomes, &bouts)
            .with_context(|| format!("{} does not match event {event_id}", outcomes_path.display()))?;
    }

    println!("{} outcome(s) accepted", outcomes.len());
    println!("Fingerprint:    {}", outcomes_fingerprint(&outcomes));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_score(
    config: &LeagueConfig,
    catalog_path: &Path,
    event_id: &str,
    rosters_path: &Path,
    outcomes_path: &Path,
    now: Option<&str>,
    sequential: bool,
    output_dir: &Path,
    write_rosters: bool,
) -> Result<()> {
    let (_, event, bouts) = load_card(catalog_path, event_id)?;
    let mut rosters: Vec<Roster> = read_json(rosters_path)?;
    let records: Vec<serde_json::Value> = read_json(outcomes_path)?;
    let outcomes = parse_batch(&records)
        .with_context(|| format!("{} rejected", outcomes_path.display()))?;

    let clock = clock_at(now)?;
    let runner = EventRunner::new(clock.as_ref(), config).with_parallelism(!sequential);
    let scoreboard = runner.score(&event, &bouts, &mut rosters, &outcomes)?;

    print_leaderboard(&scoreboard);

    let run_dir = save_artifacts(&scoreboard, output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    if write_rosters {
        let json = serde_json::to_string_pretty(&rosters).context("failed to serialize rosters")?;
        std::fs::write(rosters_path, json)
            .with_context(|| format!("failed to write {}", rosters_path.display()))?;
        println!("Roster statuses written to: {}", rosters_path.display());
    }
    Ok(())
}

fn print_leaderboard(scoreboard: &EventScoreboard) {
    println!();
    println!("=== Leaderboard: {} ===", scoreboard.event_name);
    if !scoreboard.complete {
        println!(
            "PROVISIONAL: {} bout(s) without results",
            scoreboard.pending_bouts.len()
        );
    }
    println!(
        "{:>4}  {:<16} {:<16} {:>10} {:>10}",
        "Rank", "Roster", "User", "Raw", "Final"
    );
    for entry in &scoreboard.entries {
        let rank = entry
            .rank
            .map(|r| format!("{r}{}", if entry.tied { "=" } else { "" }))
            .unwrap_or_default();
        println!(
            "{:>4}  {:<16} {:<16} {:>10.2} {:>10.2}",
            rank, entry.roster_id, entry.user_id, entry.raw_total, entry.final_total
        );
    }
    if !scoreboard.ineligible.is_empty() {
        println!();
        println!("Not ranked:");
        for roster in &scoreboard.ineligible {
            let reasons: Vec<String> = roster.violations.iter().map(ToString::to_string).collect();
            let reason = if reasons.is_empty() {
                format!("{:?}, never locked", roster.status)
            } else {
                reasons.join("; ")
            };
            println!("  {:<16} {:<16} {}", roster.roster_id, roster.user_id, reason);
        }
    }
    println!();
    println!("Outcomes:       {}", scoreboard.outcomes_fingerprint);
}
