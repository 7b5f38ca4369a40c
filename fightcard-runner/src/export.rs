//! Scoreboard export — JSON and CSV artifacts.
//!
//! - **JSON**: the full `EventScoreboard`, with schema versioning
//! - **CSV**: leaderboard (one row per roster) and pick breakdown (one row
//!   per pick) for spreadsheets
//!
//! Unknown schema versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::runner::{EventScoreboard, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json(scoreboard: &EventScoreboard) -> Result<String> {
    serde_json::to_string_pretty(scoreboard).context("failed to serialize EventScoreboard to JSON")
}

/// Deserialize a scoreboard, rejecting schema versions newer than this build.
pub fn import_json(json: &str) -> Result<EventScoreboard> {
    let scoreboard: EventScoreboard =
        serde_json::from_str(json).context("failed to deserialize EventScoreboard from JSON")?;
    if scoreboard.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            scoreboard.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(scoreboard)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Columns: rank, tied, roster_id, user_id, league_id, raw_total,
/// category_multiplier, final_total, submitted_at
pub fn export_leaderboard_csv(scoreboard: &EventScoreboard) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "rank",
        "tied",
        "roster_id",
        "user_id",
        "league_id",
        "raw_total",
        "category_multiplier",
        "final_total",
        "submitted_at",
    ])?;

    for s in &scoreboard.entries {
        wtr.write_record([
            s.rank.map(|r| r.to_string()).unwrap_or_default(),
            s.tied.to_string(),
            s.roster_id.to_string(),
            s.user_id.to_string(),
            s.league_id.to_string(),
            format!("{:.2}", s.raw_total),
            format!("{:.2}", s.category_multiplier),
            format!("{:.2}", s.final_total),
            s.submitted_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Columns: roster_id, competitor_id, bout_id, result, boosted, base,
/// finish_bonus, round_bonus, title_bonus, performance, penalties,
/// underdog_multiplier, boost_multiplier, raw_total, final_total
pub fn export_picks_csv(scoreboard: &EventScoreboard) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "roster_id",
        "competitor_id",
        "bout_id",
        "result",
        "boosted",
        "base",
        "finish_bonus",
        "round_bonus",
        "title_bonus",
        "performance",
        "penalties",
        "underdog_multiplier",
        "boost_multiplier",
        "raw_total",
        "final_total",
    ])?;

    for roster in &scoreboard.entries {
        for f in &roster.fighters {
            wtr.write_record([
                roster.roster_id.to_string(),
                f.competitor.to_string(),
                f.bout.as_ref().map(ToString::to_string).unwrap_or_default(),
                format!("{:?}", f.result),
                f.boosted.to_string(),
                format!("{:.2}", f.base),
                format!("{:.2}", f.finish_bonus),
                format!("{:.2}", f.round_bonus),
                format!("{:.2}", f.title_bonus),
                format!("{:.2}", f.performance),
                format!("{:.2}", f.penalties),
                format!("{:.2}", f.underdog_multiplier),
                format!("{:.2}", f.boost_multiplier),
                format!("{:.2}", f.raw_total),
                format!("{:.2}", f.final_total),
            ])?;
        }
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the artifact set for one scoring run.
///
/// Creates `{event_id}_{scored_at}/` under `output_dir` containing:
/// - `scoreboard.json` — the full `EventScoreboard`
/// - `leaderboard.csv` — one row per roster
/// - `picks.csv` — one row per pick
///
/// Returns the path to the created directory.
pub fn save_artifacts(scoreboard: &EventScoreboard, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}",
        scoreboard.event_id,
        scoreboard.scored_at.format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("scoreboard.json"), export_json(scoreboard)?)
        .context("failed to write scoreboard.json")?;
    std::fs::write(run_dir.join("leaderboard.csv"), export_leaderboard_csv(scoreboard)?)
        .context("failed to write leaderboard.csv")?;
    std::fs::write(run_dir.join("picks.csv"), export_picks_csv(scoreboard)?)
        .context("failed to write picks.csv")?;

    Ok(run_dir)
}

/// Load a scoreboard from an artifact directory's scoreboard.json.
pub fn load_artifacts(run_dir: &Path) -> Result<EventScoreboard> {
    let path = run_dir.join("scoreboard.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}
