// Report rendering: aligned text table, JSON or CSV.
//
// Columns: playerID, yearID, Team (display name), Avg (fixed decimals or the
// N/A text). JSON and CSV also carry the raw teamID, summed H/AB and the
// unrounded average.

use std::io::Write;

use batavg_baseball::batting::{AverageRecord, StatsResult};
use batavg_core::config::{OutputConfig, OutputFormat};
use batavg_core::teams::TeamDirectory;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode JSON report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode CSV report: {0}")]
    Csv(#[from] csv::Error),
}

/// One rendered line of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "playerID")]
    pub player_id: Option<String>,
    #[serde(rename = "yearID")]
    pub year_id: Option<i32>,
    #[serde(rename = "teamID")]
    pub team_id: Option<String>,
    pub team: String,
    #[serde(rename = "H")]
    pub hits: u64,
    #[serde(rename = "AB")]
    pub at_bats: u64,
    pub avg: Option<f64>,
    #[serde(rename = "avgText")]
    pub avg_text: String,
}

/// Format a batting average with `precision` decimals, or `na_text` when
/// there is none.
pub fn format_avg(avg: Option<f64>, precision: usize, na_text: &str) -> String {
    match avg {
        Some(value) => format!("{value:.precision$}"),
        None => na_text.to_string(),
    }
}

pub fn build_rows<'a, I>(records: I, teams: &TeamDirectory, output: &OutputConfig) -> Vec<ReportRow>
where
    I: IntoIterator<Item = &'a AverageRecord>,
{
    records
        .into_iter()
        .map(|r| ReportRow {
            player_id: r.player_id.clone(),
            year_id: r.year_id,
            team_id: r.team_id.clone(),
            team: teams.display_name(r.team_id.as_deref()).to_string(),
            hits: r.hits,
            at_bats: r.at_bats,
            avg: r.avg,
            avg_text: format_avg(r.avg, output.precision, &output.na_text),
        })
        .collect()
}

pub fn render_table(rows: &[ReportRow]) -> String {
    const HEADERS: [&str; 4] = ["playerID", "yearID", "Team", "Avg"];

    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|r| {
            [
                r.player_id.clone().unwrap_or_default(),
                r.year_id.map(|y| y.to_string()).unwrap_or_default(),
                r.team.clone(),
                r.avg_text.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(rule.join("  ").as_str());
    out.push('\n');
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    if cells.is_empty() {
        out.push_str("(no records)\n");
    }
    out
}

/// Avg is right-aligned so the decimal points line up.
fn push_line(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let line = format!(
        "{:<w0$}  {:<w1$}  {:<w2$}  {:>w3$}",
        cells[0],
        cells[1],
        cells[2],
        cells[3],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
    );
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Write the rows in the requested format.
pub fn write_report<W: Write>(
    out: &mut W,
    format: OutputFormat,
    rows: &[ReportRow],
) -> Result<(), ReportError> {
    match format {
        OutputFormat::Table => {
            out.write_all(render_table(rows).as_bytes())?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, rows)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

/// Distinct player and year identifiers, one list per line.
pub fn render_identifiers(stats: &StatsResult) -> String {
    let players: Vec<&str> = stats
        .player_ids
        .iter()
        .map(|p| p.as_deref().unwrap_or("(none)"))
        .collect();
    let years: Vec<String> = stats
        .year_ids
        .iter()
        .map(|y| y.map_or_else(|| "(none)".to_string(), |y| y.to_string()))
        .collect();

    format!(
        "players ({}): {}\nyears ({}): {}\n",
        players.len(),
        players.join(", "),
        years.len(),
        years.join(", ")
    )
}
