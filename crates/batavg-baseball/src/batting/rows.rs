// Batting CSV ingestion.
//
// Reads Lahman-style `Batting.csv` files (playerID,yearID,stint,teamID,...,AB,
// R,H,...). Only the grouping keys and the H/AB counting stats are kept; every
// other column is ignored. Numeric coercion happens here so the aggregator
// only ever sees typed values.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One player's batting line for a single season with a single team.
///
/// Every field is optional: a blank cell or a missing column leaves it unset.
/// Absent counting stats count as zero when aggregated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub player_id: Option<String>,
    pub year_id: Option<i32>,
    pub team_id: Option<String>,
    pub hits: Option<u32>,
    pub at_bats: Option<u32>,
}

impl Row {
    /// Build a fully-populated row.
    pub fn new(player_id: &str, year_id: i32, team_id: &str, hits: u32, at_bats: u32) -> Self {
        Row {
            player_id: Some(player_id.to_string()),
            year_id: Some(year_id),
            team_id: Some(team_id.to_string()),
            hits: Some(hits),
            at_bats: Some(at_bats),
        }
    }
}

/// Rows read from one file, plus the number of data lines that were dropped
/// because a numeric cell could not be coerced.
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub rows: Vec<Row>,
    pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// Column names follow the Lahman database headers. Numeric columns accept
/// whole numbers written as decimals (`3.0`); fractions, negatives and text
/// fail the row.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawBattingRow {
    #[serde(default)]
    playerID: Option<String>,
    #[serde(default, deserialize_with = "whole_number")]
    yearID: Option<i32>,
    #[serde(default)]
    teamID: Option<String>,
    #[serde(default, deserialize_with = "whole_number")]
    H: Option<u32>,
    #[serde(default, deserialize_with = "whole_number")]
    AB: Option<u32>,
}

fn whole_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + TryFrom<i64>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(value) = text.parse::<T>() {
        return Ok(Some(value));
    }
    let invalid = || <D::Error as de::Error>::custom(format!("invalid whole number '{text}'"));
    let float: f64 = text.parse().map_err(|_| invalid())?;
    if !float.is_finite() || float.fract() != 0.0 || float.abs() > i64::MAX as f64 {
        return Err(invalid());
    }
    T::try_from(float as i64).map(Some).map_err(|_| invalid())
}

impl From<RawBattingRow> for Row {
    fn from(raw: RawBattingRow) -> Self {
        Row {
            player_id: raw.playerID,
            year_id: raw.yearID,
            team_id: raw.teamID,
            hits: raw.H,
            at_bats: raw.AB,
        }
    }
}

const EXPECTED_COLUMNS: [&str; 5] = ["playerID", "yearID", "teamID", "H", "AB"];

// ---------------------------------------------------------------------------
// Reader-based loader (private, enables testing without temp files)
// ---------------------------------------------------------------------------

fn load_rows_from_reader<R: Read>(rdr: R) -> Result<Ingested, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let headers = reader.headers()?.clone();
    for column in EXPECTED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            warn!("batting CSV has no '{}' column; treating it as absent", column);
        }
    }

    let mut ingested = Ingested::default();
    for result in reader.deserialize::<RawBattingRow>() {
        match result {
            Ok(raw) => ingested.rows.push(raw.into()),
            Err(e) => {
                warn!("skipping malformed batting row: {}", e);
                ingested.skipped += 1;
            }
        }
    }
    Ok(ingested)
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load batting rows from a CSV file with a header row.
pub fn load_rows(path: &Path) -> Result<Ingested, IngestError> {
    let file = std::fs::File::open(path).map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let ingested = load_rows_from_reader(file).map_err(|e| IngestError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    debug!(
        "read {} batting rows from {} ({} skipped)",
        ingested.rows.len(),
        path.display(),
        ingested.skipped
    );
    Ok(ingested)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
