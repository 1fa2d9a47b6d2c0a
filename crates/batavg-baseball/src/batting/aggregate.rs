// Batting average aggregation.
//
// Rows are grouped by (playerID, yearID, teamID), hits and at-bats are summed
// per group, and each group gets one batting average. Multiple stints for the
// same player, season and team (or duplicate lines) collapse into one record.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use super::rows::Row;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Identifies one aggregation bucket. Absent components are part of the key:
/// rows missing a teamID group together under `team_id: None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub player_id: Option<String>,
    pub year_id: Option<i32>,
    pub team_id: Option<String>,
}

impl GroupKey {
    pub fn of(row: &Row) -> Self {
        GroupKey {
            player_id: row.player_id.clone(),
            year_id: row.year_id,
            team_id: row.team_id.clone(),
        }
    }
}

/// The computed average for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct AverageRecord {
    pub player_id: Option<String>,
    pub year_id: Option<i32>,
    pub team_id: Option<String>,
    /// Summed hits for the group.
    pub hits: u64,
    /// Summed at-bats for the group.
    pub at_bats: u64,
    /// `None` when the group has no hits or no at-bats.
    pub avg: Option<f64>,
}

/// Output of [`compute_averages`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsResult {
    /// One record per distinct group, best average first.
    pub averages: Vec<AverageRecord>,
    /// Distinct player IDs across all rows.
    pub player_ids: Vec<Option<String>>,
    /// Distinct season years across all rows.
    pub year_ids: Vec<Option<i32>>,
}

impl StatsResult {
    /// Reorder the identifier lists for display: players ascending, years
    /// newest first. Absent identifiers go last in both.
    pub fn sort_identifiers(&mut self) {
        self.player_ids.sort_by(|a, b| absent_last(a, b, |x, y| x.cmp(y)));
        self.year_ids.sort_by(|a, b| absent_last(a, b, |x, y| y.cmp(x)));
    }

    pub fn is_empty(&self) -> bool {
        self.averages.is_empty()
    }
}

#[derive(Debug)]
struct GroupTotal {
    key: GroupKey,
    total_h: u64,
    total_ab: u64,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Hits over at-bats, or `None` unless both are positive.
pub fn batting_average(hits: u64, at_bats: u64) -> Option<f64> {
    if hits > 0 && at_bats > 0 {
        Some(hits as f64 / at_bats as f64)
    } else {
        None
    }
}

/// Descending order on averages with `None` after every number.
pub fn compare_avg_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Group the rows, compute each group's batting average and collect the
/// distinct player and year identifiers.
///
/// Groups are sorted by average, best first; groups without an average come
/// last. The sort is stable, so ties keep the order in which their group was
/// first seen. Identifier lists are in first-seen order; see
/// [`StatsResult::sort_identifiers`].
pub fn compute_averages(rows: &[Row]) -> StatsResult {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut totals: Vec<GroupTotal> = Vec::new();

    let mut seen_players: HashSet<Option<&str>> = HashSet::new();
    let mut seen_years: HashSet<Option<i32>> = HashSet::new();
    let mut player_ids = Vec::new();
    let mut year_ids = Vec::new();

    for row in rows {
        if seen_players.insert(row.player_id.as_deref()) {
            player_ids.push(row.player_id.clone());
        }
        if seen_years.insert(row.year_id) {
            year_ids.push(row.year_id);
        }

        let key = GroupKey::of(row);
        let slot = match index.get(&key) {
            Some(&i) => i,
            None => {
                totals.push(GroupTotal {
                    key: key.clone(),
                    total_h: 0,
                    total_ab: 0,
                });
                index.insert(key, totals.len() - 1);
                totals.len() - 1
            }
        };

        let total = &mut totals[slot];
        total.total_h += u64::from(row.hits.unwrap_or(0));
        total.total_ab += u64::from(row.at_bats.unwrap_or(0));
    }

    let mut averages: Vec<AverageRecord> = totals
        .into_iter()
        .map(|t| AverageRecord {
            avg: batting_average(t.total_h, t.total_ab),
            player_id: t.key.player_id,
            year_id: t.key.year_id,
            team_id: t.key.team_id,
            hits: t.total_h,
            at_bats: t.total_ab,
        })
        .collect();

    averages.sort_by(|a, b| compare_avg_desc(a.avg, b.avg));

    StatsResult {
        averages,
        player_ids,
        year_ids,
    }
}

fn absent_last<T>(a: &Option<T>, b: &Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
