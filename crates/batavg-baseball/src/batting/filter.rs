// Narrowing the computed averages to one player, season or team.

use super::aggregate::AverageRecord;

/// Criteria for selecting average records. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AverageFilter {
    /// Case-insensitive playerID match.
    pub player_id: Option<String>,
    pub year_id: Option<i32>,
    /// Case-insensitive teamID match.
    pub team_id: Option<String>,
    /// Minimum summed at-bats for a record to qualify.
    pub min_at_bats: Option<u64>,
}

impl AverageFilter {
    pub fn is_empty(&self) -> bool {
        self == &AverageFilter::default()
    }

    pub fn matches(&self, record: &AverageRecord) -> bool {
        if let Some(ref player) = self.player_id {
            if !eq_ignore_case(record.player_id.as_deref(), player) {
                return false;
            }
        }
        if let Some(year) = self.year_id {
            if record.year_id != Some(year) {
                return false;
            }
        }
        if let Some(ref team) = self.team_id {
            if !eq_ignore_case(record.team_id.as_deref(), team) {
                return false;
            }
        }
        if let Some(min) = self.min_at_bats {
            if record.at_bats < min {
                return false;
            }
        }
        true
    }

    /// Matching records, in their existing order.
    pub fn apply<'a>(&self, records: &'a [AverageRecord]) -> Vec<&'a AverageRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

fn eq_ignore_case(value: Option<&str>, wanted: &str) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case(wanted.trim()))
}
