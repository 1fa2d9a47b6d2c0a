// Command-line arguments.

use std::path::PathBuf;

use batavg_baseball::batting::AverageFilter;
use batavg_core::config::OutputFormat;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "batavg",
    version,
    about = "Batting averages per player, season and team from a batting CSV"
)]
pub struct Cli {
    /// Batting CSV with a header row (Lahman Batting.csv layout)
    pub file: PathBuf,

    /// Only show this playerID
    #[arg(long)]
    pub player: Option<String>,

    /// Only show this season
    #[arg(long)]
    pub year: Option<i32>,

    /// Only show this teamID
    #[arg(long)]
    pub team: Option<String>,

    /// Only show groups with at least this many at-bats
    #[arg(long = "min-ab")]
    pub min_ab: Option<u64>,

    /// Show at most this many records
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output format: table, json or csv (overrides the config file)
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Print the distinct playerIDs and yearIDs instead of the averages
    #[arg(long)]
    pub list_ids: bool,

    /// Directory holding config/ and defaults/ (default: current directory)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn filter(&self) -> AverageFilter {
        AverageFilter {
            player_id: self.player.clone(),
            year_id: self.year,
            team_id: self.team.clone(),
            min_at_bats: self.min_ab,
        }
    }
}
