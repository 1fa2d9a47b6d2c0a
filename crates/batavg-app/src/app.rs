// One batavg run: process the file, select records, write the report.

use std::io::Write;

use anyhow::Context;
use batavg_core::config::{Config, IdentifierOrder};
use batavg_core::teams::TeamDirectory;
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::processor;
use crate::report;

/// Load the team lookup named by the config. A missing or unreadable file
/// is not fatal: teams then display as their raw IDs.
pub fn load_teams(config: &Config) -> TeamDirectory {
    match TeamDirectory::load(&config.teams_path) {
        Ok(teams) => teams,
        Err(e) => {
            warn!("{}; team names will show as teamIDs", e);
            TeamDirectory::default()
        }
    }
}

pub async fn run<W: Write>(
    cli: &Cli,
    config: &Config,
    teams: &TeamDirectory,
    out: &mut W,
) -> anyhow::Result<()> {
    let processed = processor::process(cli.file.clone())
        .await
        .with_context(|| format!("could not process {}", cli.file.display()))?;

    let mut stats = processed.stats;
    if config.identifiers.order == IdentifierOrder::Sorted {
        stats.sort_identifiers();
    }

    if cli.list_ids {
        out.write_all(report::render_identifiers(&stats).as_bytes())
            .context("failed to write identifiers")?;
        return Ok(());
    }

    let filter = cli.filter();
    let mut selected = filter.apply(&stats.averages);
    if !filter.is_empty() {
        debug!(
            "filter {:?} kept {} of {} records",
            filter,
            selected.len(),
            stats.averages.len()
        );
    }
    if let Some(limit) = cli.limit {
        selected.truncate(limit);
    }

    let rows = report::build_rows(selected, teams, &config.output);
    let format = cli.format.unwrap_or(config.output.format);
    report::write_report(out, format, &rows).context("failed to write report")?;
    Ok(())
}
