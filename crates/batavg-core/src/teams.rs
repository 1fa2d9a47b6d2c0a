// Team display names keyed by teamID (e.g. "NYA" -> "New York Yankees").

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TeamsError {
    #[error("failed to read team file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid team file {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Static lookup from teamID to a human-readable team name.
///
/// The file format is a flat JSON object: `{ "NYA": "New York Yankees", ... }`.
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    names: HashMap<String, String>,
}

impl TeamDirectory {
    pub fn new(names: HashMap<String, String>) -> Self {
        TeamDirectory { names }
    }

    /// Load the directory from a JSON file.
    pub fn load(path: &Path) -> Result<Self, TeamsError> {
        let file = std::fs::File::open(path).map_err(|e| TeamsError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let directory = Self::from_reader(file).map_err(|e| TeamsError::Json {
            path: path.display().to_string(),
            source: e,
        })?;
        debug!("loaded {} team names from {}", directory.len(), path.display());
        Ok(directory)
    }

    fn from_reader<R: Read>(rdr: R) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, String> = serde_json::from_reader(rdr)?;
        let names = raw
            .into_iter()
            .map(|(id, name)| (id.trim().to_string(), name.trim().to_string()))
            .collect();
        Ok(TeamDirectory { names })
    }

    /// Display name for a team. Unknown IDs render as the raw ID; an absent
    /// ID renders as an empty string.
    pub fn display_name<'a>(&'a self, team_id: Option<&'a str>) -> &'a str {
        match team_id {
            Some(id) => self.names.get(id).map(String::as_str).unwrap_or(id),
            None => "",
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
