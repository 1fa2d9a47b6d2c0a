// Configuration loading and parsing (config/batavg.toml).

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Name of the configuration file inside `config/`.
pub const CONFIG_FILE: &str = "batavg.toml";

/// Name of the team lookup file shipped in `defaults/`.
pub const TEAMS_FILE: &str = "teams.json";

/// Largest number of decimals the report will print for an average.
pub const MAX_PRECISION: usize = 10;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub output: OutputConfig,
    pub identifiers: IdentifierConfig,
    /// Team lookup file, already resolved against the base directory.
    pub teams_path: PathBuf,
}

impl Config {
    /// Settings used when `base_dir` has neither `config/` nor `defaults/`.
    /// The teams path points where a copied lookup would live; if it is
    /// missing, teams display as their raw IDs.
    pub fn builtin(base_dir: &Path) -> Self {
        Config {
            output: OutputConfig::default(),
            identifiers: IdentifierConfig::default(),
            teams_path: base_dir.join("config").join(TEAMS_FILE),
        }
    }
}

// ---------------------------------------------------------------------------
// batavg.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire batavg.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    output: OutputConfig,
    #[serde(default)]
    identifiers: IdentifierConfig,
    data: DataSection,
}

#[derive(Debug, Clone, Deserialize)]
struct DataSection {
    teams: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_precision")]
    pub precision: usize,
    #[serde(default = "default_na_text")]
    pub na_text: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: OutputFormat::default(),
            precision: default_precision(),
            na_text: default_na_text(),
        }
    }
}

fn default_precision() -> usize {
    3
}

fn default_na_text() -> String {
    "N/A".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentifierConfig {
    #[serde(default)]
    pub order: IdentifierOrder,
}

/// How the report renders the averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!(
                "unknown output format '{other}' (expected table, json or csv)"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        };
        f.write_str(s)
    }
}

/// Ordering of the distinct player/year identifier lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierOrder {
    /// Players ascending, years newest first.
    #[default]
    Sorted,
    /// Order in which the identifiers first appeared in the file.
    FirstSeen,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/batavg.toml` relative to
/// `base_dir`. Does not copy defaults; see [`load_config_in`].
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&config_path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: config_path.clone(),
        source: e,
    })?;

    let teams_path = {
        let raw = Path::new(&file.data.teams);
        if raw.is_absolute() {
            raw.to_path_buf()
        } else {
            base_dir.join(raw)
        }
    };

    let config = Config {
        output: file.output,
        identifiers: file.identifiers,
        teams_path,
    };

    validate(&config, &file.data)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or pass --config-dir",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        if target.exists() {
            continue;
        }
        let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read {}: {e}", path.display()),
        })?;

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Copy any missing defaults into `base_dir/config/`, then load from there.
pub fn load_config_in(base_dir: &Path) -> Result<Config, ConfigError> {
    let copied = ensure_config_files(base_dir)?;
    for path in &copied {
        tracing::info!("initialized {} from defaults", path.display());
    }
    load_config_from(base_dir)
}

/// Like [`load_config_in`], but a `base_dir` with neither `config/` nor
/// `defaults/` yields [`Config::builtin`] instead of an error, and nothing
/// is written.
pub fn load_or_default(base_dir: &Path) -> Result<Config, ConfigError> {
    if !base_dir.join("config").exists() && !base_dir.join("defaults").exists() {
        tracing::debug!(
            "no config/ or defaults/ in {}; using built-in settings",
            base_dir.display()
        );
        return Ok(Config::builtin(base_dir));
    }
    load_config_in(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config, data: &DataSection) -> Result<(), ConfigError> {
    if config.output.precision > MAX_PRECISION {
        return Err(ConfigError::ValidationError {
            field: "output.precision".into(),
            message: format!(
                "must be at most {MAX_PRECISION}, got {}",
                config.output.precision
            ),
        });
    }

    if config.output.na_text.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "output.na_text".into(),
            message: "must not be empty".into(),
        });
    }

    if data.teams.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.teams".into(),
            message: "must name a team lookup file".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
