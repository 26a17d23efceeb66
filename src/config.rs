use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::normalize::{default_table, ATTENDANCE_ALIASES, CHAMPIONSHIP_ALIASES};

/// Environment variable naming a config file to use.
pub const CONFIG_ENV: &str = "TURNSTILE_CONFIG";
/// Config file picked up from the working directory when present.
pub const CONFIG_FILE: &str = "turnstile.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Where the data lives and how team names are reconciled. Every field is
/// optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Attendance files in priority order; the first that exists is used.
    pub attendance_sources: Vec<PathBuf>,
    pub championship_source: PathBuf,
    pub aliases: AliasConfig,
    pub default_top_n: usize,
    pub histogram_bins: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            attendance_sources: vec![
                PathBuf::from("MLB_attendance_data_2000-2025.csv"),
                PathBuf::from("MLB_attendance_data_2000-2024.csv"),
            ],
            championship_source: PathBuf::from("MLB Wolrd Series Winners 2000-25.csv"),
            aliases: AliasConfig::default(),
            default_top_n: 10,
            histogram_bins: 20,
        }
    }
}

/// Historical → canonical team names, one table per source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliasConfig {
    pub attendance: BTreeMap<String, String>,
    pub championship: BTreeMap<String, String>,
}

impl Default for AliasConfig {
    fn default() -> Self {
        AliasConfig {
            attendance: default_table(ATTENDANCE_ALIASES),
            championship: default_table(CHAMPIONSHIP_ALIASES),
        }
    }
}

impl DashboardConfig {
    /// `$TURNSTILE_CONFIG` if set, else `./turnstile.json` if present, else
    /// defaults.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(CONFIG_FILE);
        if local.is_file() {
            return Self::from_file(local);
        }
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Using config {}", path.display());
        Ok(config)
    }

    /// The same settings with a single attendance file.
    pub fn with_attendance_source(&self, path: PathBuf) -> Self {
        DashboardConfig {
            attendance_sources: vec![path],
            ..self.clone()
        }
    }
}
