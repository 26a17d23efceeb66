use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Fatal load errors
// ---------------------------------------------------------------------------

/// Errors that stop a data source from being loaded at all.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("no data source found (tried: {})", join_paths(.candidates))]
    DataSourceNotFound { candidates: Vec<PathBuf> },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column '{column}'")]
    MissingColumn { column: String },

    #[error("invalid name alias table: {0}")]
    InvalidAliases(String),
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Per-query failures
// ---------------------------------------------------------------------------

/// A query could not produce a result from the selected rows.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("insufficient data: need at least {required} valid points, found {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("all x values are equal; slope is undefined")]
    ZeroVariance,
}

// ---------------------------------------------------------------------------
// Recovered conditions
// ---------------------------------------------------------------------------

/// Non-fatal condition recorded while preparing the dataset.
///
/// `line` is the 1-based line number in the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum PrepWarning {
    /// A numeric cell failed coercion and was replaced by null.
    MalformedValue {
        line: u64,
        column: &'static str,
        value: String,
    },
    /// A row without a usable team or season; dropped.
    IncompleteRow { line: u64, reason: String },
    /// A second row for a team-season after name normalization; dropped.
    DuplicateTeamSeason { team: String, season: i32 },
    /// A championship row that contradicts another or itself; dropped.
    InvalidChampionship { season: i32, reason: String },
    /// The championship file is absent or unreadable.
    MissingSecondarySource { path: PathBuf, reason: String },
    /// No attendance data could be loaded; the table is empty.
    DataUnavailable(String),
}

impl fmt::Display for PrepWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrepWarning::MalformedValue {
                line,
                column,
                value,
            } => write!(f, "line {line}: '{value}' in '{column}' is not a number"),
            PrepWarning::IncompleteRow { line, reason } => {
                write!(f, "line {line}: row skipped ({reason})")
            }
            PrepWarning::DuplicateTeamSeason { team, season } => {
                write!(f, "duplicate row for {team} {season} skipped")
            }
            PrepWarning::InvalidChampionship { season, reason } => {
                write!(f, "championship {season} ignored ({reason})")
            }
            PrepWarning::MissingSecondarySource { path, reason } => write!(
                f,
                "championship data not loaded from {}: {reason}",
                path.display()
            ),
            PrepWarning::DataUnavailable(reason) => write!(f, "no attendance data: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_lists_every_candidate() {
        let err = DataError::DataSourceNotFound {
            candidates: vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")],
        };
        assert_eq!(err.to_string(), "no data source found (tried: a.csv, b.csv)");
    }

    #[test]
    fn warning_display_names_line_and_column() {
        let w = PrepWarning::MalformedValue {
            line: 7,
            column: "attendance",
            value: "n/a".into(),
        };
        assert_eq!(w.to_string(), "line 7: 'n/a' in 'attendance' is not a number");
    }
}
