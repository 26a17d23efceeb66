use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};

use super::error::{DataError, PrepWarning};
use super::model::{AttendanceRecord, ChampionshipRecord};

// Attendance file columns.
pub const TEAM_COLUMN: &str = "team";
pub const SEASON_COLUMN: &str = "Season";
pub const ATTENDANCE_COLUMN: &str = "attendance";
pub const PER_GAME_COLUMN: &str = "Attend/G";
pub const PAYROLL_COLUMN: &str = "Est. Payroll";

/// Cell spellings read as "no value" rather than as malformed numbers.
const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "nan", "NaN", "null", "-"];

/// Rows read from one file plus everything recovered along the way.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub rows: Vec<T>,
    pub warnings: Vec<PrepWarning>,
}

// Manual impl: derive would demand `T: Default`, which row types don't have.
impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Loaded {
            rows: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Source selection
// ---------------------------------------------------------------------------

/// Pick the first candidate that exists. Candidates are in priority order,
/// newest data first.
pub fn locate_source(candidates: &[PathBuf]) -> Result<PathBuf, DataError> {
    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| DataError::DataSourceNotFound {
            candidates: candidates.to_vec(),
        })
}

fn open(path: &Path) -> Result<File, DataError> {
    File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Attendance file
// ---------------------------------------------------------------------------

pub fn load_attendance(path: &Path) -> Result<Loaded<AttendanceRecord>, DataError> {
    read_attendance(open(path)?)
}

/// Header row with at least `team, Season, attendance, Attend/G, Est. Payroll`
/// (any order, extra columns ignored). Team names are returned as written.
pub fn read_attendance<R: Read>(reader: R) -> Result<Loaded<AttendanceRecord>, DataError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::MissingColumn {
                column: name.to_string(),
            })
    };
    let team_idx = column(TEAM_COLUMN)?;
    let season_idx = column(SEASON_COLUMN)?;
    let attendance_idx = column(ATTENDANCE_COLUMN)?;
    let per_game_idx = column(PER_GAME_COLUMN)?;
    let payroll_idx = column(PAYROLL_COLUMN)?;

    let mut loaded = Loaded::default();

    for result in reader.records() {
        let record = result?;
        let line = line_of(&record);

        let team = record.get(team_idx).unwrap_or("");
        if team.is_empty() {
            loaded.warnings.push(PrepWarning::IncompleteRow {
                line,
                reason: "missing team".into(),
            });
            continue;
        }
        let raw_season = record.get(season_idx).unwrap_or("");
        let Some(season) = parse_season(raw_season) else {
            loaded.warnings.push(PrepWarning::IncompleteRow {
                line,
                reason: format!("invalid season '{raw_season}'"),
            });
            continue;
        };

        let mut numeric = |idx: usize, column: &'static str| {
            let raw = record.get(idx).unwrap_or("");
            match coerce_numeric(raw) {
                Cell::Value(v) => Some(v),
                Cell::Missing => None,
                Cell::Malformed => {
                    log::debug!("line {line}: '{raw}' in '{column}' coerced to null");
                    loaded.warnings.push(PrepWarning::MalformedValue {
                        line,
                        column,
                        value: raw.to_string(),
                    });
                    None
                }
            }
        };
        let attendance = numeric(attendance_idx, ATTENDANCE_COLUMN);
        let per_game = numeric(per_game_idx, PER_GAME_COLUMN);
        let payroll = numeric(payroll_idx, PAYROLL_COLUMN);

        loaded.rows.push(AttendanceRecord::raw(
            team, season, attendance, per_game, payroll,
        ));
    }

    Ok(loaded)
}

// ---------------------------------------------------------------------------
// Championship file
// ---------------------------------------------------------------------------

pub fn load_championships(path: &Path) -> Result<Loaded<ChampionshipRecord>, DataError> {
    read_championships(open(path)?)
}

/// Layout: a title line, then `Season, Winner, Loser, Series` rows. A column
/// header after the title is recognised by its non-numeric season and
/// skipped. Names are trimmed but not normalized.
pub fn read_championships<R: Read>(reader: R) -> Result<Loaded<ChampionshipRecord>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut loaded = Loaded::default();

    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        if idx == 0 {
            continue;
        }
        let line = line_of(&record);

        let raw_season = record.get(0).unwrap_or("");
        let Some(season) = parse_season(raw_season) else {
            if idx == 1 {
                log::debug!("skipping championship column header '{raw_season}'");
            } else {
                loaded.warnings.push(PrepWarning::IncompleteRow {
                    line,
                    reason: format!("invalid season '{raw_season}'"),
                });
            }
            continue;
        };

        let winner = record.get(1).unwrap_or("");
        let loser = record.get(2).unwrap_or("");
        if winner.is_empty() || loser.is_empty() {
            loaded.warnings.push(PrepWarning::IncompleteRow {
                line,
                reason: "missing winner or loser".into(),
            });
            continue;
        }

        loaded.rows.push(ChampionshipRecord {
            season,
            winner: winner.to_string(),
            loser: loser.to_string(),
            series_score: record.get(3).unwrap_or("").to_string(),
        });
    }

    Ok(loaded)
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum Cell {
    Value(f64),
    Missing,
    Malformed,
}

fn coerce_numeric(raw: &str) -> Cell {
    let raw = raw.trim();
    if MISSING_MARKERS.contains(&raw) {
        return Cell::Missing;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Cell::Value(v),
        _ => Cell::Malformed,
    }
}

/// Seasons are integers; `"2004.0"` is tolerated.
fn parse_season(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(season) = raw.parse::<i32>() {
        return Some(season);
    }
    let v = raw.parse::<f64>().ok()?;
    let in_range = v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX);
    in_range.then_some(v as i32)
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}
