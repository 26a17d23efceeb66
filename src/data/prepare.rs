use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::DashboardConfig;

use super::annotate::{annotate, validate_championships};
use super::derive::derive_metrics;
use super::error::{DataError, PrepWarning};
use super::loader;
use super::model::{AttendanceRecord, AttendanceTable, ChampionshipRecord};
use super::normalize::NameAliases;

/// The process-wide snapshot: the prepared table and how it came to be.
#[derive(Debug, Clone, Default)]
pub struct PreparedData {
    pub table: AttendanceTable,
    /// The attendance file actually used.
    pub source: Option<PathBuf>,
    pub warnings: Vec<PrepWarning>,
}

impl PreparedData {
    /// An empty snapshot carrying the reason no data is available.
    pub fn degraded(reason: String) -> Self {
        PreparedData {
            table: AttendanceTable::empty(),
            source: None,
            warnings: vec![PrepWarning::DataUnavailable(reason)],
        }
    }

    pub fn has_championships(&self) -> bool {
        !self.table.championships().is_empty()
    }
}

/// Load → normalize → derive → annotate.
///
/// Fails only when no attendance data can be read; championship problems
/// are recorded as warnings.
pub fn prepare(config: &DashboardConfig) -> Result<PreparedData, DataError> {
    let attendance_aliases = NameAliases::new(config.aliases.attendance.clone())?;
    let championship_aliases = NameAliases::new(config.aliases.championship.clone())?;

    let source = loader::locate_source(&config.attendance_sources)?;
    let loaded = loader::load_attendance(&source)?;
    log::info!("Loaded {} with {} records", source.display(), loaded.rows.len());

    let mut warnings = loaded.warnings;
    let records: Vec<AttendanceRecord> =
        canonicalize_teams(loaded.rows, &attendance_aliases, &mut warnings)
            .into_iter()
            .map(derive_metrics)
            .collect();

    let championships =
        load_championships(&config.championship_source, &championship_aliases, &mut warnings);
    let records = annotate(records, &championships);

    let malformed = warnings
        .iter()
        .filter(|w| matches!(w, PrepWarning::MalformedValue { .. }))
        .count();
    if malformed > 0 {
        log::warn!("{malformed} values could not be read as numbers and were left empty");
    }

    Ok(PreparedData {
        table: AttendanceTable::new(records, championships),
        source: Some(source),
        warnings,
    })
}

/// [`prepare`], falling back to an empty snapshot instead of failing.
pub fn prepare_or_degraded(config: &DashboardConfig) -> PreparedData {
    match prepare(config) {
        Ok(data) => data,
        Err(e) => {
            log::error!("Starting with an empty dataset: {e}");
            PreparedData::degraded(e.to_string())
        }
    }
}

/// Map team names to canonical names. Renamed teams keep one row per season;
/// a second row for the same team-season is dropped.
fn canonicalize_teams(
    rows: Vec<AttendanceRecord>,
    aliases: &NameAliases,
    warnings: &mut Vec<PrepWarning>,
) -> Vec<AttendanceRecord> {
    let mut seen: HashSet<(String, i32)> = HashSet::with_capacity(rows.len());
    let mut out = Vec::with_capacity(rows.len());

    for mut record in rows {
        let team = aliases.canonical(&record.team).to_string();
        record.team = team;
        if !seen.insert((record.team.clone(), record.season)) {
            log::warn!("Duplicate row for {} {} skipped", record.team, record.season);
            warnings.push(PrepWarning::DuplicateTeamSeason {
                team: record.team,
                season: record.season,
            });
            continue;
        }
        out.push(record);
    }
    out
}

fn load_championships(
    path: &Path,
    aliases: &NameAliases,
    warnings: &mut Vec<PrepWarning>,
) -> Vec<ChampionshipRecord> {
    if !path.is_file() {
        log::warn!("Championship data not found at {}", path.display());
        warnings.push(PrepWarning::MissingSecondarySource {
            path: path.to_path_buf(),
            reason: "file not found".into(),
        });
        return Vec::new();
    }

    let loaded = match loader::load_championships(path) {
        Ok(loaded) => loaded,
        Err(e) => {
            log::warn!("Championship data not loaded: {e}");
            warnings.push(PrepWarning::MissingSecondarySource {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
            return Vec::new();
        }
    };
    warnings.extend(loaded.warnings);

    let rows = loaded
        .rows
        .into_iter()
        .map(|c| ChampionshipRecord {
            winner: aliases.canonical(&c.winner).to_string(),
            loser: aliases.canonical(&c.loser).to_string(),
            ..c
        })
        .collect();
    let (kept, invalid) = validate_championships(rows);
    for w in &invalid {
        log::warn!("{w}");
    }
    warnings.extend(invalid);

    log::info!("Championship data loaded: {} seasons", kept.len());
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const ATTENDANCE: &str = "\
team,Season,attendance,Attend/G,Est. Payroll
Anaheim Angels,2002,2305547,28464,61721667
Los Angeles Angels of Anaheim,2005,3404686,42033,94867822
San Francisco Giants,2002,3253203,40163,78299835
San Francisco Giants,2003,3264898,40307,0
";

    const CHAMPIONSHIPS: &str = "\
MLB World Series Winners
Season,Winner,Loser,Series
2002, Anaheim Angels , San Francisco Giants ,4-3
";

    fn config_in(dir: &Path) -> DashboardConfig {
        DashboardConfig {
            attendance_sources: vec![dir.join("att_2025.csv"), dir.join("att_2024.csv")],
            championship_source: dir.join("ws.csv"),
            ..DashboardConfig::default()
        }
    }

    fn find<'a>(data: &'a PreparedData, team: &str, season: i32) -> &'a AttendanceRecord {
        data.table
            .records()
            .iter()
            .find(|r| r.team == team && r.season == season)
            .unwrap()
    }

    #[test]
    fn full_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("att_2024.csv"), ATTENDANCE).unwrap();
        fs::write(dir.path().join("ws.csv"), CHAMPIONSHIPS).unwrap();

        let data = prepare(&config_in(dir.path())).unwrap();
        assert_eq!(data.source.as_deref(), Some(dir.path().join("att_2024.csv").as_path()));
        assert!(data.warnings.is_empty(), "{:?}", data.warnings);
        assert!(data.has_championships());

        // Two historical names, one team, still two team-seasons.
        assert_eq!(data.table.len(), 4);
        assert_eq!(
            data.table.teams(),
            ["Los Angeles Angels", "San Francisco Giants"]
        );
        assert_eq!(data.table.seasons(), [2002, 2003, 2005]);

        let angels = find(&data, "Los Angeles Angels", 2002);
        assert!(angels.is_champion && !angels.is_finalist);
        let giants = find(&data, "San Francisco Giants", 2002);
        assert!(!giants.is_champion && giants.is_finalist);
        assert!(!find(&data, "Los Angeles Angels", 2005).is_champion);

        // Zero payroll leaves efficiency empty.
        assert_eq!(find(&data, "San Francisco Giants", 2003).efficiency, None);
        assert!(angels.efficiency.is_some());
    }

    #[test]
    fn missing_championship_file_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("att_2025.csv"), ATTENDANCE).unwrap();

        let data = prepare(&config_in(dir.path())).unwrap();
        assert_eq!(data.table.len(), 4);
        assert!(data
            .table
            .records()
            .iter()
            .all(|r| !r.is_champion && !r.is_finalist));
        assert!(matches!(
            data.warnings.as_slice(),
            [PrepWarning::MissingSecondarySource { .. }]
        ));
    }

    #[test]
    fn unreadable_championship_file_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("att_2025.csv"), ATTENDANCE).unwrap();
        fs::write(dir.path().join("ws.csv"), [0xff, 0xfe, b'\n', 0xff, b',', 0xfe]).unwrap();

        let data = prepare(&config_in(dir.path())).unwrap();
        assert!(data.table.records().iter().all(|r| !r.is_champion));
        assert!(data
            .warnings
            .iter()
            .any(|w| matches!(w, PrepWarning::MissingSecondarySource { .. })));
    }

    #[test]
    fn duplicate_team_season_after_renaming_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let csv = "team,Season,attendance,Attend/G,Est. Payroll\n\
                   Florida Marlins,2011,1,1,1\n\
                   Miami Marlins,2011,2,2,2\n";
        fs::write(dir.path().join("att_2025.csv"), csv).unwrap();

        let data = prepare(&config_in(dir.path())).unwrap();
        assert_eq!(data.table.len(), 1);
        assert_eq!(data.table.records()[0].attendance, Some(1.0));
        assert!(data.warnings.contains(&PrepWarning::DuplicateTeamSeason {
            team: "Miami Marlins".into(),
            season: 2011,
        }));
    }

    #[test]
    fn no_source_degrades_to_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        assert!(matches!(
            prepare(&config),
            Err(DataError::DataSourceNotFound { .. })
        ));

        let data = prepare_or_degraded(&config);
        assert!(data.table.is_empty());
        assert!(data.table.teams().is_empty());
        assert!(data.source.is_none());
        assert!(matches!(
            data.warnings.as_slice(),
            [PrepWarning::DataUnavailable(_)]
        ));
    }
}
