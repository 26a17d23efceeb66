use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AttendanceRecord – one team-season
// ---------------------------------------------------------------------------

/// A single team-season row of the prepared table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRecord {
    /// Canonical organization name.
    pub team: String,
    pub season: i32,
    /// Total season attendance.
    pub attendance: Option<f64>,
    pub attendance_per_game: Option<f64>,
    /// Estimated payroll in currency units.
    pub estimated_payroll: Option<f64>,
    /// Attendance per million of payroll (derived).
    pub efficiency: Option<f64>,
    pub is_champion: bool,
    pub is_finalist: bool,
}

impl AttendanceRecord {
    /// A raw row as read from disk: nothing derived, no championship flags.
    pub fn raw(
        team: impl Into<String>,
        season: i32,
        attendance: Option<f64>,
        attendance_per_game: Option<f64>,
        estimated_payroll: Option<f64>,
    ) -> Self {
        AttendanceRecord {
            team: team.into(),
            season,
            attendance,
            attendance_per_game,
            estimated_payroll,
            efficiency: None,
            is_champion: false,
            is_finalist: false,
        }
    }
}

// ---------------------------------------------------------------------------
// ChampionshipRecord – one final series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChampionshipRecord {
    pub season: i32,
    pub winner: String,
    pub loser: String,
    /// Free text, e.g. "4-3".
    pub series_score: String,
}

// ---------------------------------------------------------------------------
// Metric – a selectable numeric column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Metric {
    #[default]
    Attendance,
    AttendancePerGame,
    EstimatedPayroll,
    Efficiency,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Attendance,
        Metric::AttendancePerGame,
        Metric::EstimatedPayroll,
        Metric::Efficiency,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Attendance => "Total Attendance",
            Metric::AttendancePerGame => "Attendance Per Game",
            Metric::EstimatedPayroll => "Estimated Payroll ($)",
            Metric::Efficiency => "Attendance per Million $ of Payroll",
        }
    }

    /// Read this metric from a row.
    pub fn value(self, record: &AttendanceRecord) -> Option<f64> {
        match self {
            Metric::Attendance => record.attendance,
            Metric::AttendancePerGame => record.attendance_per_game,
            Metric::EstimatedPayroll => record.estimated_payroll,
            Metric::Efficiency => record.efficiency,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// AttendanceTable – the prepared, read-only dataset
// ---------------------------------------------------------------------------

/// The prepared table plus the team and season vocabularies the UI offers.
///
/// Rows are sorted by `(team, season)` and never change after construction.
#[derive(Debug, Clone, Default)]
pub struct AttendanceTable {
    records: Vec<AttendanceRecord>,
    championships: Vec<ChampionshipRecord>,
    teams: Vec<String>,
    seasons: Vec<i32>,
}

impl AttendanceTable {
    /// Build the table and its indices from fully prepared rows.
    pub fn new(mut records: Vec<AttendanceRecord>, championships: Vec<ChampionshipRecord>) -> Self {
        records.sort_by(|a, b| a.team.cmp(&b.team).then(a.season.cmp(&b.season)));

        let teams: BTreeSet<&str> = records
            .iter()
            .map(|r| r.team.as_str())
            .filter(|t| !t.is_empty())
            .collect();
        let seasons: BTreeSet<i32> = records.iter().map(|r| r.season).collect();

        AttendanceTable {
            teams: teams.into_iter().map(str::to_string).collect(),
            seasons: seasons.into_iter().collect(),
            records,
            championships,
        }
    }

    /// The degraded-mode table: no rows, no teams, no seasons.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    /// Normalized championship rows the table was annotated with.
    pub fn championships(&self) -> &[ChampionshipRecord] {
        &self.championships
    }

    /// Distinct team names, sorted lexicographically.
    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    /// Distinct seasons, ascending.
    pub fn seasons(&self) -> &[i32] {
        &self.seasons
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabularies_are_sorted_and_distinct() {
        let table = AttendanceTable::new(
            vec![
                AttendanceRecord::raw("Texas Rangers", 2002, Some(1.0), None, None),
                AttendanceRecord::raw("Boston Red Sox", 2002, Some(2.0), None, None),
                AttendanceRecord::raw("Boston Red Sox", 2001, Some(3.0), None, None),
            ],
            Vec::new(),
        );
        assert_eq!(table.teams(), ["Boston Red Sox", "Texas Rangers"]);
        assert_eq!(table.seasons(), [2001, 2002]);
        assert_eq!(table.records()[0].season, 2001);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn empty_table_has_no_vocabulary() {
        let table = AttendanceTable::empty();
        assert!(table.is_empty());
        assert!(table.teams().is_empty());
        assert!(table.seasons().is_empty());
    }

    #[test]
    fn metric_reads_matching_column() {
        let mut r = AttendanceRecord::raw("A", 2000, Some(10.0), Some(2.0), Some(5.0));
        r.efficiency = Some(7.0);
        let values: Vec<_> = Metric::ALL.iter().map(|m| m.value(&r)).collect();
        assert_eq!(values, [Some(10.0), Some(2.0), Some(5.0), Some(7.0)]);
    }
}
