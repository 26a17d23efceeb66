use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Context;

use crate::color::TeamPalette;
use crate::config::DashboardConfig;
use crate::data::model::{AttendanceTable, Metric};
use crate::data::prepare::{prepare, PreparedData};

// ---------------------------------------------------------------------------
// Selections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Team,
    Season,
    League,
    Payroll,
    Championships,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Team,
        Tab::Season,
        Tab::League,
        Tab::Payroll,
        Tab::Championships,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Team => "Team Analysis",
            Tab::Season => "Season Analysis",
            Tab::League => "League Trends",
            Tab::Payroll => "Payroll Analysis",
            Tab::Championships => "Championships",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
    Scatter,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Line, ChartKind::Bar, ChartKind::Scatter];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Line => "Line",
            ChartKind::Bar => "Bar",
            ChartKind::Scatter => "Scatter",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// The prepared snapshot. Replaced wholesale on reload, never edited.
    pub data: PreparedData,
    pub config: DashboardConfig,
    pub palette: TeamPalette,

    pub tab: Tab,
    pub selected_teams: BTreeSet<String>,
    pub metric: Metric,
    pub chart_kind: ChartKind,
    pub season: Option<i32>,
    pub top_n: usize,
    pub distribution_seasons: BTreeSet<i32>,
    pub yoy_team: Option<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(data: PreparedData, config: DashboardConfig) -> Self {
        let mut state = AppState {
            data: PreparedData::default(),
            top_n: config.default_top_n,
            config,
            palette: TeamPalette::default(),
            tab: Tab::default(),
            selected_teams: BTreeSet::new(),
            metric: Metric::default(),
            chart_kind: ChartKind::default(),
            season: None,
            distribution_seasons: BTreeSet::new(),
            yoy_team: None,
            status_message: None,
        };
        state.set_data(data);
        state
    }

    pub fn table(&self) -> &AttendanceTable {
        &self.data.table
    }

    /// Install a new snapshot and reset selections to its first team and
    /// latest season.
    pub fn set_data(&mut self, data: PreparedData) {
        let table = &data.table;
        let first_team = table.teams().first().cloned();
        let last_season = table.seasons().last().copied();

        self.palette = TeamPalette::new(table.teams());
        self.selected_teams = first_team.iter().cloned().collect();
        self.yoy_team = first_team;
        self.season = last_season;
        self.distribution_seasons = last_season.into_iter().collect();
        self.status_message = data
            .warnings
            .iter()
            .find(|w| matches!(w, crate::data::error::PrepWarning::DataUnavailable(_)))
            .map(|w| w.to_string());
        self.data = data;
    }

    /// Rebuild the snapshot from a user-chosen attendance file.
    pub fn reload_from(&mut self, path: PathBuf) {
        let config = self.config.with_attendance_source(path.clone());
        match prepare(&config).with_context(|| format!("loading {}", path.display())) {
            Ok(data) => {
                log::info!("Reloaded {} records", data.table.len());
                self.set_data(data);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    pub fn toggle_team(&mut self, team: &str) {
        if !self.selected_teams.remove(team) {
            self.selected_teams.insert(team.to_string());
        }
    }

    pub fn select_all_teams(&mut self) {
        self.selected_teams = self.data.table.teams().iter().cloned().collect();
    }

    pub fn select_no_teams(&mut self) {
        self.selected_teams.clear();
    }

    pub fn toggle_distribution_season(&mut self, season: i32) {
        if !self.distribution_seasons.remove(&season) {
            self.distribution_seasons.insert(season);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::AttendanceRecord;

    fn data() -> PreparedData {
        PreparedData {
            table: AttendanceTable::new(
                vec![
                    AttendanceRecord::raw("B", 2001, Some(1.0), None, None),
                    AttendanceRecord::raw("A", 2002, Some(1.0), None, None),
                ],
                Vec::new(),
            ),
            ..PreparedData::default()
        }
    }

    #[test]
    fn new_state_selects_first_team_and_latest_season() {
        let state = AppState::new(data(), DashboardConfig::default());
        assert_eq!(state.selected_teams, BTreeSet::from(["A".to_string()]));
        assert_eq!(state.yoy_team.as_deref(), Some("A"));
        assert_eq!(state.season, Some(2002));
        assert_eq!(state.top_n, 10);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn degraded_snapshot_has_no_selection_and_a_message() {
        let state = AppState::new(PreparedData::degraded("nothing".into()), DashboardConfig::default());
        assert!(state.selected_teams.is_empty());
        assert_eq!(state.season, None);
        assert!(state.status_message.is_some());
    }

    #[test]
    fn team_toggles() {
        let mut state = AppState::new(data(), DashboardConfig::default());
        state.toggle_team("B");
        assert_eq!(state.selected_teams.len(), 2);
        state.toggle_team("A");
        assert_eq!(state.selected_teams.len(), 1);
        state.select_no_teams();
        assert!(state.selected_teams.is_empty());
        state.select_all_teams();
        assert_eq!(state.selected_teams.len(), 2);
    }

    #[test]
    fn failed_reload_keeps_current_snapshot() {
        let mut state = AppState::new(data(), DashboardConfig::default());
        state.reload_from(PathBuf::from("/definitely/not/here.csv"));
        assert_eq!(state.table().len(), 2);
        let message = state.status_message.unwrap();
        assert!(message.starts_with("Error: loading /definitely/not/here.csv: "), "{message}");
    }
}
