use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Metric;
use crate::state::{AppState, ChartKind, Tab};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu, dataset summary and tab strip.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open attendance CSV…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let table = state.table();
        match &state.data.source {
            Some(path) => ui.label(format!(
                "{} team-seasons, {} teams, {} seasons  ({})",
                table.len(),
                table.teams().len(),
                table.seasons().len(),
                path.display()
            )),
            None => ui.label("No data loaded"),
        };

        if !state.data.has_championships() && !table.is_empty() {
            ui.separator();
            ui.label(RichText::new("No championship data").color(Color32::GOLD));
        }

        let warnings = &state.data.warnings;
        if !warnings.is_empty() {
            ui.separator();
            let details = warnings
                .iter()
                .map(|w| w.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            ui.label(RichText::new(format!("⚠ {} warnings", warnings.len())).color(Color32::GOLD))
                .on_hover_text(details);
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.label());
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – per-tab selectors
// ---------------------------------------------------------------------------

/// Render the selectors for the active tab.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Selection");
    ui.separator();

    if state.table().is_empty() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let tab = state.tab;
            match tab {
                Tab::Team => team_selectors(ui, state),
                Tab::Season => season_selectors(ui, state),
                Tab::League => league_selectors(ui, state),
                Tab::Payroll => payroll_selectors(ui, state),
                Tab::Championships => {
                    ui.label("League-wide; no selection needed.");
                }
            }
        });
}

fn team_selectors(ui: &mut Ui, state: &mut AppState) {
    metric_combo(ui, "team_metric", &mut state.metric);

    ui.strong("Chart type");
    ui.horizontal(|ui: &mut Ui| {
        for kind in ChartKind::ALL {
            ui.radio_value(&mut state.chart_kind, kind, kind.label());
        }
    });
    ui.separator();

    let teams = state.table().teams().to_vec();
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(format!("Teams  ({}/{})", state.selected_teams.len(), teams.len()));
        if ui.small_button("All").clicked() {
            state.select_all_teams();
        }
        if ui.small_button("None").clicked() {
            state.select_no_teams();
        }
    });

    for team in &teams {
        let mut checked = state.selected_teams.contains(team);
        let text = RichText::new(team).color(state.palette.color_for(team));
        if ui.checkbox(&mut checked, text).changed() {
            state.toggle_team(team);
        }
    }
}

fn season_selectors(ui: &mut Ui, state: &mut AppState) {
    let seasons = state.table().seasons().to_vec();
    ui.strong("Season");
    egui::ComboBox::from_id_salt("season")
        .selected_text(state.season.map(|s| s.to_string()).unwrap_or_default())
        .show_ui(ui, |ui: &mut Ui| {
            for season in seasons.iter().rev() {
                ui.selectable_value(&mut state.season, Some(*season), season.to_string());
            }
        });
    ui.separator();

    metric_combo(ui, "ranking_metric", &mut state.metric);
    ui.strong("Teams to display");
    ui.add(egui::Slider::new(&mut state.top_n, 5..=30));
}

fn league_selectors(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Seasons (distribution)");
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.distribution_seasons = state.table().seasons().iter().copied().collect();
        }
        if ui.small_button("None").clicked() {
            state.distribution_seasons.clear();
        }
    });
    let seasons = state.table().seasons().to_vec();
    for season in seasons.iter().rev() {
        let mut checked = state.distribution_seasons.contains(season);
        if ui.checkbox(&mut checked, season.to_string()).changed() {
            state.toggle_distribution_season(*season);
        }
    }
}

fn payroll_selectors(ui: &mut Ui, state: &mut AppState) {
    let teams = state.table().teams().to_vec();
    ui.strong("Team (year-over-year)");
    egui::ComboBox::from_id_salt("yoy_team")
        .selected_text(state.yoy_team.clone().unwrap_or_default())
        .width(200.0)
        .show_ui(ui, |ui: &mut Ui| {
            for team in &teams {
                ui.selectable_value(&mut state.yoy_team, Some(team.clone()), team.as_str());
            }
        });
}

fn metric_combo(ui: &mut Ui, id: &str, metric: &mut Metric) {
    ui.strong("Metric");
    egui::ComboBox::from_id_salt(id)
        .selected_text(metric.label())
        .width(220.0)
        .show_ui(ui, |ui: &mut Ui| {
            for m in Metric::ALL {
                ui.selectable_value(metric, m, m.label());
            }
        });
    ui.separator();
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open attendance data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.reload_from(path);
    }
}
