use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, LineStyle, Plot, PlotPoints, Points,
};

use crate::color::generate_palette;
use crate::data::query::{self, SeasonHistogram};
use crate::data::stats::{FiveNumberSummary, Regression};
use crate::state::{AppState, ChartKind, Tab};

use super::{optional, percent, placeholder, query_failed, tables, thousands};

const CHAMPION_GOLD: Color32 = Color32::from_rgb(255, 215, 0);
const FINALIST_SILVER: Color32 = Color32::from_rgb(192, 192, 192);

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the active tab's charts.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    if state.table().is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No attendance data  (File → Open attendance CSV…)");
        });
        return;
    }

    match state.tab {
        Tab::Team => team_tab(ui, state),
        Tab::Season => season_tab(ui, state),
        Tab::League => league_tab(ui, state),
        Tab::Payroll => payroll_tab(ui, state),
        Tab::Championships => championships_tab(ui, state),
    }
}

fn half_height(ui: &Ui) -> f32 {
    (ui.available_height() / 2.0 - 24.0).max(160.0)
}

// ---------------------------------------------------------------------------
// Team analysis
// ---------------------------------------------------------------------------

fn team_tab(ui: &mut Ui, state: &AppState) {
    let table = state.table();
    let metric = state.metric;
    ui.heading(format!("{} by Season", metric.label()));

    if state.selected_teams.is_empty() {
        placeholder(ui, "Select at least one team.");
        return;
    }

    let selected_rows = query::filter_by_teams(table, &state.selected_teams);
    ui.label(format!(
        "{} teams, {} team-seasons selected",
        state.selected_teams.len(),
        selected_rows.len()
    ));

    let teams: Vec<&String> = state.selected_teams.iter().collect();
    let bar_width = 0.8 / teams.len() as f64;

    Plot::new("team_metric_plot")
        .legend(Legend::default())
        .height(half_height(ui))
        .x_axis_label("Season")
        .y_axis_label(metric.label())
        .show(ui, |plot_ui| {
            for (i, team) in teams.iter().enumerate() {
                let series = query::team_metric_series(table, team, metric);
                let color = state.palette.color_for(team);
                match state.chart_kind {
                    ChartKind::Line => {
                        let points: PlotPoints =
                            series.iter().map(|&(s, v)| [f64::from(s), v]).collect();
                        plot_ui.line(Line::new(points).name(team).color(color).width(2.0));
                        let markers: PlotPoints =
                            series.iter().map(|&(s, v)| [f64::from(s), v]).collect();
                        plot_ui.points(Points::new(markers).name(team).color(color).radius(3.0));
                    }
                    ChartKind::Bar => {
                        let offset = (i as f64 - (teams.len() as f64 - 1.0) / 2.0) * bar_width;
                        let bars = series
                            .iter()
                            .map(|&(s, v)| {
                                Bar::new(f64::from(s) + offset, v)
                                    .width(bar_width)
                                    .name(format!("{team} {s}"))
                            })
                            .collect();
                        plot_ui.bar_chart(BarChart::new(bars).name(team).color(color));
                    }
                    ChartKind::Scatter => {
                        let points: PlotPoints =
                            series.iter().map(|&(s, v)| [f64::from(s), v]).collect();
                        plot_ui.points(Points::new(points).name(team).color(color).radius(5.0));
                    }
                }
            }
        });

    ui.add_space(8.0);

    // Attendance vs payroll for the first selected team.
    let team = teams[0];
    ui.heading(format!("{team} – Attendance vs Payroll"));
    let rows: Vec<_> = table
        .records()
        .iter()
        .filter(|r| &r.team == team)
        .filter_map(|r| Some((r.season, r.estimated_payroll?, r.attendance?, r.is_champion)))
        .collect();
    if rows.is_empty() {
        placeholder(ui, &format!("No complete payroll and attendance data for {team}."));
        return;
    }

    let fit = query::payroll_attendance_fit(table, Some(team.as_str()));
    if let Err(e) = &fit {
        query_failed(ui, "Trend line unavailable", e);
    }

    Plot::new("team_payroll_plot")
        .legend(Legend::default())
        .x_axis_label("Estimated Payroll ($)")
        .y_axis_label("Total Attendance")
        .show(ui, |plot_ui| {
            let color = state.palette.color_for(team);
            let regular: PlotPoints = rows
                .iter()
                .filter(|r| !r.3)
                .map(|&(_, x, y, _)| [x, y])
                .collect();
            plot_ui.points(Points::new(regular).name("Season").color(color).radius(5.0));
            let titles: PlotPoints = rows
                .iter()
                .filter(|r| r.3)
                .map(|&(_, x, y, _)| [x, y])
                .collect();
            plot_ui.points(Points::new(titles).name("Title season").color(CHAMPION_GOLD).radius(7.0));

            if let Ok(fit) = &fit {
                let xs = rows.iter().map(|r| r.1);
                if let Some(line) = trend_line(fit, xs) {
                    plot_ui.line(line);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Season analysis
// ---------------------------------------------------------------------------

fn season_tab(ui: &mut Ui, state: &AppState) {
    let table = state.table();
    let Some(season) = state.season else {
        placeholder(ui, "Select a season.");
        return;
    };

    let top = query::top_n_by_season(table, season, state.top_n, state.metric);
    ui.heading(format!(
        "Top {} Teams by {} in {season}",
        top.len(),
        state.metric.label()
    ));
    if top.is_empty() {
        placeholder(ui, &format!("No data for season {season}."));
        return;
    }

    Plot::new("top_teams_plot")
        .legend(Legend::default())
        .height(half_height(ui) * 0.8)
        .y_axis_label(state.metric.label())
        .show(ui, |plot_ui| {
            for (rank, record) in top.iter().enumerate() {
                let Some(value) = state.metric.value(record) else {
                    continue;
                };
                let bar = Bar::new(rank as f64 + 1.0, value)
                    .width(0.8)
                    .name(&record.team);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .name(&record.team)
                        .color(state.palette.color_for(&record.team)),
                );
            }
        });

    tables::ranking_table(ui, &top, state.metric);

    ui.add_space(8.0);
    ui.heading(format!("Team Performance Distribution in {season}"));
    let dist = query::season_distribution(table, season);
    ui.columns(2, |cols| {
        distribution_plot(&mut cols[0], "attendance_box", "Attendance", dist.attendance);
        distribution_plot(&mut cols[1], "payroll_box", "Payroll ($)", dist.payroll);
    });
}

fn distribution_plot(ui: &mut Ui, id: &str, name: &str, summary: Option<FiveNumberSummary>) {
    let Some(s) = summary else {
        placeholder(ui, &format!("No {name} values."));
        return;
    };
    ui.label(format!(
        "{name}: median {}, IQR {} – {}  (n = {})",
        thousands(s.median),
        thousands(s.q1),
        thousands(s.q3),
        s.count
    ));
    Plot::new(id).show(ui, |plot_ui| {
        let elem = BoxElem::new(0.0, BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max)).name(name);
        plot_ui.box_plot(BoxPlot::new(vec![elem]).name(name));
    });
}

// ---------------------------------------------------------------------------
// League trends
// ---------------------------------------------------------------------------

fn league_tab(ui: &mut Ui, state: &AppState) {
    let table = state.table();
    let agg = query::league_aggregate_by_season(table);

    ui.heading("League-Wide Attendance and Payroll Trends");
    ui.columns(3, |cols| {
        Plot::new("league_attendance_plot")
            .legend(Legend::default())
            .height(half_height(&cols[0]))
            .x_axis_label("Season")
            .show(&mut cols[0], |plot_ui| {
                let total: PlotPoints = agg
                    .iter()
                    .filter_map(|a| Some([f64::from(a.season), a.total_attendance?]))
                    .collect();
                plot_ui.line(
                    Line::new(total)
                        .name("Total Attendance")
                        .color(Color32::from_rgb(0, 123, 255))
                        .width(3.0),
                );
            });
        Plot::new("league_payroll_plot")
            .legend(Legend::default())
            .height(half_height(&cols[1]))
            .x_axis_label("Season")
            .show(&mut cols[1], |plot_ui| {
                let payroll: PlotPoints = agg
                    .iter()
                    .filter_map(|a| Some([f64::from(a.season), a.total_payroll?]))
                    .collect();
                plot_ui.line(
                    Line::new(payroll)
                        .name("Total Payroll")
                        .color(Color32::from_rgb(255, 99, 71))
                        .style(LineStyle::dashed_loose())
                        .width(3.0),
                );
            });
        Plot::new("league_per_game_plot")
            .legend(Legend::default())
            .height(half_height(&cols[2]))
            .x_axis_label("Season")
            .show(&mut cols[2], |plot_ui| {
                let per_game = agg
                    .iter()
                    .filter_map(|a| {
                        Some(Bar::new(f64::from(a.season), a.mean_attendance_per_game?).width(0.6))
                    })
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(per_game)
                        .name("Avg. Attendance Per Game")
                        .color(Color32::from_rgb(55, 83, 109)),
                );
            });
    });

    ui.add_space(8.0);
    ui.heading("Distribution of Attendance Per Game");
    if state.distribution_seasons.is_empty() {
        placeholder(ui, "Select at least one season.");
        return;
    }
    let hist =
        query::attendance_per_game_histogram(table, &state.distribution_seasons, state.config.histogram_bins);
    if hist.is_empty() {
        placeholder(ui, "No attendance-per-game values for the selected seasons.");
        return;
    }
    histogram_plot(ui, &hist);
}

fn histogram_plot(ui: &mut Ui, hist: &[SeasonHistogram]) {
    let colors = generate_palette(hist.len());
    Plot::new("per_game_histogram")
        .legend(Legend::default())
        .x_axis_label("Attendance Per Game")
        .y_axis_label("Density")
        .show(ui, |plot_ui| {
            for (h, color) in hist.iter().zip(colors) {
                let bars = h
                    .bins
                    .iter()
                    .map(|b| {
                        Bar::new((b.start + b.end) / 2.0, b.density)
                            .width(b.end - b.start)
                            .fill(color.gamma_multiply(0.6))
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(h.season).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Payroll analysis
// ---------------------------------------------------------------------------

fn payroll_tab(ui: &mut Ui, state: &AppState) {
    let table = state.table();
    ui.heading("Relationship Between Team Payroll and Attendance");

    let fit = query::payroll_attendance_fit(table, None);
    match &fit {
        Ok(fit) => {
            ui.label(RichText::new(format!(
                "Correlation r = {:.3}   (slope {:.4} fans per $, n = {})",
                fit.r, fit.slope, fit.n
            )));
        }
        Err(e) => query_failed(ui, "Correlation unavailable", e),
    }

    let seasons = table.seasons();
    let colors = generate_palette(seasons.len());
    Plot::new("payroll_correlation_plot")
        .legend(Legend::default())
        .height(half_height(ui))
        .x_axis_label("Estimated Payroll ($)")
        .y_axis_label("Total Attendance")
        .show(ui, |plot_ui| {
            for (season, color) in seasons.iter().zip(colors) {
                let points: PlotPoints = query::filter_by_season(table, *season)
                    .into_iter()
                    .filter_map(|r| Some([r.estimated_payroll?, r.attendance?]))
                    .collect();
                plot_ui.points(Points::new(points).name(season).color(color).radius(4.0));
            }
            if let Ok(fit) = &fit {
                let xs = table.records().iter().filter_map(|r| r.estimated_payroll);
                if let Some(line) = trend_line(fit, xs) {
                    plot_ui.line(line.name(format!("Trend (r={:.2})", fit.r)));
                }
            }
        });

    ui.add_space(8.0);
    let Some(team) = state.yoy_team.as_deref() else {
        placeholder(ui, "Select a team.");
        return;
    };
    ui.heading(format!("{team} – Year-over-Year Changes"));
    let yoy = query::year_over_year_change(table, team);
    if yoy.is_empty() {
        placeholder(
            ui,
            &format!("Insufficient data for {team} to calculate year-over-year changes."),
        );
        return;
    }

    tables::year_over_year_table(ui, &yoy);

    Plot::new("yoy_plot")
        .legend(Legend::default())
        .x_axis_label("Season")
        .y_axis_label("Year-over-Year % Change")
        .show(ui, |plot_ui| {
            let attendance: Vec<Bar> = yoy
                .iter()
                .filter_map(|y| Some(Bar::new(f64::from(y.season) - 0.2, y.attendance_pct?).width(0.4)))
                .collect();
            let payroll: Vec<Bar> = yoy
                .iter()
                .filter_map(|y| Some(Bar::new(f64::from(y.season) + 0.2, y.payroll_pct?).width(0.4)))
                .collect();
            plot_ui.bar_chart(
                BarChart::new(attendance)
                    .name("Attendance YoY % Change")
                    .color(Color32::from_rgb(0, 200, 0)),
            );
            plot_ui.bar_chart(
                BarChart::new(payroll)
                    .name("Payroll YoY % Change")
                    .color(Color32::from_rgb(200, 0, 0)),
            );
        });
}

// ---------------------------------------------------------------------------
// Championships
// ---------------------------------------------------------------------------

fn championships_tab(ui: &mut Ui, state: &AppState) {
    let table = state.table();
    ui.heading("Championship Impact Analysis");
    if !state.data.has_championships() {
        placeholder(ui, "Championship data not available.");
        return;
    }

    let premium = query::championship_premium(table);
    ui.label(format!(
        "Teams WITH championships average {} fans/season ({} teams)",
        optional(premium.champion_avg, thousands),
        premium.champion_teams
    ));
    ui.label(format!(
        "Teams WITHOUT championships average {} fans/season ({} teams)",
        optional(premium.non_champion_avg, thousands),
        premium.non_champion_teams
    ));
    ui.label(
        RichText::new(format!(
            "Championship premium: {} fans ({})",
            optional(premium.delta, thousands),
            optional(premium.percent_delta, percent)
        ))
        .strong(),
    );
    ui.label(format!(
        "Attendance change in the season after a title: {}",
        optional(query::post_championship_change(table), percent)
    ));

    ui.columns(2, |cols| {
        Plot::new("premium_plot")
            .height(half_height(&cols[0]))
            .y_axis_label("Average Attendance")
            .legend(Legend::default())
            .show(&mut cols[0], |plot_ui| {
                let mut bars = Vec::new();
                if let Some(v) = premium.champion_avg {
                    bars.push(Bar::new(0.0, v).name("With championships").fill(CHAMPION_GOLD));
                }
                if let Some(v) = premium.non_champion_avg {
                    bars.push(
                        Bar::new(1.0, v)
                            .name("Without championships")
                            .fill(FINALIST_SILVER),
                    );
                }
                plot_ui.bar_chart(BarChart::new(bars).width(0.6).name("Average attendance"));
            });

        let by_team = query::championships_by_team(table);
        Plot::new("titles_plot")
            .height(half_height(&cols[1]))
            .x_axis_label("Number of Championships")
            .show(&mut cols[1], |plot_ui| {
                let bars = by_team
                    .iter()
                    .rev()
                    .enumerate()
                    .map(|(i, c)| {
                        Bar::new(i as f64, c.titles as f64)
                            .name(&c.team)
                            .fill(CHAMPION_GOLD)
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).horizontal().width(0.7).name("Titles"));
            });
    });

    ui.add_space(8.0);
    ui.heading("Championships by Team");
    tables::championships_table(ui, &query::championships_by_team(table));
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A dashed fit line across the range of `xs`.
fn trend_line(fit: &Regression, xs: impl Iterator<Item = f64>) -> Option<Line<'_>> {
    let (lo, hi) = xs.fold(None, |acc: Option<(f64, f64)>, x| match acc {
        None => Some((x, x)),
        Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
    })?;
    let points: PlotPoints = [[lo, fit.predict(lo)], [hi, fit.predict(hi)]]
        .into_iter()
        .collect();
    Some(
        Line::new(points)
            .name("Trend")
            .color(Color32::BLACK)
            .style(LineStyle::dashed_loose())
            .width(1.5),
    )
}
