use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::{AttendanceRecord, Metric};
use crate::data::query::{TeamChampionships, YearOverYear};

use super::{optional, percent, thousands};

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Season ranking
// ---------------------------------------------------------------------------

pub fn ranking_table(ui: &mut Ui, rows: &[&AttendanceRecord], metric: Metric) {
    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(220.0)
        .column(Column::exact(32.0))
        .column(Column::auto().at_least(180.0))
        .column(Column::remainder())
        .column(Column::exact(28.0))
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            header.col(|ui| {
                ui.strong("Team");
            });
            header.col(|ui| {
                ui.strong(metric.label());
            });
            header.col(|ui| {
                ui.strong("");
            });
        })
        .body(|mut body| {
            for (rank, record) in rows.iter().enumerate() {
                body.row(ROW_HEIGHT, |mut row| {
                    row.col(|ui| {
                        ui.label((rank + 1).to_string());
                    });
                    row.col(|ui| {
                        ui.label(&record.team);
                    });
                    row.col(|ui| {
                        ui.label(optional(metric.value(record), thousands));
                    });
                    row.col(|ui| {
                        if record.is_champion {
                            ui.label("🏆").on_hover_text("Won the championship");
                        } else if record.is_finalist {
                            ui.label("🥈").on_hover_text("Lost the championship series");
                        }
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Year-over-year
// ---------------------------------------------------------------------------

pub fn year_over_year_table(ui: &mut Ui, rows: &[YearOverYear]) {
    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(220.0)
        .column(Column::exact(60.0))
        .columns(Column::auto().at_least(110.0), 4)
        .header(20.0, |mut header| {
            for title in ["Season", "Efficiency", "Attendance Δ", "Payroll Δ", "Efficiency Δ"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for y in rows {
                body.row(ROW_HEIGHT, |mut row| {
                    row.col(|ui| {
                        ui.label(y.season.to_string());
                    });
                    row.col(|ui| {
                        ui.label(optional(y.efficiency, thousands));
                    });
                    row.col(|ui| {
                        ui.label(optional(y.attendance_pct, percent));
                    });
                    row.col(|ui| {
                        ui.label(optional(y.payroll_pct, percent));
                    });
                    row.col(|ui| {
                        ui.label(optional(y.efficiency_pct, percent));
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Championships
// ---------------------------------------------------------------------------

pub fn championships_table(ui: &mut Ui, rows: &[TeamChampionships]) {
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(180.0))
        .columns(Column::auto().at_least(90.0), 3)
        .header(20.0, |mut header| {
            for title in ["Team", "Titles", "Finals lost", "Avg. attendance"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for c in rows {
                body.row(ROW_HEIGHT, |mut row| {
                    row.col(|ui| {
                        ui.label(&c.team);
                    });
                    row.col(|ui| {
                        ui.label(c.titles.to_string());
                    });
                    row.col(|ui| {
                        ui.label(c.finals_lost.to_string());
                    });
                    row.col(|ui| {
                        ui.label(optional(c.mean_attendance, thousands));
                    });
                });
            }
        });
}
