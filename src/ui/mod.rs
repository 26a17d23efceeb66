pub mod panels;
pub mod plot;
pub mod tables;

use eframe::egui::{Color32, RichText, Ui};

use crate::data::error::QueryError;

/// Shown where a chart has nothing to draw because nothing is selected.
pub fn placeholder(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).italics().color(Color32::GRAY));
}

/// Shown where a query ran and failed.
pub fn query_failed(ui: &mut Ui, what: &str, err: &QueryError) {
    ui.colored_label(Color32::from_rgb(200, 60, 60), format!("{what}: {err}"));
}

/// `1234567.8` → `"1,234,568"`.
pub fn thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0.0 {
        out.insert(0, '-');
    }
    out
}

pub fn optional(value: Option<f64>, fmt: impl Fn(f64) -> String) -> String {
    value.map(fmt).unwrap_or_else(|| "n/a".to_string())
}

pub fn percent(value: f64) -> String {
    format!("{value:+.1}%")
}
