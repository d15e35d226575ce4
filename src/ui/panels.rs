use eframe::egui::{self, Color32, RichText, Ui};
use fcp_dashboard::color::hex_to_color32;
use fcp_dashboard::config::{ACCENT_COLOR, PRIMARY_COLOR, SECONDARY_COLOR};
use fcp_dashboard::format::format_number;

use crate::state::{AppState, MAX_PREVIEW_ROWS, MIN_PREVIEW_ROWS};

fn brand(hex: &str, alpha: f64) -> Color32 {
    hex_to_color32(hex, alpha).unwrap_or(Color32::GRAY)
}

// ---------------------------------------------------------------------------
// Top bar – title, source and status
// ---------------------------------------------------------------------------

pub fn top_bar(ui: &mut Ui, state: &AppState) {
    let config = state.store.config();
    ui.horizontal(|ui: &mut Ui| {
        ui.heading(
            RichText::new("FCP Analysis – Dashboard")
                .color(brand(PRIMARY_COLOR, 1.0))
                .strong(),
        );
        ui.separator();
        ui.label(format!("{} ({})", config.file_name(), config.format().label()));
    });

    if let Some(msg) = &state.status_message {
        ui.colored_label(Color32::from_rgb(200, 60, 60), msg);
    }
}

// ---------------------------------------------------------------------------
// Left side panel – partition selector and metric cards
// ---------------------------------------------------------------------------

pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data overview");
    ui.separator();

    if state.store.config().is_csv() {
        ui.label(format!(
            "CSV source detected – file: {}",
            state.store.config().file_name()
        ));
    } else {
        partition_selector(ui, state);
    }

    ui.add_space(6.0);
    ui.add(
        egui::Slider::new(&mut state.preview_rows, MIN_PREVIEW_ROWS..=MAX_PREVIEW_ROWS)
            .step_by(5.0)
            .text("rows to show"),
    );
    ui.separator();

    let Some(overview) = &state.overview else {
        ui.label("No dataset loaded.");
        return;
    };

    metric(ui, "Number of FCP", overview.fund_count.to_string());
    match &overview.date_range {
        Some(range) => {
            metric(ui, "Period (days)", range.days.to_string());
            metric(ui, "Start date", range.start.format("%Y-%m-%d").to_string());
            metric(ui, "End date", range.end.format("%Y-%m-%d").to_string());
        }
        None => {
            metric(ui, "Rows", overview.row_count.to_string());
            metric(ui, "Columns", overview.column_count.to_string());
            metric(ui, "Sheet", overview.partition.clone());
        }
    }

    ui.add_space(6.0);
    ui.label(RichText::new(format!("Layout: {}", overview.layout.label())).small());
    ui.label(RichText::new(format!("Observations: {}", overview.row_count)).small());

    if !state.performance.is_empty() {
        ui.separator();
        ui.strong("Return over the period");
        for perf in &state.performance {
            ui.horizontal(|ui: &mut Ui| {
                ui.label(&perf.fund);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
                    ui.strong(format_number(perf.total_return_pct, 2, "%"));
                });
            });
        }
    }
}

fn partition_selector(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Sheet to preview");
    let current = state.selected.clone().unwrap_or_default();
    let mut clicked: Option<String> = None;

    egui::ComboBox::from_id_salt("partition")
        .selected_text(&current)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for name in &state.partitions {
                if ui.selectable_label(current == *name, name).clicked() {
                    clicked = Some(name.clone());
                }
            }
        });

    if let Some(name) = clicked.filter(|name| *name != current) {
        state.select_partition(&name);
    }
}

/// A small bordered card with a label and a large value.
fn metric(ui: &mut Ui, label: &str, value: String) {
    egui::Frame::group(ui.style())
        .fill(brand(ACCENT_COLOR, 0.25))
        .stroke(egui::Stroke::new(1.0, brand(SECONDARY_COLOR, 1.0)))
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(label).small());
            ui.label(
                RichText::new(value)
                    .size(20.0)
                    .strong()
                    .color(brand(PRIMARY_COLOR, 1.0)),
            );
        });
    ui.add_space(3.0);
}
