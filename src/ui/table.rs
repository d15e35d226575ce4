use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};
use fcp_dashboard::data::overview::{ColumnInfo, NumericSummary};
use fcp_dashboard::format::format_number;
use fcp_dashboard::{CellValue, FundDataset};

use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

/// Preview, column information and numeric summary of the selected dataset.
pub fn dataset_tables(ui: &mut Ui, state: &AppState) {
    let (Some(dataset), Some(overview)) = (&state.dataset, &state.overview) else {
        return;
    };

    ui.strong(format!("Data preview – {}", overview.partition));
    egui::ScrollArea::horizontal()
        .id_salt("preview_scroll")
        .show(ui, |ui: &mut Ui| {
            ui.push_id("preview_table", |ui: &mut Ui| {
                preview_table(ui, dataset, state.preview_rows);
            });
        });
    ui.add_space(8.0);

    egui::CollapsingHeader::new("Column information")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.push_id("column_info", |ui: &mut Ui| column_info_table(ui, &overview.columns));
        });

    if !state.summaries.is_empty() {
        egui::CollapsingHeader::new("Descriptive statistics")
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                ui.push_id("describe", |ui: &mut Ui| summary_table(ui, &state.summaries));
            });
    }
}

fn cell_text(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        CellValue::Float(v) => format_number(*v, 4, ""),
        other => other.to_string(),
    }
}

fn preview_table(ui: &mut Ui, dataset: &FundDataset, n: usize) {
    let rows = dataset.head(n);
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(320.0)
        .columns(Column::auto().at_least(70.0), dataset.columns().len())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for name in dataset.columns() {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let cells = &rows[row.index()];
                for value in cells {
                    row.col(|ui| {
                        ui.label(cell_text(value));
                    });
                }
            });
        });
}

fn column_info_table(ui: &mut Ui, columns: &[ColumnInfo]) {
    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().at_least(90.0), 4)
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for title in ["Column", "Type", "Non-null values", "Unique values"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, columns.len(), |mut row| {
                let info = &columns[row.index()];
                row.col(|ui| {
                    ui.label(&info.name);
                });
                row.col(|ui| {
                    ui.label(info.kind.label());
                });
                row.col(|ui| {
                    ui.label(info.non_null.to_string());
                });
                row.col(|ui| {
                    ui.label(info.unique.to_string());
                });
            });
        });
}

fn summary_table(ui: &mut Ui, summaries: &[NumericSummary]) {
    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().at_least(80.0), 6)
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for title in ["Column", "Count", "Mean", "Std", "Min", "Max"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, summaries.len(), |mut row| {
                let s = &summaries[row.index()];
                row.col(|ui| {
                    ui.label(&s.column);
                });
                row.col(|ui| {
                    ui.label(s.count.to_string());
                });
                for v in [s.mean, s.std, s.min, s.max] {
                    row.col(|ui| {
                        ui.label(format_number(v, 2, ""));
                    });
                }
            });
        });
}
