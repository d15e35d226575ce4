use chrono::{Datelike, NaiveDate};
use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use fcp_dashboard::color::generate_palette;
use fcp_dashboard::data::layout::DatasetLayout;
use fcp_dashboard::data::loader::DATE_COLUMN;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// NAV chart (central panel)
// ---------------------------------------------------------------------------

/// One line per fund column, plotted against the `Date` column.
/// Only drawn for wide datasets, the net asset value layout.
pub fn nav_chart(ui: &mut Ui, state: &AppState) {
    let (Some(dataset), Some(overview)) = (&state.dataset, &state.overview) else {
        return;
    };
    let DatasetLayout::Wide { fund_columns } = &overview.layout else {
        return;
    };
    let Some(date_idx) = dataset.column_index(DATE_COLUMN) else {
        return;
    };

    let palette = generate_palette(fund_columns.len());

    ui.strong("Net asset values");
    Plot::new("nav_plot")
        .legend(Legend::default())
        .height(300.0)
        .x_axis_label("Date")
        .y_axis_label("NAV")
        .x_axis_formatter(|mark, _range| {
            NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (fund, color) in fund_columns.iter().zip(palette.iter()) {
                let Some(col) = dataset.column_index(fund) else {
                    continue;
                };

                let points: PlotPoints = dataset
                    .rows()
                    .iter()
                    .filter_map(|row| {
                        let date = row[date_idx].as_date()?;
                        let value = row[col].as_f64()?;
                        Some([date.num_days_from_ce() as f64, value])
                    })
                    .collect();

                let line = Line::new(points).name(fund).color(*color).width(1.5);
                plot_ui.line(line);
            }
        });
    ui.add_space(8.0);
}
