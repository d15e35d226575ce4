use eframe::egui;
use fcp_dashboard::DataStore;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FcpDashboardApp {
    pub state: AppState,
}

impl FcpDashboardApp {
    pub fn new(store: DataStore) -> Self {
        Self {
            state: AppState::new(store),
        }
    }
}

impl eframe::App for FcpDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and source ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: selector and metrics ----
        egui::SidePanel::left("overview_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart and tables ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    plot::nav_chart(ui, &self.state);
                    table::dataset_tables(ui, &self.state);
                });
        });
    }
}
