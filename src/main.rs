mod app;
mod state;
mod ui;

use app::FcpDashboardApp;
use eframe::egui;
use fcp_dashboard::{DataSourceConfig, DataStore};

fn main() -> eframe::Result {
    env_logger::init();

    // Resolved once; the store owns it for the rest of the process.
    let store = DataStore::new(DataSourceConfig::from_env());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "FCP Analysis – Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(FcpDashboardApp::new(store)))),
    )
}
