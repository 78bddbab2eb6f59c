use eframe::egui;

use crate::state::AppState;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalaryLensApp {
    pub state: AppState,
}

impl SalaryLensApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SalaryLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: record counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.heading("IT Salary Analysis");
                    ui.label("Salaries of IT professionals around the world.");
                    ui.add_space(8.0);

                    panels::metric_cards(ui, &self.state.summary.metrics);
                    ui.separator();

                    charts::chart_grid(ui, &self.state);
                    ui.separator();

                    ui.heading("Data table");
                    table::records_table(ui, &self.state);
                });
        });
    }
}
