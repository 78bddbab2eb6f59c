use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::metrics::format_usd;
use crate::state::AppState;

const HEADERS: [&str; 8] = [
    "Year",
    "Role",
    "Seniority",
    "Remote type",
    "Contract",
    "Company size",
    "Country",
    "Salary (USD)",
];

const ROW_HEIGHT: f32 = 18.0;

/// The visible records, in dataset order.
pub fn records_table(ui: &mut Ui, state: &AppState) {
    if state.visible_indices.is_empty() {
        ui.label("No records match the current filters.");
        return;
    }

    let records = state.dataset.records();

    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(400.0)
        .column(Column::auto())
        .column(Column::remainder().at_least(160.0))
        .columns(Column::auto(), HEADERS.len() - 2)
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, state.visible_indices.len(), |mut row| {
                let record = &records[state.visible_indices[row.index()]];
                row.col(|ui| {
                    ui.label(record.year.to_string());
                });
                row.col(|ui| {
                    ui.label(&record.role);
                });
                row.col(|ui| {
                    ui.label(&record.seniority);
                });
                row.col(|ui| {
                    ui.label(&record.remote_type);
                });
                row.col(|ui| {
                    ui.label(&record.contract_type);
                });
                row.col(|ui| {
                    ui.label(&record.company_size);
                });
                row.col(|ui| {
                    ui.label(&record.company_country);
                });
                row.col(|ui| {
                    ui.label(format_usd(record.salary_usd));
                });
            });
        });
}
