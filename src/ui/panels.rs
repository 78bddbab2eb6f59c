use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::data::metrics::{format_usd, Metrics};
use crate::data::model::{CategoryValue, Dimension};
use crate::state::AppState;

/// A selection edit requested by the sidebar during this frame.
enum FilterAction {
    Toggle(Dimension, CategoryValue),
    SelectAll(Dimension),
    SelectNone(Dimension),
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let mut action = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for dim in Dimension::ALL {
                let all_values = state.dataset.available_values(dim);

                // Show count of selected / total in the header
                let n_selected = all_values
                    .iter()
                    .filter(|v| state.selection.is_selected(dim, v))
                    .count();
                let header_text = format!("{dim}  ({n_selected}/{})", all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.label())
                    .default_open(dim == Dimension::CompanyCountry)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                action = Some(FilterAction::SelectAll(dim));
                            }
                            if ui.small_button("None").clicked() {
                                action = Some(FilterAction::SelectNone(dim));
                            }
                        });

                        for val in all_values {
                            let mut text = RichText::new(val.to_string());
                            if dim == Dimension::RemoteType {
                                text = text.color(state.remote_colors.color_for(val));
                            }

                            let mut checked = state.selection.is_selected(dim, val);
                            if ui.checkbox(&mut checked, text).changed() {
                                action = Some(FilterAction::Toggle(dim, val.clone()));
                            }
                        }
                    });
            }
        });

    match action {
        Some(FilterAction::Toggle(dim, value)) => state.toggle_filter_value(dim, &value),
        Some(FilterAction::SelectAll(dim)) => state.select_all(dim),
        Some(FilterAction::SelectNone(dim)) => state.select_none(dim),
        None => {}
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top status bar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Salary Lens");
        ui.separator();
        ui.label(format!(
            "{} records loaded, {} visible",
            state.dataset.len(),
            state.visible_indices.len()
        ));
    });
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

fn metric_card(ui: &mut Ui, label: &str, value: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(180.0);
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new(label).small());
            ui.label(RichText::new(value).size(22.0).strong());
        });
    });
}

/// The four headline numbers above the charts.
pub fn metric_cards(ui: &mut Ui, metrics: &Metrics) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        metric_card(ui, "Mean salary (USD)", &format_usd(metrics.mean_salary));
        metric_card(ui, "Max salary (USD)", &format_usd(metrics.max_salary));
        metric_card(ui, "Records", &metrics.count.to_string());
        metric_card(ui, "Most frequent role", &metrics.modal_role);
    });
}
