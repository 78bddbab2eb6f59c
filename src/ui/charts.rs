use std::f64::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoint, Polygon, Text};

use crate::color::{heat_color, normalize};
use crate::data::aggregate::{CategoryShare, ChartData, CountryMean, HistogramBin, RoleMean};
use crate::data::metrics::format_usd;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 300.0;
const BAR_COLOR: Color32 = Color32::from_rgb(0xE4, 0x1A, 0x1C);
const NO_DATA: &str = "No data to display, try adjusting the filters";
const NO_DATA_COLOR: Color32 = Color32::from_rgb(0xE0, 0xA0, 0x00);

/// Segments used to approximate a full donut ring.
const DONUT_SEGMENTS: usize = 180;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Two rows of two charts.
pub fn chart_grid(ui: &mut Ui, state: &AppState) {
    let summary = &state.summary;

    let top_title = top_roles_title(state.config.top_roles);

    ui.columns(2, |cols| {
        chart_slot(&mut cols[0], &top_title, &summary.top_roles, top_roles_chart);
        chart_slot(
            &mut cols[1],
            "Salary distribution",
            &summary.histogram,
            histogram_chart,
        );
    });
    ui.add_space(8.0);
    ui.columns(2, |cols| {
        chart_slot(
            &mut cols[0],
            "Remote vs on-site work",
            &summary.remote_types,
            |ui, shares| remote_donut(ui, shares, state),
        );
        chart_slot(
            &mut cols[1],
            "Mean salary by country",
            &summary.countries,
            country_chart,
        );
    });
}

fn top_roles_title(limit: usize) -> String {
    format!("Top {limit} roles by mean salary")
}

/// Title plus either the chart or the "no data" notice.
fn chart_slot<T>(
    ui: &mut Ui,
    title: &str,
    data: &ChartData<Vec<T>>,
    draw: impl FnOnce(&mut Ui, &[T]),
) {
    ui.strong(title);
    match data.as_ready() {
        Some(rows) => draw(ui, rows),
        None => {
            ui.colored_label(NO_DATA_COLOR, RichText::new(NO_DATA));
        }
    }
}

/// Label integer grid marks with the matching category name.
fn category_axis(names: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        names.get(idx as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

fn top_roles_chart(ui: &mut Ui, roles: &[RoleMean]) {
    // Highest mean at the top of the chart.
    let ordered: Vec<&RoleMean> = roles.iter().rev().collect();
    let bars: Vec<Bar> = ordered
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new(i as f64, r.mean_salary)
                .name(format!("{}: {}", r.role, format_usd(r.mean_salary)))
                .fill(BAR_COLOR)
                .width(0.7)
        })
        .collect();
    let names = ordered.iter().map(|r| r.role.clone()).collect();

    Plot::new("top_roles_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Mean salary (USD)")
        .y_axis_formatter(category_axis(names))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name("Mean salary"));
        });
}

fn histogram_chart(ui: &mut Ui, bins: &[HistogramBin]) {
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new((b.lower + b.upper) / 2.0, b.count as f64)
                .width(b.upper - b.lower)
                .name(format!("{} – {}", format_usd(b.lower), format_usd(b.upper)))
        })
        .collect();

    Plot::new("salary_histogram_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Salary (USD)")
        .y_axis_label("Professionals")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR));
        });
}

/// Corners of one ring segment from angle `a0` to `a1`, clockwise from 12 o'clock.
fn ring_segment(a0: f64, a1: f64, inner: f64, outer: f64) -> Vec<[f64; 2]> {
    let at = |angle: f64, r: f64| {
        let theta = FRAC_PI_2 - angle;
        [r * theta.cos(), r * theta.sin()]
    };
    vec![at(a0, outer), at(a1, outer), at(a1, inner), at(a0, inner)]
}

fn remote_donut(ui: &mut Ui, shares: &[CategoryShare], state: &AppState) {
    let (inner, outer) = (0.5, 1.0);

    Plot::new("remote_donut_plot")
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for share in shares {
                let sweep = share.share * TAU;
                let color = state.remote_colors.color_for_text(&share.category);
                let label = format!("{} ({})", share.category, share.count);

                // Split into small convex pieces so each polygon fills correctly.
                let pieces = ((share.share * DONUT_SEGMENTS as f64).ceil() as usize).max(1);
                let step = sweep / pieces as f64;
                for p in 0..pieces {
                    let a0 = start + step * p as f64;
                    let polygon = Polygon::new(ring_segment(a0, a0 + step, inner, outer))
                        .fill_color(color)
                        .stroke(Stroke::new(0.0, color))
                        .name(&label);
                    plot_ui.polygon(polygon);
                }

                let mid = FRAC_PI_2 - (start + sweep / 2.0);
                let r = (inner + outer) / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(r * mid.cos(), r * mid.sin()),
                    RichText::new(format!("{:.1}%", share.share * 100.0))
                        .color(Color32::WHITE),
                ));
                start += sweep;
            }
        });
}

fn country_chart(ui: &mut Ui, rows: &[CountryMean]) {
    let (min, max) = rows
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.mean_salary), hi.max(r.mean_salary))
        });

    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new(i as f64, r.mean_salary)
                .name(format!(
                    "{}: {} ({} records)",
                    r.country,
                    format_usd(r.mean_salary),
                    r.count
                ))
                .fill(heat_color(normalize(r.mean_salary, min, max)))
                .width(0.7)
        })
        .collect();
    let codes = rows.iter().map(|r| r.country.clone()).collect();

    Plot::new("country_mean_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Mean salary (USD)")
        .y_axis_formatter(category_axis(codes))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name("Mean salary"));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_axis_labels_only_integer_marks() {
        let fmt = category_axis(vec!["BRA".to_string(), "USA".to_string()]);
        let range = 0.0..=1.0;
        let mark = |value| GridMark {
            value,
            step_size: 0.5,
        };
        assert_eq!(fmt(mark(0.0), &range), "BRA");
        assert_eq!(fmt(mark(1.0), &range), "USA");
        assert_eq!(fmt(mark(0.5), &range), "");
        assert_eq!(fmt(mark(2.0), &range), "");
        assert_eq!(fmt(mark(-1.0), &range), "");
    }

    #[test]
    fn top_roles_title_follows_limit() {
        assert_eq!(top_roles_title(10), "Top 10 roles by mean salary");
        assert_eq!(top_roles_title(5), "Top 5 roles by mean salary");
    }
}
