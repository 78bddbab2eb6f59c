use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::aggregate::{
    mean_salary_by_country, remote_type_distribution, salary_histogram, top_roles_by_mean_salary,
    CategoryShare, ChartData, CountryMean, HistogramBin, RoleMean,
};
use crate::data::filter::{filter_dataset, FilterSelection, FilteredView};
use crate::data::metrics::{compute_metrics, Metrics};
use crate::data::model::{CategoryValue, Dataset, Dimension};

// ---------------------------------------------------------------------------
// Derived summaries
// ---------------------------------------------------------------------------

/// Everything the dashboard draws from one filtered view.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub metrics: Metrics,
    pub top_roles: ChartData<Vec<RoleMean>>,
    pub histogram: ChartData<Vec<HistogramBin>>,
    pub remote_types: ChartData<Vec<CategoryShare>>,
    pub countries: ChartData<Vec<CountryMean>>,
}

impl Summary {
    pub fn derive(view: &FilteredView<'_>, config: &DashboardConfig) -> Self {
        Summary {
            metrics: compute_metrics(view),
            top_roles: top_roles_by_mean_salary(view, config.top_roles),
            histogram: salary_histogram(view, config.histogram_bins),
            remote_types: remote_type_distribution(view),
            countries: mean_salary_by_country(view),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
///
/// The selection is the only thing that changes after startup; every change
/// goes through a method here that recomputes the view and summary.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset, read-only for the session.
    pub dataset: Dataset,

    /// Per-dimension filter selections.
    pub selection: FilterSelection,

    /// Indices of records passing the current selection.
    pub visible_indices: Vec<usize>,

    /// Metrics and chart data for the visible records.
    pub summary: Summary,

    /// Remote-type colours shared by the sidebar and the donut chart.
    pub remote_colors: ColorMap,
}

impl AppState {
    pub fn new(dataset: Dataset, config: DashboardConfig) -> Self {
        let selection = FilterSelection::initial(&dataset, &config.default_countries);
        let view = filter_dataset(&dataset, &selection);
        let summary = Summary::derive(&view, &config);
        let visible_indices = view.into_indices();
        let remote_colors = ColorMap::new(dataset.available_values(Dimension::RemoteType));

        Self {
            config,
            dataset,
            selection,
            visible_indices,
            summary,
            remote_colors,
        }
    }

    /// Recompute the visible records and every summary from scratch.
    pub fn refilter(&mut self) {
        let view = filter_dataset(&self.dataset, &self.selection);
        self.summary = Summary::derive(&view, &self.config);
        self.visible_indices = view.into_indices();
        log::debug!(
            "Filter changed: {} of {} records visible",
            self.visible_indices.len(),
            self.dataset.len()
        );
    }

    /// Toggle a single value in a dimension's selection.
    pub fn toggle_filter_value(&mut self, dimension: Dimension, value: &CategoryValue) {
        self.selection.toggle(dimension, value);
        self.refilter();
    }

    /// Select all values of a dimension.
    pub fn select_all(&mut self, dimension: Dimension) {
        self.selection.select_all(dimension, &self.dataset);
        self.refilter();
    }

    /// Deselect all values of a dimension.
    pub fn select_none(&mut self, dimension: Dimension) {
        self.selection.select_none(dimension);
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::metrics::NOT_APPLICABLE;
    use crate::data::model::tests::record;

    fn state() -> AppState {
        AppState::new(
            Dataset::from_records(vec![
                record(2023, "Data Scientist", "BRA", 90_000.0),
                record(2023, "Data Scientist", "USA", 150_000.0),
                record(2024, "Analyst", "BRA", 40_000.0),
                record(2024, "Engineer", "DEU", 80_000.0),
            ]),
            DashboardConfig::default(),
        )
    }

    #[test]
    fn starts_with_default_countries() {
        let s = state();
        assert_eq!(s.visible_indices, vec![0, 1, 2]);
        assert_eq!(s.summary.metrics.count, 3);
    }

    #[test]
    fn selection_changes_recompute_everything() {
        let mut s = state();
        s.toggle_filter_value(Dimension::Year, &CategoryValue::Integer(2024));
        assert_eq!(s.visible_indices, vec![0, 1]);
        assert_eq!(s.summary.metrics.mean_salary, 120_000.0);
        assert_eq!(s.summary.metrics.modal_role, "Data Scientist");

        s.select_all(Dimension::Year);
        s.select_all(Dimension::CompanyCountry);
        assert_eq!(s.visible_indices, vec![0, 1, 2, 3]);
        let countries = s.summary.countries.as_ready().unwrap();
        assert_eq!(countries.len(), 3);
    }

    #[test]
    fn empty_selection_reports_no_data() {
        let mut s = state();
        s.select_none(Dimension::ContractType);
        assert!(s.visible_indices.is_empty());
        assert_eq!(s.summary.metrics.modal_role, NOT_APPLICABLE);
        assert!(!s.summary.top_roles.is_ready());
        assert!(!s.summary.histogram.is_ready());
        assert!(!s.summary.remote_types.is_ready());
        assert!(!s.summary.countries.is_ready());
    }
}
