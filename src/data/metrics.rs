use std::collections::BTreeMap;

use super::filter::FilteredView;

/// Shown in place of the modal role when there is nothing to count.
pub const NOT_APPLICABLE: &str = "N/A";

/// Scalar summaries of a filtered view.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub mean_salary: f64,
    pub max_salary: f64,
    pub count: usize,
    pub modal_role: String,
}

impl Metrics {
    /// Values reported for an empty view.
    pub fn empty() -> Self {
        Metrics {
            mean_salary: 0.0,
            max_salary: 0.0,
            count: 0,
            modal_role: NOT_APPLICABLE.to_string(),
        }
    }
}

/// Mean and max salary, row count and most frequent role.
///
/// Among equally frequent roles the one that sorts first wins; callers should
/// treat the choice among ties as unspecified.
pub fn compute_metrics(view: &FilteredView<'_>) -> Metrics {
    if view.is_empty() {
        return Metrics::empty();
    }

    let mut total = 0.0;
    let mut max_salary = f64::NEG_INFINITY;
    let mut role_counts: BTreeMap<&str, usize> = BTreeMap::new();

    for record in view.records() {
        total += record.salary_usd;
        max_salary = max_salary.max(record.salary_usd);
        *role_counts.entry(record.role.as_str()).or_default() += 1;
    }

    let mut modal_role = NOT_APPLICABLE;
    let mut best = 0;
    for (role, count) in role_counts {
        if count > best {
            best = count;
            modal_role = role;
        }
    }

    Metrics {
        mean_salary: total / view.len() as f64,
        max_salary,
        count: view.len(),
        modal_role: modal_role.to_string(),
    }
}

/// Format a USD amount as `$1,234,567` (rounded, no decimals).
pub fn format_usd(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter_dataset, FilterSelection};
    use crate::data::model::tests::record;
    use crate::data::model::{CategoryValue, Dataset, Dimension};

    fn metrics_of(ds: &Dataset) -> Metrics {
        compute_metrics(&filter_dataset(ds, &FilterSelection::all(ds)))
    }

    #[test]
    fn empty_view_uses_fallbacks() {
        let ds = Dataset::from_records(vec![record(2023, "Analyst", "BRA", 10.0)]);
        let view = filter_dataset(&ds, &FilterSelection::default());
        let m = compute_metrics(&view);
        assert_eq!(m, Metrics::empty());
        assert_eq!(m.mean_salary, 0.0);
        assert_eq!(m.max_salary, 0.0);
        assert_eq!(m.count, 0);
        assert_eq!(m.modal_role, "N/A");
    }

    #[test]
    fn mean_of_single_and_pair() {
        let one = Dataset::from_records(vec![record(2023, "Analyst", "BRA", 42_000.0)]);
        assert_eq!(metrics_of(&one).mean_salary, 42_000.0);

        let two = Dataset::from_records(vec![
            record(2023, "Analyst", "BRA", 42_000.0),
            record(2023, "Analyst", "BRA", 58_000.0),
        ]);
        assert_eq!(metrics_of(&two).mean_salary, 50_000.0);
    }

    #[test]
    fn scenario_metrics() {
        let ds = Dataset::from_records(vec![
            record(2023, "Data Scientist", "BRA", 90_000.0),
            record(2023, "Data Scientist", "USA", 150_000.0),
            record(2024, "Analyst", "BRA", 40_000.0),
        ]);
        let mut selection = FilterSelection::all(&ds);
        selection.set(
            Dimension::Year,
            [CategoryValue::Integer(2023)].into_iter().collect(),
        );

        let m = compute_metrics(&filter_dataset(&ds, &selection));
        assert_eq!(m.mean_salary, 120_000.0);
        assert_eq!(m.max_salary, 150_000.0);
        assert_eq!(m.count, 2);
        assert_eq!(m.modal_role, "Data Scientist");
    }

    #[test]
    fn modal_role_prefers_most_frequent() {
        let ds = Dataset::from_records(vec![
            record(2023, "Engineer", "BRA", 1.0),
            record(2023, "Analyst", "BRA", 2.0),
            record(2023, "Engineer", "BRA", 3.0),
        ]);
        assert_eq!(metrics_of(&ds).modal_role, "Engineer");
    }

    #[test]
    fn format_usd_groups_thousands() {
        assert_eq!(format_usd(0.0), "$0");
        assert_eq!(format_usd(999.4), "$999");
        assert_eq!(format_usd(1_000.0), "$1,000");
        assert_eq!(format_usd(120_000.0), "$120,000");
        assert_eq!(format_usd(1_234_567.6), "$1,234,568");
        assert_eq!(format_usd(-2_500.0), "-$2,500");
    }
}
