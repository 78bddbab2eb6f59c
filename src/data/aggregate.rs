//! Derived tables behind the dashboard charts.
//!
//! Every view returns [`ChartData::NoData`] for an empty filtered view so the
//! UI can show a message instead of an empty chart.

use std::collections::BTreeMap;

use super::filter::FilteredView;
use super::model::Record;

pub const DEFAULT_TOP_ROLES: usize = 10;
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub enum ChartData<T> {
    NoData,
    Ready(T),
}

impl<T> ChartData<T> {
    pub fn as_ready(&self) -> Option<&T> {
        match self {
            ChartData::Ready(data) => Some(data),
            ChartData::NoData => None,
        }
    }

    #[cfg(test)]
    pub fn is_ready(&self) -> bool {
        matches!(self, ChartData::Ready(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoleMean {
    pub role: String,
    pub mean_salary: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub count: usize,
    /// Fraction of the view, in `0.0..=1.0`.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryMean {
    /// ISO3 code or the sentinel, never empty.
    pub country: String,
    pub mean_salary: f64,
    pub count: usize,
}

/// Running sum/count for a group-by mean.
#[derive(Debug, Default, Clone, Copy)]
struct MeanAcc {
    sum: f64,
    count: usize,
}

impl MeanAcc {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(self) -> f64 {
        self.sum / self.count as f64
    }
}

fn group_means<'a>(
    view: &FilteredView<'a>,
    key: impl Fn(&'a Record) -> &'a str,
) -> BTreeMap<&'a str, MeanAcc> {
    let mut groups: BTreeMap<&str, MeanAcc> = BTreeMap::new();
    for record in view.records() {
        groups.entry(key(record)).or_default().push(record.salary_usd);
    }
    groups
}

/// The `limit` roles with the highest mean salary, highest first.
///
/// Roles with equal means keep their name order.
pub fn top_roles_by_mean_salary(view: &FilteredView<'_>, limit: usize) -> ChartData<Vec<RoleMean>> {
    if view.is_empty() {
        return ChartData::NoData;
    }

    let mut roles: Vec<RoleMean> = group_means(view, |r| r.role.as_str())
        .into_iter()
        .map(|(role, acc)| RoleMean {
            role: role.to_string(),
            mean_salary: acc.mean(),
        })
        .collect();

    roles.sort_by(|a, b| b.mean_salary.total_cmp(&a.mean_salary));
    roles.truncate(limit);
    ChartData::Ready(roles)
}

/// Equal-width salary histogram with `bins` buckets over `[min, max]`.
///
/// The last bucket includes `max`. A single distinct salary is centred in a
/// range of width one.
pub fn salary_histogram(view: &FilteredView<'_>, bins: usize) -> ChartData<Vec<HistogramBin>> {
    if view.is_empty() || bins == 0 {
        return ChartData::NoData;
    }

    let (mut lo, mut hi) = view
        .records()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.salary_usd), hi.max(r.salary_usd))
        });
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for record in view.records() {
        let idx = ((record.salary_usd - lo) / width).floor() as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    let histogram = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count,
        })
        .collect();
    ChartData::Ready(histogram)
}

/// Record count and share per remote-work type, most common first.
pub fn remote_type_distribution(view: &FilteredView<'_>) -> ChartData<Vec<CategoryShare>> {
    if view.is_empty() {
        return ChartData::NoData;
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in view.records() {
        *counts.entry(record.remote_type.as_str()).or_default() += 1;
    }

    let total = view.len() as f64;
    let mut shares: Vec<CategoryShare> = counts
        .into_iter()
        .map(|(category, count)| CategoryShare {
            category: category.to_string(),
            count,
            share: count as f64 / total,
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    ChartData::Ready(shares)
}

/// Mean salary per company country, ordered by country code.
pub fn mean_salary_by_country(view: &FilteredView<'_>) -> ChartData<Vec<CountryMean>> {
    if view.is_empty() {
        return ChartData::NoData;
    }

    let rows = group_means(view, |r| r.company_country.as_str())
        .into_iter()
        .map(|(country, acc)| CountryMean {
            country: country.to_string(),
            mean_salary: acc.mean(),
            count: acc.count,
        })
        .collect();
    ChartData::Ready(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter_dataset, FilterSelection};
    use crate::data::model::tests::record;
    use crate::data::model::{CategoryValue, Dataset, Dimension, Record};

    fn full_view(ds: &Dataset) -> FilteredView<'_> {
        filter_dataset(ds, &FilterSelection::all(ds))
    }

    fn empty_view(ds: &Dataset) -> FilteredView<'_> {
        filter_dataset(ds, &FilterSelection::default())
    }

    fn with_remote(mut r: Record, remote: &str) -> Record {
        r.remote_type = remote.to_string();
        r
    }

    #[test]
    fn every_view_signals_no_data_on_empty_input() {
        let ds = Dataset::from_records(vec![record(2023, "A", "BRA", 1.0)]);
        let view = empty_view(&ds);
        assert_eq!(top_roles_by_mean_salary(&view, 10), ChartData::NoData);
        assert_eq!(salary_histogram(&view, 30), ChartData::NoData);
        assert_eq!(remote_type_distribution(&view), ChartData::NoData);
        assert_eq!(mean_salary_by_country(&view), ChartData::NoData);
    }

    #[test]
    fn top_roles_capped_and_descending() {
        let records: Vec<Record> = (0..15)
            .flat_map(|i| {
                let role = format!("Role {i:02}");
                [
                    record(2023, &role, "BRA", 1_000.0 * i as f64),
                    record(2024, &role, "USA", 1_000.0 * i as f64 + 500.0),
                ]
            })
            .collect();
        let ds = Dataset::from_records(records);

        let top = top_roles_by_mean_salary(&full_view(&ds), DEFAULT_TOP_ROLES);
        let top = top.as_ready().unwrap();
        assert_eq!(top.len(), 10);
        assert!(top.windows(2).all(|w| w[0].mean_salary >= w[1].mean_salary));
        assert_eq!(top[0].role, "Role 14");
        assert_eq!(top[0].mean_salary, 14_250.0);
        assert_eq!(top[9].role, "Role 05");
    }

    #[test]
    fn top_roles_ties_keep_name_order() {
        let ds = Dataset::from_records(vec![
            record(2023, "Zeta", "BRA", 10.0),
            record(2023, "Alpha", "BRA", 10.0),
            record(2023, "Mid", "BRA", 20.0),
        ]);
        let top = top_roles_by_mean_salary(&full_view(&ds), 10);
        let names: Vec<&str> = top
            .as_ready()
            .unwrap()
            .iter()
            .map(|r| r.role.as_str())
            .collect();
        assert_eq!(names, vec!["Mid", "Alpha", "Zeta"]);
    }

    #[test]
    fn histogram_counts_every_record() {
        let records: Vec<Record> = (0..100)
            .map(|i| record(2023, "A", "BRA", 10_000.0 + 997.0 * i as f64))
            .collect();
        let ds = Dataset::from_records(records);

        let hist = salary_histogram(&full_view(&ds), DEFAULT_HISTOGRAM_BINS);
        let bins = hist.as_ready().unwrap();
        assert_eq!(bins.len(), 30);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 100);
        assert_eq!(bins[0].lower, 10_000.0);
        assert_eq!(bins[29].upper, 10_000.0 + 997.0 * 99.0);
        // max lands in the closed last bucket
        assert!(bins[29].count >= 1);
    }

    #[test]
    fn histogram_single_value_is_centred() {
        let ds = Dataset::from_records(vec![
            record(2023, "A", "BRA", 500.0),
            record(2023, "B", "BRA", 500.0),
        ]);
        let hist = salary_histogram(&full_view(&ds), 30);
        let bins = hist.as_ready().unwrap();
        assert_eq!(bins[0].lower, 499.5);
        assert_eq!(bins[29].upper, 500.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
        let filled: Vec<&HistogramBin> = bins.iter().filter(|b| b.count > 0).collect();
        assert_eq!(filled.len(), 1);
        assert!(filled[0].lower <= 500.0 && 500.0 <= filled[0].upper);
    }

    #[test]
    fn remote_distribution_shares_sum_to_one() {
        let ds = Dataset::from_records(vec![
            with_remote(record(2023, "A", "BRA", 1.0), "remoto"),
            with_remote(record(2023, "B", "BRA", 1.0), "presencial"),
            with_remote(record(2023, "C", "BRA", 1.0), "remoto"),
            with_remote(record(2023, "D", "BRA", 1.0), "hibrido"),
        ]);
        let dist = remote_type_distribution(&full_view(&ds));
        let dist = dist.as_ready().unwrap();

        assert_eq!(dist[0].category, "remoto");
        assert_eq!(dist[0].count, 2);
        assert_eq!(dist[0].share, 0.5);
        let total: f64 = dist.iter().map(|s| s.share).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(dist.iter().map(|s| s.count).sum::<usize>(), 4);
    }

    #[test]
    fn country_groups_cover_the_view() {
        let ds = Dataset::from_records(vec![
            record(2023, "A", "USA", 100.0),
            record(2023, "B", "BRA", 10.0),
            record(2024, "C", "USA", 200.0),
            record(2024, "D", "XKX", 50.0),
            record(2024, "E", "BRA", 30.0),
        ]);
        let view = full_view(&ds);
        let rows = mean_salary_by_country(&view);
        let rows = rows.as_ready().unwrap();

        assert_eq!(rows.iter().map(|r| r.count).sum::<usize>(), view.len());
        assert!(rows.iter().all(|r| !r.country.is_empty()));
        let codes: Vec<&str> = rows.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(codes, vec!["BRA", "USA", "XKX"]);
        assert_eq!(rows[0].mean_salary, 20.0);
        assert_eq!(rows[1].mean_salary, 150.0);
    }

    #[test]
    fn scenario_country_means() {
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
        let view = filter_dataset(&ds, &selection);

        let expected = vec![
            CountryMean {
                country: "BRA".to_string(),
                mean_salary: 90_000.0,
                count: 1,
            },
            CountryMean {
                country: "USA".to_string(),
                mean_salary: 150_000.0,
                count: 1,
            },
        ];
        assert_eq!(mean_salary_by_country(&view), ChartData::Ready(expected));
    }
}
