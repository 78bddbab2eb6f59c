use std::collections::{BTreeMap, BTreeSet};

use super::model::{CategoryValue, Dataset, Dimension, Record};

// ---------------------------------------------------------------------------
// Filter selection: which values are accepted per dimension
// ---------------------------------------------------------------------------

/// Per-dimension set of accepted values.
///
/// An empty set, or a dimension missing from the map, accepts nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    accepted: BTreeMap<Dimension, BTreeSet<CategoryValue>>,
}

impl FilterSelection {
    /// Every available value selected on all six dimensions.
    pub fn all(dataset: &Dataset) -> Self {
        let accepted = Dimension::ALL
            .iter()
            .map(|&dim| (dim, dataset.available_values(dim).clone()))
            .collect();
        FilterSelection { accepted }
    }

    /// Startup selection: everything, except the country dimension which is
    /// narrowed to `default_countries` (those present in the dataset).
    pub fn initial(dataset: &Dataset, default_countries: &[String]) -> Self {
        let mut selection = Self::all(dataset);
        let available = dataset.available_values(Dimension::CompanyCountry);

        let countries: BTreeSet<CategoryValue> = default_countries
            .iter()
            .map(|code| CategoryValue::text(code.as_str()))
            .filter(|value| {
                let present = available.contains(value);
                if !present {
                    log::warn!("Default country {value} not present in dataset");
                }
                present
            })
            .collect();

        selection.set(Dimension::CompanyCountry, countries);
        selection
    }

    /// Accepted values for `dimension`, if any were ever set.
    pub fn accepted(&self, dimension: Dimension) -> Option<&BTreeSet<CategoryValue>> {
        self.accepted.get(&dimension)
    }

    pub fn is_selected(&self, dimension: Dimension, value: &CategoryValue) -> bool {
        self.accepted
            .get(&dimension)
            .is_some_and(|set| set.contains(value))
    }

    pub fn set(&mut self, dimension: Dimension, values: BTreeSet<CategoryValue>) {
        self.accepted.insert(dimension, values);
    }

    /// Toggle a single value in a dimension's selection.
    pub fn toggle(&mut self, dimension: Dimension, value: &CategoryValue) {
        let selected = self.accepted.entry(dimension).or_default();
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
    }

    /// Select all values of a dimension.
    pub fn select_all(&mut self, dimension: Dimension, dataset: &Dataset) {
        self.set(dimension, dataset.available_values(dimension).clone());
    }

    /// Deselect all values of a dimension.
    pub fn select_none(&mut self, dimension: Dimension) {
        self.set(dimension, BTreeSet::new());
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// The records of a dataset that pass a selection, in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    /// Positions of the visible records within the dataset.
    #[cfg(test)]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Return the records of `dataset` that pass every dimension of `selection`.
///
/// A record passes a dimension when:
/// * The accepted set is empty or absent → nothing selected → fails
/// * The accepted set covers every available value → no constraint
/// * The record's value is in the accepted set → passes
pub fn filter_dataset<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    let mut active: Vec<(Dimension, &BTreeSet<CategoryValue>)> = Vec::new();
    for dim in Dimension::ALL {
        match selection.accepted(dim) {
            Some(set) if !set.is_empty() => {
                if !set.is_superset(dataset.available_values(dim)) {
                    active.push((dim, set));
                }
            }
            // Nothing selected for this dimension → hide everything
            _ => {
                return FilteredView {
                    dataset,
                    indices: Vec::new(),
                }
            }
        }
    }

    let indices = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| active.iter().all(|(dim, set)| dim.matches(record, set)))
        .map(|(i, _)| i)
        .collect();

    FilteredView { dataset, indices }
}
