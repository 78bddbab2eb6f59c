use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Placeholder used when a company country cannot be resolved to an ISO3 code.
pub const SENTINEL_COUNTRY: &str = "XKX";

// ---------------------------------------------------------------------------
// Dimension – the six categorical axes a user can filter on
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Year,
    Seniority,
    RemoteType,
    ContractType,
    CompanySize,
    CompanyCountry,
}

impl Dimension {
    /// All dimensions, in sidebar order.
    pub const ALL: [Dimension; 6] = [
        Dimension::Year,
        Dimension::Seniority,
        Dimension::RemoteType,
        Dimension::ContractType,
        Dimension::CompanySize,
        Dimension::CompanyCountry,
    ];

    /// Human readable label for selection controls.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Year => "Year",
            Dimension::Seniority => "Seniority",
            Dimension::RemoteType => "Remote type",
            Dimension::ContractType => "Contract type",
            Dimension::CompanySize => "Company size",
            Dimension::CompanyCountry => "Company country",
        }
    }

    /// Extract this dimension's value from a record.
    pub fn value_of(self, record: &Record) -> CategoryValue {
        match self {
            Dimension::Year => CategoryValue::Integer(record.year),
            Dimension::Seniority => CategoryValue::Text(record.seniority.clone()),
            Dimension::RemoteType => CategoryValue::Text(record.remote_type.clone()),
            Dimension::ContractType => CategoryValue::Text(record.contract_type.clone()),
            Dimension::CompanySize => CategoryValue::Text(record.company_size.clone()),
            Dimension::CompanyCountry => CategoryValue::Text(record.company_country.clone()),
        }
    }

    /// Whether `record`'s value for this dimension is in `accepted`.
    pub fn matches(self, record: &Record, accepted: &BTreeSet<CategoryValue>) -> bool {
        accepted.contains(&self.value_of(record))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// CategoryValue – one selectable value of a dimension
// ---------------------------------------------------------------------------

/// Years are integers, every other dimension is text. Integers sort first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryValue {
    Integer(i64),
    Text(String),
}

impl CategoryValue {
    pub fn text(s: impl Into<String>) -> Self {
        CategoryValue::Text(s.into())
    }
}

impl fmt::Display for CategoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryValue::Integer(i) => write!(f, "{i}"),
            CategoryValue::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one salary observation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub year: i64,
    pub role: String,
    pub seniority: String,
    pub remote_type: String,
    pub contract_type: String,
    pub company_size: String,
    /// ISO3 code, or [`SENTINEL_COUNTRY`].
    pub company_country: String,
    pub salary_usd: f64,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// Loaded records with the sorted distinct values of every dimension.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    unique_values: BTreeMap<Dimension, BTreeSet<CategoryValue>>,
}

impl Dataset {
    /// Build dimension indices from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut unique_values: BTreeMap<Dimension, BTreeSet<CategoryValue>> = Dimension::ALL
            .iter()
            .map(|&dim| (dim, BTreeSet::new()))
            .collect();

        for record in &records {
            for dim in Dimension::ALL {
                unique_values
                    .entry(dim)
                    .or_default()
                    .insert(dim.value_of(record));
            }
        }

        Dataset {
            records,
            unique_values,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct values of `dimension`, sorted.
    pub fn available_values(&self, dimension: Dimension) -> &BTreeSet<CategoryValue> {
        static EMPTY: BTreeSet<CategoryValue> = BTreeSet::new();
        self.unique_values.get(&dimension).unwrap_or(&EMPTY)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
