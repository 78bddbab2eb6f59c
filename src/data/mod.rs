/// Data layer: record types, loading, filtering and the derived summaries.
///
/// Architecture:
/// ```text
///  URL / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + parse → Dataset (country sentinel fill)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Record>, distinct values per dimension
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → FilteredView (indices)
///   └──────────┘
///        │
///    ┌───┴────────┐
///    ▼            ▼
///  metrics     aggregate
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
