/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  memoized per path → Arc<Dataset>
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply per-column selections → View (row indices)
///   └──────────┘
///        │
///        ▼
///   ┌───────────────────────────┐
///   │ aggregate / histogram     │  metrics, group sums, age bins
///   │ summary                   │  one full recomputation pass
///   └───────────────────────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod filter;
pub mod histogram;
pub mod loader;
pub mod model;
pub mod summary;
