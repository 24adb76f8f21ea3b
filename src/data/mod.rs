/// Data layer: core types, loading, caching, selection and statistics.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → AssessmentTable (cells classified once)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache   │  OnceCell: one read per file per process
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  select athlete rows, valid jump subset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats   │  max / min / mean per jump type
///   └──────────┘
/// ```

pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
