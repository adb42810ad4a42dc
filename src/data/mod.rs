/// Data layer: core types, loading, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + sanitize rows → PlayerDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ PlayerDataset │  Vec<Record>, load statistics
///   └──────────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  gp filter + group-by-age mean → Vec<AggregatePoint>
///   └───────────┘
/// ```

pub mod aggregate;
pub mod loader;
pub mod model;
