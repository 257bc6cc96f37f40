/// Data layer: core types, loading, row selection, and feature extraction.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Row>, column schema
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  training subset, missing-value scan
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ features  │  numeric columns → FeatureMatrix
///   └──────────┘
/// ```
pub mod features;
pub mod filter;
pub mod loader;
pub mod model;
