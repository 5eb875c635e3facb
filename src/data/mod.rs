/// Data layer: core types, loading, classification and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (typed columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ grouping  │  column names → GroupMap
///   └──────────┘
///        │
///        ▼
///   ┌───────────────────┐
///   │ filter + aggregate │  category rows → column means, group totals
///   └───────────────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  window   │   │  drill    │  visible page / group breakdown
///   └──────────┘   └──────────┘
/// ```

pub mod aggregate;
pub mod drill;
pub mod filter;
pub mod grouping;
pub mod loader;
pub mod model;
pub mod window;
