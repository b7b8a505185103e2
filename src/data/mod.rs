/// Data layer: year partitions in, typed dataset and aggregates out.
///
/// Architecture:
/// ```text
///  cleaned_<year>.csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │ catalog   │  list year keys in the data folder
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse one partition → RawDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  schema   │  required columns → HappinessDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  top-N, mean / min / max
///   └───────────┘
/// ```

pub mod aggregate;
pub mod catalog;
pub mod loader;
pub mod model;
pub mod schema;
