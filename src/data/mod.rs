/// Data layer: core types, loading, distance, filtering and sorting.
///
/// Architecture:
/// ```text
///  published sheet (.csv over HTTP) / local .csv
///        │
///        ▼
///   ┌──────────┐      ┌─────────┐
///   │  loader   │ ◄──► │  cache   │  parse + validate → Table, kept for a TTL
///   └──────────┘      └─────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   geo     │  haversine distance to the reference point (once per load)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐    ┌──────────┐
///   │  filter   │ ─► │   sort    │  re-run on every interaction → new Table
///   └──────────┘    └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   map     │  markers + bounds for the map view
///   └──────────┘
/// ```

pub mod cache;
pub mod filter;
pub mod geo;
pub mod loader;
pub mod map;
pub mod model;
pub mod sort;
