/// Data layer: loading, preparation, and read-only queries.
///
/// Architecture:
/// ```text
///  attendance .csv          championship .csv
///        │                        │
///        ▼                        ▼
///   ┌──────────┐             ┌──────────┐
///   │  loader   │  typed rows │  loader   │
///   └──────────┘             └──────────┘
///        │                        │
///        ▼                        ▼
///   ┌───────────┐            ┌───────────┐
///   │ normalize  │  aliases   │ normalize  │
///   └───────────┘            └───────────┘
///        │                        │
///        ▼                        │
///   ┌──────────┐                  │
///   │  derive   │  efficiency     │
///   └──────────┘                  │
///        │                        │
///        ▼                        ▼
///   ┌────────────────────────────────┐
///   │ annotate   (season, team) join  │
///   └────────────────────────────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ AttendanceTable │  immutable, built once by `prepare`
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  query    │  filters, rankings, aggregates, regression
///   └──────────┘
/// ```

pub mod annotate;
pub mod derive;
pub mod error;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod prepare;
pub mod query;
pub mod stats;
