/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///      .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse text → Dataset (runs once per load)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Row>, header, read-only from here on
///   └──────────┘
///        │   search term + FilterState
///        ▼
///   ┌──────────┐
///   │  filter   │  stable selection → filtered indices / rows
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ analytics  │  distribution, ranking, trend, summary → Snapshot
///   └───────────┘
/// ```
///
/// Everything below the loader is a pure function of its inputs; the
/// application state simply recomputes a [`analytics::Snapshot`] whenever the
/// search term or a filter changes.

pub mod analytics;
pub mod filter;
pub mod loader;
pub mod model;
