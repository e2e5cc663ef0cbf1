//! Data layer: core types, loading, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  CSV (URL or file)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  fetch once → Dataset (memoised per process)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  FilterSelection → View (subset of rows)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌────────────────────────────┐
//!   │ aggregate / metrics / junior│  grouped stats, crosstabs, headline figures
//!   └────────────────────────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ dashboard  │  RenderModel handed to the UI
//!   └───────────┘
//! ```

pub mod aggregate;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod junior;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod stats;
