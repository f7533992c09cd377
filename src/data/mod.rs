//! Data layer: remote fetch, memoization, and localization.
//!
//! ```text
//!  emergencytransports API
//!        │  api::ApiClient::fetch
//!        ▼
//!   cache::DatasetCache   fetch once, refresh on demand
//!        │
//!        ▼
//!   localize::localize    relabel for the display locale
//! ```

pub mod api;
pub mod cache;
pub mod localize;

pub use api::{ApiClient, parse_records};
pub use cache::{DatasetCache, DatasetSource, Snapshot};
pub use localize::{LabelTable, label_table, localize, unlabeled, warn_unlabeled};
