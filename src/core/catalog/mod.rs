// ─── Catalog ───
// Joins the normalized feeds into the compatibility matrix and keeps the
// current snapshot available to readers while refreshes run.

pub mod coalesce;
pub mod matrix;
pub mod service;
pub mod snapshot;

pub use matrix::CompatibilityRecord;
pub use service::{CatalogService, CatalogSource};
pub use snapshot::CatalogSnapshot;
