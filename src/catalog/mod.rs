//! The building/resource catalog: a disk-cached tantivy index over the
//! building directory, the batched pipeline that builds it, and the cached
//! per-building resource list.

mod disambiguate;
mod index;
mod ingest;
mod resources;

pub use disambiguate::resolve_building;
pub use index::BuildingIndex;
pub use ingest::build_catalog;
pub use resources::resources_in_building;
