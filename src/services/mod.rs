// Service exports
pub mod catalog;
pub mod trace_store;

pub use catalog::{BuiltinCatalog, CatalogError, CatalogProvider, JsonCatalog};
pub use trace_store::{save_trace, TraceStoreError};
