//! Persistent append-only document record store.

pub mod document_store;
pub mod types;

pub use document_store::DocumentStore;
pub use types::{DocId, DocumentRecord, StoreMeta};
