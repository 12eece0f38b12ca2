pub mod indexer;
pub mod stats;

pub use indexer::{DocumentReader, FsDocumentReader, IndexFailure, IndexSummary, Indexer};
