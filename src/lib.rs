//! # DXI - Document Indexing and Search Engine
//!
//! DXI is a terminal-first search engine over a persistent corpus of
//! tokenized text documents. Documents are tokenized per language and
//! algorithm at indexing time, appended to an immutable record store, and
//! retrieved through three interchangeable strategies.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`tokenizer`] - Per-language, per-algorithm token extraction
//! - [`store`] - Append-only document record store (meta.json + record log)
//! - [`index`] - Batch indexing of documents into the store
//! - [`query`] - The search engine and its retrieval strategies
//! - [`output`] - Result formatting for the CLI
//! - [`utils`] - App-data paths and encoding helpers
//!
//! ## Quick Start
//!
//! ```ignore
//! use dxi::index::{FsDocumentReader, Indexer};
//! use dxi::query::{SearchEngine, SearchStrategy};
//! use dxi::store::DocumentStore;
//! use std::path::{Path, PathBuf};
//!
//! // Index a couple of documents
//! let store = DocumentStore::open(Path::new("/tmp/dxi-store"));
//! let reader = FsDocumentReader;
//! let indexer = Indexer::new(&store, &reader);
//! indexer.index(&[PathBuf::from("notes.txt")], "english", "Word").unwrap();
//!
//! // Search them
//! let engine = SearchEngine::new(&store);
//! for path in engine.search("quick brown", SearchStrategy::Boolean).unwrap() {
//!     println!("{}", path);
//! }
//! ```
//!
//! ## Retrieval strategies
//!
//! 1. **boolean** - whitespace terms intersected as case-insensitive
//!    substring matches; every term must hit
//! 2. **extended_boolean** - a left-to-right fold where `and`, `or` and
//!    `not` combine term result sets
//! 3. **vector** - TF-IDF weighting with cosine similarity against the
//!    query, cut off at a fixed threshold
//!
//! All strategies re-read the store per call, so results always reflect
//! the current committed corpus.

pub mod index;
pub mod output;
pub mod query;
pub mod store;
pub mod tokenizer;
pub mod utils;
