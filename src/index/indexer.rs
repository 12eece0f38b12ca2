use crate::store::DocumentStore;
use crate::tokenizer::tokenize;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Source of raw document text.
///
/// Implementations own any format-specific extraction; the indexer only
/// ever sees the flat string. Must be shareable across the worker threads
/// of a batch.
pub trait DocumentReader: Sync {
    fn read(&self, path: &Path) -> Result<String>;
}

/// Reads documents as plain UTF-8 text straight from the filesystem
pub struct FsDocumentReader;

impl DocumentReader for FsDocumentReader {
    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

/// Outcome of one batch run
#[derive(Debug, Default)]
pub struct IndexSummary {
    /// Documents appended to the store
    pub indexed: usize,
    /// Paths whose content could not be obtained, with the reason. These
    /// do not abort the batch.
    pub failures: Vec<IndexFailure>,
}

/// One document that failed during a batch
#[derive(Debug)]
pub struct IndexFailure {
    pub path: PathBuf,
    pub error: String,
}

/// A document ready for insertion (computed in parallel)
struct PreparedDocument {
    source_path: String,
    content: String,
}

/// Batch indexer: reads, tokenizes and appends documents to a store.
///
/// Content runs through the reader collaborator and [`tokenize`] in
/// parallel; the surviving token sequences are then appended serially in
/// the order the paths were given.
pub struct Indexer<'a> {
    store: &'a DocumentStore,
    reader: &'a dyn DocumentReader,
}

impl<'a> Indexer<'a> {
    pub fn new(store: &'a DocumentStore, reader: &'a dyn DocumentReader) -> Self {
        Self { store, reader }
    }

    /// Index a batch of paths under one (language, algorithm) pair.
    ///
    /// A path that cannot be read is recorded in the summary and the batch
    /// continues; storage failures abort and propagate.
    pub fn index(&self, paths: &[PathBuf], language: &str, algorithm: &str) -> Result<IndexSummary> {
        self.store.create_schema()?;

        #[cfg(feature = "progress")]
        let bar = progress_bar(paths.len() as u64);

        let prepared: Vec<Result<PreparedDocument, IndexFailure>> = paths
            .par_iter()
            .map(|path| {
                let outcome = self.prepare(path, language, algorithm);
                #[cfg(feature = "progress")]
                bar.inc(1);
                outcome
            })
            .collect();

        #[cfg(feature = "progress")]
        bar.finish_and_clear();

        let mut summary = IndexSummary::default();
        for outcome in prepared {
            match outcome {
                Ok(doc) => {
                    self.store
                        .insert(&doc.source_path, &doc.content, language, algorithm)?;
                    summary.indexed += 1;
                }
                Err(failure) => summary.failures.push(failure),
            }
        }

        Ok(summary)
    }

    fn prepare(
        &self,
        path: &Path,
        language: &str,
        algorithm: &str,
    ) -> Result<PreparedDocument, IndexFailure> {
        match self.reader.read(path) {
            Ok(raw) => {
                let tokens = tokenize(&raw, language, algorithm);
                Ok(PreparedDocument {
                    source_path: path.display().to_string(),
                    content: tokens.join(" "),
                })
            }
            Err(err) => Err(IndexFailure {
                path: path.to_path_buf(),
                error: format!("{err:#}"),
            }),
        }
    }
}

#[cfg(feature = "progress")]
fn progress_bar(len: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap()
            .progress_chars("█▓▒░  "),
    );
    pb.set_message("Indexing documents...");
    pb
}
