use serde::{Deserialize, Serialize};

/// Unique identifier for a document record
pub type DocId = u32;

/// Current on-disk store format version
pub const STORE_VERSION: u32 = 1;

/// One immutable entry in the document store.
///
/// Records are append-only: there is no per-record update or delete, only
/// the full-store clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    /// Assigned by the store; strictly increasing, never reused
    pub id: DocId,
    /// Opaque label for where the content came from. Not validated, not
    /// resolved, and not required to be unique.
    pub source_path: String,
    /// The document's token sequence joined by single spaces
    pub content: String,
    /// Language the document was indexed under, stored verbatim
    pub language: String,
    /// Tokenization algorithm the document was indexed under
    pub algorithm: String,
}

/// Store metadata persisted as meta.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMeta {
    pub version: u32,
    /// Next id to assign. Survives a full clear, which is what keeps ids
    /// from ever being reused.
    pub next_id: DocId,
    /// Number of live records
    pub doc_count: u32,
    pub created_at: u64,
    pub updated_at: u64,
}

impl StoreMeta {
    pub fn new(now: u64) -> Self {
        Self {
            version: STORE_VERSION,
            next_id: 1,
            doc_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
