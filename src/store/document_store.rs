use crate::store::types::{DocId, DocumentRecord, StoreMeta};
use crate::utils::{slice_u32_le, write_u32_le};
use anyhow::{Context, Result, bail};
use memchr::memmem;
use memmap2::Mmap;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

const META_FILE: &str = "meta.json";
const RECORDS_FILE: &str = "records.bin";
const RECORDS_TMP_FILE: &str = "records.bin.tmp";

/// Persistent store of immutable document records.
///
/// On disk a store is a directory holding `meta.json` (format version, id
/// high-water mark, live count, timestamps) and `records.bin`, an
/// append-only log of length-prefixed records. Inserts are serialized
/// through the handle's write lock and flushed per record; reads map the
/// log and parse the committed bytes, so every call sees the current state
/// without any caching in between.
pub struct DocumentStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl DocumentStore {
    /// Bind a store handle to a directory. No I/O happens here; the
    /// directory is prepared by [`DocumentStore::create_schema`].
    pub fn open(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Directory this handle is bound to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// True once the store has been created on disk
    pub fn exists(&self) -> bool {
        self.meta_path().exists()
    }

    /// Prepare the store directory for inserts. Idempotent: calling it on
    /// an existing store changes nothing and loses nothing.
    pub fn create_schema(&self) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.create_schema_locked()
    }

    /// Append one record, returning its assigned id. Ids are strictly
    /// increasing across the life of the store, including across clears.
    /// The id is claimed in the metadata before the append, so a failed
    /// append leaves a gap in the sequence, never a reused id.
    pub fn insert(
        &self,
        source_path: &str,
        content: &str,
        language: &str,
        algorithm: &str,
    ) -> Result<DocId> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut meta = self.load_meta()?;
        let id = meta.next_id;
        meta.next_id += 1;
        meta.doc_count += 1;
        meta.updated_at = unix_now();
        self.save_meta(&meta)?;

        let file = OpenOptions::new()
            .append(true)
            .open(self.records_path())
            .context("Failed to open record log for append")?;
        let mut writer = BufWriter::new(file);
        write_record(&mut writer, id, source_path, content, language, algorithm)
            .context("Failed to append document record")?;
        writer.flush().context("Failed to flush record log")?;

        Ok(id)
    }

    /// Remove every record. The id high-water mark survives, so inserts
    /// after a clear continue the old sequence. A store that was never
    /// created becomes an empty store. The old log is replaced by rename,
    /// so a mapping taken before the clear stays readable.
    pub fn clear_all(&self) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.create_schema_locked()?;

        let mut meta = self.load_meta()?;
        let fresh = self.dir.join(RECORDS_TMP_FILE);
        File::create(&fresh).context("Failed to create empty record log")?;
        fs::rename(&fresh, self.records_path()).context("Failed to swap record log")?;
        meta.doc_count = 0;
        meta.updated_at = unix_now();
        self.save_meta(&meta)
    }

    /// Every record's (source_path, content), in insertion order
    pub fn scan_all(&self) -> Result<Vec<(String, String)>> {
        let data = self.map_records()?;
        let bytes = data.bytes();

        let mut out = Vec::new();
        let mut pos = 0;
        while let Some((record, next)) = parse_record(bytes, pos) {
            out.push((record.source_path.to_owned(), record.content.to_owned()));
            pos = next;
        }
        Ok(out)
    }

    /// All records in insertion order, fully decoded
    pub fn records(&self) -> Result<Vec<DocumentRecord>> {
        let data = self.map_records()?;
        let bytes = data.bytes();

        let mut out = Vec::new();
        let mut pos = 0;
        while let Some((record, next)) = parse_record(bytes, pos) {
            out.push(record.to_record());
            pos = next;
        }
        Ok(out)
    }

    /// Distinct source paths of records whose content contains `term` as a
    /// case-insensitive substring. The match may land inside a token or
    /// span the single-space joins between tokens.
    pub fn find_by_substring(&self, term: &str) -> Result<HashSet<String>> {
        let needle = term.to_lowercase();
        let finder = memmem::Finder::new(needle.as_bytes());
        let data = self.map_records()?;
        let bytes = data.bytes();

        let mut paths = HashSet::new();
        let mut pos = 0;
        while let Some((record, next)) = parse_record(bytes, pos) {
            pos = next;
            if paths.contains(record.source_path) {
                continue;
            }
            let haystack = record.content.to_lowercase();
            if finder.find(haystack.as_bytes()).is_some() {
                paths.insert(record.source_path.to_owned());
            }
        }
        Ok(paths)
    }

    /// Current store metadata
    pub fn meta(&self) -> Result<StoreMeta> {
        self.load_meta()
    }

    fn create_schema_locked(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create store directory {}", self.dir.display()))?;
        if !self.meta_path().exists() {
            self.save_meta(&StoreMeta::new(unix_now()))?;
        }
        if !self.records_path().exists() {
            File::create(self.records_path()).context("Failed to create record log")?;
        }
        Ok(())
    }

    fn load_meta(&self) -> Result<StoreMeta> {
        let meta_path = self.meta_path();
        if !meta_path.exists() {
            bail!(
                "No document store at {}. Run 'dxi index' first.",
                self.dir.display()
            );
        }
        let file = File::open(&meta_path).context("Failed to open store metadata")?;
        let meta = serde_json::from_reader(file).context("Failed to parse store metadata")?;
        Ok(meta)
    }

    fn save_meta(&self, meta: &StoreMeta) -> Result<()> {
        let file = File::create(self.meta_path()).context("Failed to write store metadata")?;
        serde_json::to_writer_pretty(file, meta).context("Failed to serialize store metadata")?;
        Ok(())
    }

    fn map_records(&self) -> Result<RecordData> {
        if !self.meta_path().exists() {
            bail!(
                "No document store at {}. Run 'dxi index' first.",
                self.dir.display()
            );
        }
        let file = File::open(self.records_path()).context("Failed to open record log")?;
        let len = file
            .metadata()
            .context("Failed to stat record log")?
            .len();
        if len == 0 {
            return Ok(RecordData::Empty);
        }
        let mmap = unsafe { Mmap::map(&file) }.context("Failed to map record log")?;
        Ok(RecordData::Mapped(mmap))
    }

    fn meta_path(&self) -> PathBuf {
        self.dir.join(META_FILE)
    }

    fn records_path(&self) -> PathBuf {
        self.dir.join(RECORDS_FILE)
    }
}

/// Backing bytes for the record log. A zero-length log is represented
/// without a mapping, since empty files cannot be mapped.
enum RecordData {
    Mapped(Mmap),
    Empty,
}

impl RecordData {
    fn bytes(&self) -> &[u8] {
        match self {
            RecordData::Mapped(mmap) => mmap,
            RecordData::Empty => &[],
        }
    }
}

/// Borrowed view of one record inside the mapped log
struct RecordSlice<'a> {
    id: DocId,
    source_path: &'a str,
    content: &'a str,
    language: &'a str,
    algorithm: &'a str,
}

impl RecordSlice<'_> {
    fn to_record(&self) -> DocumentRecord {
        DocumentRecord {
            id: self.id,
            source_path: self.source_path.to_owned(),
            content: self.content.to_owned(),
            language: self.language.to_owned(),
            algorithm: self.algorithm.to_owned(),
        }
    }
}

/// Record wire format: u32 id, then source_path, content, language and
/// algorithm as u32-length-prefixed UTF-8 bytes.
fn write_record<W: Write>(
    writer: &mut W,
    id: DocId,
    source_path: &str,
    content: &str,
    language: &str,
    algorithm: &str,
) -> io::Result<()> {
    write_u32_le(writer, id)?;
    for field in [source_path, content, language, algorithm] {
        write_u32_le(writer, field.len() as u32)?;
        writer.write_all(field.as_bytes())?;
    }
    Ok(())
}

/// Parse the record starting at `pos`. Returns the view and the offset of
/// the following record. A truncated tail (an append in flight when the
/// log was mapped) parses as end-of-log.
fn parse_record(data: &[u8], pos: usize) -> Option<(RecordSlice<'_>, usize)> {
    let id = slice_u32_le(data, pos)?;
    let mut cursor = pos + 4;
    let source_path = parse_str(data, &mut cursor)?;
    let content = parse_str(data, &mut cursor)?;
    let language = parse_str(data, &mut cursor)?;
    let algorithm = parse_str(data, &mut cursor)?;
    Some((
        RecordSlice {
            id,
            source_path,
            content,
            language,
            algorithm,
        },
        cursor,
    ))
}

fn parse_str<'a>(data: &'a [u8], cursor: &mut usize) -> Option<&'a str> {
    let len = slice_u32_le(data, *cursor)? as usize;
    let start = *cursor + 4;
    let bytes = data.get(start..start + len)?;
    *cursor = start + len;
    std::str::from_utf8(bytes).ok()
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store(name: &str) -> DocumentStore {
        let dir = std::env::temp_dir().join(format!("dxi_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let store = DocumentStore::open(&dir);
        store.create_schema().unwrap();
        store
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let store = test_store("ids");
        let a = store.insert("a.txt", "alpha", "english", "Word").unwrap();
        let b = store.insert("b.txt", "beta", "english", "Word").unwrap();
        let c = store.insert("c.txt", "gamma", "english", "Word").unwrap();
        assert!(a < b && b < c);

        let records = store.records().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, a);
        assert_eq!(records[0].source_path, "a.txt");
        assert_eq!(records[2].content, "gamma");
    }

    #[test]
    fn test_ids_survive_clear() {
        let store = test_store("clear_ids");
        store.insert("a.txt", "alpha", "english", "Word").unwrap();
        let before = store.insert("b.txt", "beta", "english", "Word").unwrap();

        store.clear_all().unwrap();
        assert!(store.scan_all().unwrap().is_empty());
        assert_eq!(store.meta().unwrap().doc_count, 0);

        let after = store.insert("c.txt", "gamma", "english", "Word").unwrap();
        assert!(after > before);
    }

    #[test]
    fn test_failed_append_burns_its_id() {
        let store = test_store("append_fail");
        let first = store.insert("a.txt", "alpha", "english", "Word").unwrap();

        // Park the log and put a directory in its place so the append
        // cannot open it
        let log = store.dir().join(RECORDS_FILE);
        let parked = store.dir().join("records.parked");
        fs::rename(&log, &parked).unwrap();
        fs::create_dir(&log).unwrap();
        assert!(store.insert("b.txt", "beta", "english", "Word").is_err());
        fs::remove_dir(&log).unwrap();
        fs::rename(&parked, &log).unwrap();

        // The failed insert left nothing behind and its id is not handed
        // out again
        assert!(store.find_by_substring("beta").unwrap().is_empty());
        let third = store.insert("c.txt", "gamma", "english", "Word").unwrap();
        assert_eq!(third, first + 2);

        let ids: Vec<_> = store.records().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first, third]);
    }

    #[test]
    fn test_clear_keeps_live_maps_valid() {
        let store = test_store("clear_maps");
        store.insert("a.txt", "alpha", "english", "Word").unwrap();
        store.insert("b.txt", "beta", "english", "Word").unwrap();

        // A reader still holds the log mapped while the store is cleared
        let mapped = store.map_records().unwrap();
        store.clear_all().unwrap();
        assert!(store.scan_all().unwrap().is_empty());

        let bytes = mapped.bytes();
        let (first, next) = parse_record(bytes, 0).unwrap();
        assert_eq!(first.content, "alpha");
        let (second, end) = parse_record(bytes, next).unwrap();
        assert_eq!(second.content, "beta");
        assert_eq!(end, bytes.len());
    }

    #[test]
    fn test_create_schema_idempotent() {
        let store = test_store("idempotent");
        store.insert("a.txt", "alpha", "english", "Word").unwrap();
        store.create_schema().unwrap();
        assert_eq!(store.records().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_paths_are_distinct_records() {
        let store = test_store("dups");
        store.insert("doc.txt", "first version", "english", "Word").unwrap();
        store.insert("doc.txt", "second version", "english", "Word").unwrap();

        let scanned = store.scan_all().unwrap();
        assert_eq!(scanned.len(), 2);
        assert_eq!(scanned[0], ("doc.txt".into(), "first version".into()));
        assert_eq!(scanned[1], ("doc.txt".into(), "second version".into()));
    }

    #[test]
    fn test_find_by_substring_is_case_insensitive() {
        let store = test_store("case");
        store.insert("a.txt", "Quick Brown fox", "english", "Word").unwrap();

        assert!(store.find_by_substring("brown").unwrap().contains("a.txt"));
        assert!(store.find_by_substring("BROWN").unwrap().contains("a.txt"));
        assert!(store.find_by_substring("elephant").unwrap().is_empty());
    }

    #[test]
    fn test_find_by_substring_matches_fragments() {
        let store = test_store("fragments");
        store.insert("a.txt", "quick brown fox", "english", "Word").unwrap();

        // Inside a token
        assert!(store.find_by_substring("ox").unwrap().contains("a.txt"));
        // Across the space join
        assert!(store.find_by_substring("k b").unwrap().contains("a.txt"));
    }

    #[test]
    fn test_find_by_substring_deduplicates_paths() {
        let store = test_store("dedup");
        store.insert("doc.txt", "brown fox", "english", "Word").unwrap();
        store.insert("doc.txt", "brown dog", "english", "Word").unwrap();

        let paths = store.find_by_substring("brown").unwrap();
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_empty_term_matches_everything() {
        let store = test_store("empty_term");
        store.insert("a.txt", "alpha", "english", "Word").unwrap();
        store.insert("b.txt", "beta", "english", "Word").unwrap();

        assert_eq!(store.find_by_substring("").unwrap().len(), 2);
    }

    #[test]
    fn test_reads_before_schema_fail() {
        let dir = std::env::temp_dir().join(format!("dxi_noschema_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let store = DocumentStore::open(&dir);

        assert!(store.scan_all().is_err());
        assert!(store.find_by_substring("x").is_err());
        assert!(store.meta().is_err());
    }

    #[test]
    fn test_clear_initializes_missing_store() {
        let dir = std::env::temp_dir().join(format!("dxi_clearinit_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let store = DocumentStore::open(&dir);

        store.clear_all().unwrap();
        assert!(store.scan_all().unwrap().is_empty());
    }

    #[test]
    fn test_record_codec_roundtrip() {
        let mut buf = Vec::new();
        write_record(&mut buf, 7, "dir/a.txt", "quick brown fox", "english", "Word").unwrap();
        write_record(&mut buf, 8, "b.txt", "", "arabic", "Whitespace").unwrap();

        let (first, next) = parse_record(&buf, 0).unwrap();
        assert_eq!(first.id, 7);
        assert_eq!(first.source_path, "dir/a.txt");
        assert_eq!(first.content, "quick brown fox");
        assert_eq!(first.language, "english");
        assert_eq!(first.algorithm, "Word");

        let (second, end) = parse_record(&buf, next).unwrap();
        assert_eq!(second.id, 8);
        assert_eq!(second.content, "");
        assert_eq!(end, buf.len());
        assert!(parse_record(&buf, end).is_none());
    }

    #[test]
    fn test_truncated_tail_parses_as_end_of_log() {
        let mut buf = Vec::new();
        write_record(&mut buf, 1, "a.txt", "alpha", "english", "Word").unwrap();
        let committed = buf.len();
        write_record(&mut buf, 2, "b.txt", "beta", "english", "Word").unwrap();
        buf.truncate(committed + 9);

        let (first, next) = parse_record(&buf, 0).unwrap();
        assert_eq!(first.id, 1);
        assert!(parse_record(&buf, next).is_none());
    }
}
