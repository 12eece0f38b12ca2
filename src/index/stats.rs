use crate::store::DocumentStore;
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

/// Display store statistics
pub fn show_stats(store: &DocumentStore) -> Result<()> {
    let meta = store.meta()?;
    let records = store.records()?;

    println!("Store Statistics");
    println!("================");
    println!();
    println!("Store location:   {}", store.dir().display());
    println!("Format version:   {}", meta.version);
    println!("Document count:   {}", meta.doc_count);
    println!("Next id:          {}", meta.next_id);

    // Count by (language, algorithm) as the documents were indexed
    let mut lang_counts: HashMap<(&str, &str), usize> = HashMap::new();
    for record in &records {
        *lang_counts
            .entry((record.language.as_str(), record.algorithm.as_str()))
            .or_insert(0) += 1;
    }

    if !lang_counts.is_empty() {
        println!();
        println!("Documents by language:");
        let mut sorted: Vec<_> = lang_counts.into_iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));

        for ((language, algorithm), count) in sorted {
            println!("  {:12} {:12} {}", language, algorithm, count);
        }
    }

    if let Ok(size) = dir_size(store.dir()) {
        println!();
        println!("Store size:       {}", format_size(size));
    }

    println!();
    println!("Created:          {}", format_timestamp(meta.created_at));
    println!("Updated:          {}", format_timestamp(meta.updated_at));

    Ok(())
}

/// Calculate directory size recursively
fn dir_size(path: &Path) -> std::io::Result<u64> {
    let mut size = 0;
    if path.is_dir() {
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() {
                size += entry.metadata()?.len();
            } else if path.is_dir() {
                size += dir_size(&path)?;
            }
        }
    }
    Ok(size)
}

/// Format byte size to human readable
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Format unix timestamp
fn format_timestamp(ts: u64) -> String {
    use std::time::{Duration, UNIX_EPOCH};
    let datetime = UNIX_EPOCH + Duration::from_secs(ts);
    format!("{:?}", datetime)
}
