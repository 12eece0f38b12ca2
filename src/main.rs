use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dxi::index::stats::show_stats;
use dxi::index::{FsDocumentReader, Indexer};
use dxi::output;
use dxi::query::{SearchEngine, SearchStrategy};
use dxi::store::DocumentStore;
use dxi::utils::default_store_dir;
use globset::Glob;
use ignore::WalkBuilder;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dxi")]
#[command(about = "Terminal-first document indexing and multi-strategy search engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize documents and add them to the store
    Index {
        /// Files or directories to index (directories are walked)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Language used for token filtering
        #[arg(short, long, default_value = "english")]
        language: String,

        /// Tokenization algorithm (Whitespace or Word)
        #[arg(short, long, default_value = "Word")]
        algorithm: String,

        /// Only index files matching this glob (applies when walking directories)
        #[arg(short, long)]
        glob: Option<String>,

        /// Document store directory
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Search the indexed documents
    Search {
        /// Query string
        query: String,

        /// Retrieval strategy: boolean, extended_boolean or vector
        #[arg(short, long, default_value = "boolean")]
        strategy: String,

        /// When to color output
        #[arg(long, default_value = "auto", value_parser = ["auto", "always", "never"])]
        color: String,

        /// Document store directory
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Remove every document from the store
    Reset {
        /// Document store directory
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Show store statistics
    Stats {
        /// Document store directory
        #[arg(long)]
        store: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Index {
            paths,
            language,
            algorithm,
            glob,
            store,
        } => {
            let store = open_store(store)?;
            let files = collect_files(&paths, glob.as_deref())?;

            println!(
                "Indexing {} documents into {}",
                files.len(),
                store.dir().display()
            );

            let reader = FsDocumentReader;
            let indexer = Indexer::new(&store, &reader);
            let summary = indexer.index(&files, &language, &algorithm)?;
            output::print_index_summary(&summary);
        }
        Commands::Search {
            query,
            strategy,
            color,
            store,
        } => {
            let store = open_store(store)?;
            let strategy = SearchStrategy::from_name(&strategy)?;
            let engine = SearchEngine::new(&store);
            let results = engine.search(&query, strategy)?;
            output::print_results(&results, output::color_choice(&color))?;
        }
        Commands::Reset { store } => {
            let store = open_store(store)?;
            store.clear_all()?;
            println!("Cleared document store at {}", store.dir().display());
        }
        Commands::Stats { store } => {
            let store = open_store(store)?;
            show_stats(&store)?;
        }
    }

    Ok(())
}

fn open_store(dir: Option<PathBuf>) -> Result<DocumentStore> {
    let dir = match dir {
        Some(dir) => dir,
        None => default_store_dir()?,
    };
    Ok(DocumentStore::open(&dir))
}

/// Expand the given paths into the ordered list of files to index.
/// Directories are walked gitignore-aware with hidden entries skipped.
fn collect_files(paths: &[PathBuf], glob: Option<&str>) -> Result<Vec<PathBuf>> {
    let matcher = match glob {
        Some(pattern) => Some(
            Glob::new(pattern)
                .with_context(|| format!("Invalid glob pattern: {}", pattern))?
                .compile_matcher(),
        ),
        None => None,
    };

    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let walker = WalkBuilder::new(path)
                .hidden(true)
                .git_ignore(true)
                .git_global(true)
                .git_exclude(true)
                .build();

            for entry in walker.filter_map(|entry| entry.ok()) {
                if !entry.path().is_file() {
                    continue;
                }
                if let Some(ref matcher) = matcher {
                    if !matcher.is_match(entry.path()) {
                        continue;
                    }
                }
                files.push(entry.path().to_path_buf());
            }
        } else {
            files.push(path.clone());
        }
    }

    Ok(files)
}
